use std::ops::{Deref, Not};
use std::str::FromStr;

use super::codec::Mode;
use super::error::{QRError, QRResult};
use super::mask::MaskPattern;
use super::version_db::*;

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl Color {
    pub fn select<T>(self, light: T, dark: T) -> T {
        match self {
            Self::Light => light,
            Self::Dark => dark,
        }
    }
}

impl From<bool> for Color {
    fn from(bit: bool) -> Self {
        if bit {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

// Version
//------------------------------------------------------------------------------

/// Symbol version, 1 to 40. Only produced by the encoder, read it through
/// [`QR::version`](crate::QR::version).
///
/// ```compile_fail
/// let _ = qrforge::Version::new(41);
/// ```
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct Version(usize);

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub(crate) fn new(version: usize) -> Self {
        debug_assert!((1..=40).contains(&version), "Invalid version: {version}");
        Self(version)
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    pub fn total_codewords(self) -> usize {
        VERSION_TOTAL_CODEWORDS[self.0 - 1]
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        let (b1_sz, b1_cnt, b2_sz, b2_cnt) = self.data_codewords_per_block(ecl);
        b1_sz * b1_cnt + b2_sz * b2_cnt
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        ECC_BLOCKS[self.0 - 1][ecl as usize].0
    }

    pub fn ecc_codewords(self, ecl: ECLevel) -> usize {
        let (_, b1_cnt, _, b2_cnt) = self.data_codewords_per_block(ecl);
        (b1_cnt + b2_cnt) * self.ecc_per_block(ecl)
    }

    // (Group 1 block size, group 1 count, group 2 block size, group 2 count)
    pub fn data_codewords_per_block(self, ecl: ECLevel) -> (usize, usize, usize, usize) {
        let (_, b1_cnt, b1_sz, b2_cnt, b2_sz) = ECC_BLOCKS[self.0 - 1][ecl as usize];
        (b1_sz, b1_cnt, b2_sz, b2_cnt)
    }

    pub fn remainder_bits(self) -> usize {
        REMAINDER_BITS[self.0 - 1]
    }

    pub fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_PATTERN_POSITIONS[self.0 - 1]
    }

    pub fn mode_bits(self) -> usize {
        4
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        let bracket = match self.0 {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        match mode {
            Mode::Numeric => [10, 12, 14][bracket],
            Mode::Alphanumeric => [9, 11, 13][bracket],
            Mode::Byte => [8, 16, 16][bracket],
            Mode::Kanji => [8, 10, 12][bracket],
        }
    }

    // Smallest version whose data capacity holds `byte_len` codewords
    pub fn min_for_capacity(byte_len: usize, ecl: ECLevel) -> Option<Self> {
        (1..=40).map(Self).find(|v| v.data_codewords(ecl) >= byte_len)
    }

    pub fn version_info(self) -> u32 {
        debug_assert!(self.0 >= 7, "Version info is only drawn from version 7: {}", self.0);
        VERSION_INFOS[self.0 - 7]
    }
}

#[cfg(test)]
mod version_tests {
    use test_case::test_case;

    use super::{ECLevel, Version};
    use crate::common::codec::Mode;

    #[test]
    fn test_width() {
        assert_eq!(Version::new(1).width(), 21);
        assert_eq!(Version::new(7).width(), 45);
        assert_eq!(Version::new(40).width(), 177);
    }

    #[test_case(1, ECLevel::L, 19, 7)]
    #[test_case(1, ECLevel::M, 16, 10)]
    #[test_case(5, ECLevel::Q, 62, 72)]
    #[test_case(10, ECLevel::H, 122, 224)]
    #[test_case(40, ECLevel::L, 2956, 750)]
    #[test_case(40, ECLevel::H, 1276, 2430)]
    fn test_codewords(ver: usize, ecl: ECLevel, data: usize, ecc: usize) {
        let ver = Version::new(ver);
        assert_eq!(ver.data_codewords(ecl), data);
        assert_eq!(ver.ecc_codewords(ecl), ecc);
        assert_eq!(ver.data_codewords(ecl) + ver.ecc_codewords(ecl), ver.total_codewords());
    }

    #[test]
    fn test_block_partition_sums_to_capacity() {
        for v in 1..=40 {
            let ver = Version::new(v);
            for ecl in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
                let (b1_sz, b1_cnt, b2_sz, b2_cnt) = ver.data_codewords_per_block(ecl);
                assert!(b1_cnt > 0);
                assert!(b2_cnt == 0 || b2_sz == b1_sz + 1, "Version {v} {ecl:?}");
                assert_eq!(
                    (b1_sz + ver.ecc_per_block(ecl)) * b1_cnt
                        + (b2_sz + ver.ecc_per_block(ecl)) * b2_cnt,
                    ver.total_codewords()
                );
            }
        }
    }

    #[test]
    fn test_capacity_is_monotonic() {
        for ecl in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
            for v in 1..40 {
                assert!(
                    Version::new(v).data_codewords(ecl) < Version::new(v + 1).data_codewords(ecl)
                );
            }
        }
    }

    #[test]
    fn test_char_cnt_bits() {
        assert_eq!(Version::new(9).char_cnt_bits(Mode::Numeric), 10);
        assert_eq!(Version::new(10).char_cnt_bits(Mode::Alphanumeric), 11);
        assert_eq!(Version::new(26).char_cnt_bits(Mode::Byte), 16);
        assert_eq!(Version::new(27).char_cnt_bits(Mode::Kanji), 12);
    }

    #[test]
    fn test_min_for_capacity() {
        assert_eq!(Version::min_for_capacity(19, ECLevel::L), Some(Version::new(1)));
        assert_eq!(Version::min_for_capacity(20, ECLevel::L), Some(Version::new(2)));
        assert_eq!(Version::min_for_capacity(1276, ECLevel::H), Some(Version::new(40)));
        assert_eq!(Version::min_for_capacity(1277, ECLevel::H), None);
    }

    #[test]
    fn test_version_info() {
        assert_eq!(Version::new(7).version_info(), 0x07C94);
        assert_eq!(Version::new(40).version_info(), 0x28C69);
    }
}

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl TryFrom<char> for ECLevel {
    type Error = QRError;
    fn try_from(c: char) -> QRResult<Self> {
        match c.to_ascii_uppercase() {
            'L' => Ok(Self::L),
            'M' => Ok(Self::M),
            'Q' => Ok(Self::Q),
            'H' => Ok(Self::H),
            _ => Err(QRError::InvalidECLevel),
        }
    }
}

impl FromStr for ECLevel {
    type Err = QRError;
    fn from_str(s: &str) -> QRResult<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            _ => Err(QRError::InvalidECLevel),
        }
    }
}

#[cfg(test)]
mod ec_level_tests {
    use test_case::test_case;

    use super::ECLevel;
    use crate::common::error::QRError;

    #[test_case("L", ECLevel::L)]
    #[test_case("m", ECLevel::M)]
    #[test_case(" Q ", ECLevel::Q)]
    #[test_case("h", ECLevel::H)]
    fn test_parse(s: &str, exp: ECLevel) {
        assert_eq!(s.parse::<ECLevel>().unwrap(), exp);
    }

    #[test_case("")]
    #[test_case("X")]
    #[test_case("LM")]
    #[test_case("low")]
    fn test_parse_invalid(s: &str) {
        assert_eq!(s.parse::<ECLevel>(), Err(QRError::InvalidECLevel));
    }
}

// Format info
//------------------------------------------------------------------------------

pub fn format_info_qr(ecl: ECLevel, mask: MaskPattern) -> u32 {
    // Format bits order ec levels as M, L, H, Q
    let format_data = (((ecl as usize) ^ 1) << 3) | (*mask as usize);
    FORMAT_INFOS_QR[format_data]
}

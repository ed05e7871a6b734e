use std::ops::Range;

use crate::common::metadata::Version;

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
    Kanji = 0b1000,
}

impl Mode {
    // Kanji spans two bytes and is classified by the segmenter instead
    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => Self::alphanumeric_digit(byte).is_some(),
            Self::Byte => true,
            Self::Kanji => false,
        }
    }

    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> Option<u16> {
        let digit = match char {
            b'0'..=b'9' => char - b'0',
            b'A'..=b'Z' => char - b'A' + 10,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => return None,
        };
        Some(digit as u16)
    }

    // Shift JIS word remapped into the 13 bit kanji space
    #[inline]
    fn kanji_digit(hi: u8, lo: u8) -> u16 {
        let word = ((hi as u16) << 8) | lo as u16;
        debug_assert!(
            matches!(word, 0x8140..=0x9FFC | 0xE040..=0xEBBF),
            "Invalid kanji data: {word:#06x}"
        );
        let word = if word <= 0x9FFC { word - 0x8140 } else { word - 0xC140 };
        (word >> 8) * 0xC0 + (word & 0xFF)
    }

    pub fn encode_chunk(&self, data: &[u8]) -> u16 {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Data is too long for numeric conver: {len}");
                data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric conver: {len}");
                data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b).unwrap_or(0))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Data is too long for byte conver: {len}");
                data[0] as u16
            }
            Self::Kanji => {
                debug_assert!(len == 2, "Kanji chunk must be 2 bytes: {len}");
                Self::kanji_digit(data[0], data[1])
            }
        }
    }

    // Bit length of a chunk of `len` bytes produced by encode_chunk
    pub fn chunk_bit_len(&self, len: usize) -> usize {
        match self {
            Self::Numeric => (len * 10 + 2) / 3,
            Self::Alphanumeric => (len * 11 + 1) / 2,
            Self::Byte => 8,
            Self::Kanji => 13,
        }
    }

    pub fn chunk_size(&self) -> usize {
        match self {
            Self::Numeric => 3,
            Self::Alphanumeric | Self::Kanji => 2,
            Self::Byte => 1,
        }
    }

    // Payload bits for `len` bytes, excluding mode & char count indicators
    pub fn encoded_len(&self, len: usize) -> usize {
        match self {
            Self::Numeric => len / 3 * 10 + [0, 4, 7][len % 3],
            Self::Alphanumeric => len / 2 * 11 + 6 * (len & 1),
            Self::Byte => len * 8,
            Self::Kanji => len / 2 * 13,
        }
    }

    // Bytes that fit under one char count indicator
    pub fn max_bytes(&self, ver: Version) -> usize {
        let max_chars = (1 << ver.char_cnt_bits(*self)) - 1;
        match self {
            Self::Kanji => max_chars * 2,
            _ => max_chars,
        }
    }
}


// Segment
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Segment<'a> {
    pub mode: Mode,
    // Byte offset of the segment in the payload
    pub offset: usize,
    pub data: &'a [u8],
}

impl<'a> Segment<'a> {
    pub fn new(mode: Mode, offset: usize, data: &'a [u8]) -> Self {
        debug_assert!(
            mode != Mode::Kanji || data.len() & 1 == 0,
            "Kanji segment must hold whole characters: Len {}",
            data.len()
        );
        Self { mode, offset, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.data.len()
    }

    pub fn char_count(&self) -> usize {
        match self.mode {
            Mode::Kanji => self.data.len() / 2,
            _ => self.data.len(),
        }
    }

    // Pieces that each fit under one char count indicator for the version
    pub fn split(&self, ver: Version) -> impl Iterator<Item = Segment<'a>> + '_ {
        let max_bytes = self.mode.max_bytes(ver);
        let (mode, offset) = (self.mode, self.offset);
        self.data
            .chunks(max_bytes)
            .enumerate()
            .map(move |(i, chunk)| Segment::new(mode, offset + i * max_bytes, chunk))
    }

    // Bits emitted for the segment at the version, headers of split pieces included
    pub fn bit_len(&self, ver: Version) -> usize {
        let header_len = ver.mode_bits() + ver.char_cnt_bits(self.mode);
        self.split(ver).map(|s| header_len + self.mode.encoded_len(s.len())).sum()
    }
}


// Global constants
//------------------------------------------------------------------------------

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

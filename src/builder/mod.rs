mod qr;

#[cfg(test)]
pub(crate) use qr::Module;
pub use qr::QR;

use tracing::debug;

use crate::common::codec::encode;
use crate::common::ec::{compute_ecc, interleave};
use crate::common::error::{QRError, QRResult};
use crate::common::mask::{apply_best_mask, MaskPattern, MaskSearch};
use crate::common::metadata::ECLevel;
use crate::common::BitStream;

/// Configures and builds a [`QR`] from a byte payload.
///
/// ```
/// use qrforge::{ECLevel, QRBuilder};
///
/// let qr = QRBuilder::new(b"HELLO WORLD").ec_level(ECLevel::Q).build().unwrap();
/// assert_eq!(*qr.version(), 1);
/// ```
pub struct QRBuilder<'a> {
    data: &'a [u8],
    ec_level: ECLevel,
    detect_kanji: bool,
    mask: Option<MaskPattern>,
    mask_search: MaskSearch,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            ec_level: ECLevel::L,
            detect_kanji: false,
            mask: None,
            mask_search: MaskSearch::Full,
        }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    /// Encodes valid Shift JIS double byte characters in Kanji mode.
    pub fn detect_kanji(&mut self, detect_kanji: bool) -> &mut Self {
        self.detect_kanji = detect_kanji;
        self
    }

    /// Forces a mask pattern, skipping the penalty search.
    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn mask_search(&mut self, mask_search: MaskSearch) -> &mut Self {
        self.mask_search = mask_search;
        self
    }

    pub fn metadata(&self) -> String {
        let mask = match self.mask {
            Some(m) => format!("{}", *m),
            None => format!("{:?}", self.mask_search),
        };
        format!(
            "{{ Ec level: {:?}, Detect kanji: {}, Mask: {mask} }}",
            self.ec_level, self.detect_kanji
        )
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        debug!(config = %self.metadata(), "Generating QR");
        if self.data.is_empty() {
            return Err(QRError::EmptyData);
        }
        if let Some(m) = self.mask {
            MaskPattern::try_from(*m)?;
        }

        let (encoded_data, version) = encode(self.data, self.ec_level, self.detect_kanji)?;
        debug!(version = *version, bits = encoded_data.len(), "Data encoded");

        let (data_blocks, ecc_blocks) = compute_ecc(encoded_data.data(), version, self.ec_level)?;
        let mut payload = BitStream::new(version.total_codewords() << 3);
        payload.extend(&interleave(&data_blocks));
        payload.extend(&interleave(&ecc_blocks));
        debug!(blocks = data_blocks.len(), codewords = payload.len() >> 3, "Payload interleaved");

        let mut qr = QR::new(version, self.ec_level);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(payload)?;

        match self.mask {
            Some(m) => qr.apply_mask(m),
            None => {
                apply_best_mask(&mut qr, &self.mask_search);
            }
        }

        let total_modules = qr.width() * qr.width();
        let dark_modules = qr.count_dark_modules();
        debug!(
            qr = %qr.metadata(),
            data_size = self.data.len(),
            data_capacity = version.data_codewords(self.ec_level),
            ec_capacity = qr.ec_capacity(),
            dark_modules,
            light_modules = total_modules - dark_modules,
            balance = dark_modules * 100 / total_modules,
            "QR generated"
        );

        Ok(qr)
    }
}

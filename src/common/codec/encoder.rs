pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use tracing::{debug, error, trace};

    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{segment, Segment};
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};

    use super::writer::{pad_remaining_capacity, push_segment, push_terminator};

    // Segments the payload, picks the smallest fitting version and writes the
    // padded data codewords
    pub fn encode(data: &[u8], ecl: ECLevel, detect_kanji: bool) -> QRResult<(BitStream, Version)> {
        let segs = segment(data, detect_kanji)?;
        debug!(segments = segs.len(), "Payload segmented");
        trace!(
            layout = ?segs.iter().map(|s| (s.mode, s.range())).collect::<Vec<_>>(),
            "Segment layout"
        );

        let ver = estimate_version(&segs, ecl)?;
        let bs = encode_with_version(&segs, ver, ecl)?;
        Ok((bs, ver))
    }

    pub fn encode_with_version(segs: &[Segment], ver: Version, ecl: ECLevel) -> QRResult<BitStream> {
        let bcap = ver.data_bit_capacity(ecl);
        let bits = total_bit_len(segs, ver);
        debug_assert!(bits <= bcap, "Estimated version too small: Bits {bits}, Capacity {bcap}");
        if bits > bcap {
            error!(bits, capacity = bcap, version = *ver, "Segments overflow estimated version");
            return Err(QRError::InternalInconsistency("Segments overflow the estimated version"));
        }

        let mut bs = BitStream::new(bcap);
        for seg in segs {
            for piece in seg.split(ver) {
                push_segment(&piece, ver, &mut bs);
            }
        }
        debug_assert_eq!(bs.len(), bits, "Written bits differ from estimate");

        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);
        Ok(bs)
    }

    // Fixed point over the version bracket. The trial never decreases, and a
    // trial that overflows every capacity is retried once at version 40. Count
    // indicators are narrower below the settled trial, so the smallest version
    // that fits at its own widths is picked afterwards.
    pub fn estimate_version(segs: &[Segment], ecl: ECLevel) -> QRResult<Version> {
        let mut trial = Version::MIN;
        loop {
            let bits = total_bit_len(segs, trial);
            match Version::min_for_capacity((bits + 7) >> 3, ecl) {
                Some(ver) if ver <= trial => break,
                Some(ver) => trial = ver,
                None if trial < Version::MAX => trial = Version::MAX,
                None => break,
            }
        }

        let fits = |ver: Version| total_bit_len(segs, ver) <= ver.data_bit_capacity(ecl);
        match (*Version::MIN..=*trial).map(Version::new).find(|&ver| fits(ver)) {
            Some(ver) => {
                debug!(version = *ver, trial = *trial, ec_level = ?ecl, "Version estimated");
                Ok(ver)
            }
            None => Err(QRError::CapacityExceeded {
                required_bits: total_bit_len(segs, Version::MAX),
                capacity_bits: Version::MAX.data_bit_capacity(ecl),
            }),
        }
    }

    pub fn total_bit_len(segs: &[Segment], ver: Version) -> usize {
        segs.iter().map(|s| s.bit_len(ver)).sum()
    }

}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, Segment, PADDING_CODEWORDS};
    use crate::common::metadata::Version;

    pub fn push_segment(seg: &Segment, ver: Version, out: &mut BitStream) {
        push_header(seg, ver, out);
        push_data(seg.mode, seg.data, out);
    }

    fn push_header(seg: &Segment, ver: Version, out: &mut BitStream) {
        out.push_bits(seg.mode as u8, ver.mode_bits());
        let char_cnt = seg.char_count();
        let len_bits = ver.char_cnt_bits(seg.mode);
        debug_assert!(
            char_cnt < (1 << len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {len_bits}"
        );
        out.push_bits(char_cnt as u16, len_bits);
    }

    fn push_data(mode: Mode, data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(mode.chunk_size()) {
            let len = mode.chunk_bit_len(chunk.len());
            out.push_bits(mode.encode_chunk(chunk), len);
        }
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            let padding_bits_len = 8 - offset;
            out.push_bits(0, padding_bits_len);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        let offset = out.len() & 7;
        debug_assert!(
            offset == 0,
            "Bit offset should be zero before padding codewords: {}",
            offset
        );

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

}

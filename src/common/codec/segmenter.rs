use encoding_rs::SHIFT_JIS;

use super::types::{Mode, Segment};
use crate::common::error::{QRError, QRResult};
use crate::common::metadata::Version;

// Segmenter
//------------------------------------------------------------------------------

// Greedy mode segmentation. A numeric or alphanumeric run survives only while
// switching to it costs fewer bits than absorbing it into the surrounding mode.
// Switch costs use the char count widths of the smallest version bracket.
pub fn segment(data: &[u8], detect_kanji: bool) -> QRResult<Vec<Segment>> {
    if data.is_empty() {
        return Err(QRError::EmptyData);
    }

    let segmenter = Segmenter::new(data, detect_kanji);
    let mut segs: Vec<Segment> = Vec::new();
    let mut pos = 0;
    while pos < data.len() {
        let (mode, len) = match segmenter.identify(pos) {
            Mode::Numeric => segmenter.eat_numeric(pos),
            Mode::Alphanumeric => segmenter.eat_alphanumeric(pos),
            Mode::Kanji => segmenter.eat_kanji(pos),
            Mode::Byte => segmenter.eat_byte(pos),
        };
        debug_assert!(len > 0, "Segmenter made no progress at {pos}");

        // Adjacent pieces of the same mode share one header
        match segs.last_mut() {
            Some(last) if last.mode == mode => {
                *last = Segment::new(mode, last.offset, &data[last.offset..pos + len]);
            }
            _ => segs.push(Segment::new(mode, pos, &data[pos..pos + len])),
        }
        pos += len;
    }
    Ok(segs)
}

struct Segmenter<'a> {
    data: &'a [u8],
    detect_kanji: bool,
    // Char count widths
    num_cnt_bits: usize,
    alnum_cnt_bits: usize,
}

impl<'a> Segmenter<'a> {
    fn new(data: &'a [u8], detect_kanji: bool) -> Self {
        let ver = Version::MIN;
        Self {
            data,
            detect_kanji,
            num_cnt_bits: ver.char_cnt_bits(Mode::Numeric),
            alnum_cnt_bits: ver.char_cnt_bits(Mode::Alphanumeric),
        }
    }

    fn identify(&self, pos: usize) -> Mode {
        let Some(&b) = self.data.get(pos) else {
            return Mode::Byte;
        };
        if Mode::Numeric.contains(b) {
            Mode::Numeric
        } else if Mode::Alphanumeric.contains(b) {
            Mode::Alphanumeric
        } else if self.detect_kanji && self.is_kanji(pos) {
            Mode::Kanji
        } else {
            Mode::Byte
        }
    }

    fn is_kanji(&self, pos: usize) -> bool {
        let Some(pair) = self.data.get(pos..pos + 2) else {
            return false;
        };
        let word = ((pair[0] as u16) << 8) | pair[1] as u16;
        if !matches!(word, 0x8140..=0x9FFC | 0xE040..=0xEBBF) {
            return false;
        }
        if !matches!(pair[1], 0x40..=0xFC) || pair[1] == 0x7F {
            return false;
        }
        // Reject holes in the JIS X 0208 table so kanji segments round trip
        let (_, had_errors) = SHIFT_JIS.decode_without_bom_handling(pair);
        !had_errors
    }

    fn is_mode_at(&self, mode: Mode, pos: usize) -> bool {
        self.data.get(pos).is_some_and(|&b| mode.contains(b))
    }

    fn run_len(&self, mode: Mode, pos: usize) -> usize {
        self.data[pos..].iter().take_while(|&&b| mode.contains(b)).count()
    }

    fn num_switch_bits(&self) -> isize {
        (4 + self.num_cnt_bits) as isize
    }

    fn alnum_switch_bits(&self) -> isize {
        (4 + self.alnum_cnt_bits) as isize
    }

    fn eat_numeric(&self, start: usize) -> (Mode, usize) {
        let run = self.run_len(Mode::Numeric, start);
        let num_bits = est(Mode::Numeric, run) + self.num_switch_bits();
        match self.identify(start + run) {
            // A run ending the payload has no switch back to pay for
            _ if start + run == self.data.len() => (),
            Mode::Byte => {
                let dif = num_bits + est(Mode::Byte, 1) - est(Mode::Byte, run + 1);
                if dif > 0 {
                    return self.eat_byte(start);
                }
            }
            Mode::Alphanumeric => {
                let dif = num_bits + est(Mode::Alphanumeric, 1) - est(Mode::Alphanumeric, run + 1);
                if dif > 0 {
                    return self.eat_alphanumeric(start);
                }
            }
            _ => (),
        }
        (Mode::Numeric, run)
    }

    fn eat_alphanumeric(&self, start: usize) -> (Mode, usize) {
        let mut p = start;
        while self.is_mode_at(Mode::Alphanumeric, p) {
            if self.is_mode_at(Mode::Numeric, p) {
                let q = p + self.run_len(Mode::Numeric, p);
                let dif = est(Mode::Alphanumeric, p - start)
                    + est(Mode::Numeric, q - p)
                    + self.num_switch_bits()
                    - est(Mode::Alphanumeric, q - start);
                if dif < 0 {
                    break;
                }
                p = q;
            } else {
                p += 1;
            }
        }

        let run = p - start;
        // Kept as is at the end of the payload, like numeric runs
        if p < self.data.len() && !self.is_mode_at(Mode::Alphanumeric, p) {
            let dif = est(Mode::Alphanumeric, run) + self.alnum_switch_bits() + est(Mode::Byte, 1)
                - est(Mode::Byte, run + 1);
            if dif > 0 {
                return self.eat_byte(start);
            }
        }
        (Mode::Alphanumeric, run)
    }

    fn eat_kanji(&self, start: usize) -> (Mode, usize) {
        let mut p = start;
        while self.identify(p) == Mode::Kanji {
            p += 2;
        }
        (Mode::Kanji, p - start)
    }

    fn eat_byte(&self, start: usize) -> (Mode, usize) {
        let len = self.data.len();
        let mut p = start + 1;
        while p < len {
            match self.identify(p) {
                Mode::Kanji => break,
                Mode::Numeric => {
                    let q = p + self.run_len(Mode::Numeric, p);
                    let dif = est(Mode::Byte, p - start)
                        + est(Mode::Numeric, q - p)
                        + self.num_switch_bits()
                        - est(Mode::Byte, q - start);
                    if dif < 0 {
                        break;
                    }
                    p = q;
                }
                Mode::Alphanumeric => {
                    let q = p + self.run_len(Mode::Alphanumeric, p);
                    let dif = est(Mode::Byte, p - start)
                        + est(Mode::Alphanumeric, q - p)
                        + self.alnum_switch_bits()
                        - est(Mode::Byte, q - start);
                    if dif < 0 {
                        break;
                    }
                    p = q;
                }
                Mode::Byte => p += 1,
            }
        }
        (Mode::Byte, p - start)
    }
}

fn est(mode: Mode, len: usize) -> isize {
    mode.encoded_len(len) as isize
}

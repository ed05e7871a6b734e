use std::ops::Deref;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, trace};

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

// Mask pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> Self {
        debug_assert!(pattern < 8, "Invalid masking pattern: {pattern}");
        Self(pattern)
    }

    pub fn all() -> impl Iterator<Item = MaskPattern> {
        (0..8).map(Self)
    }
}

impl TryFrom<u8> for MaskPattern {
    type Error = QRError;
    fn try_from(pattern: u8) -> QRResult<Self> {
        if pattern < 8 {
            Ok(Self(pattern))
        } else {
            Err(QRError::InvalidMaskPattern)
        }
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        let (r, c) = (r as i32, c as i32);
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        let (r, c) = (r as i32, c as i32);
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        let (r, c) = (r as i32, c as i32);
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_functions(self) -> fn(i16, i16) -> bool {
        debug_assert!(*self < 8, "Invalid pattern");

        match *self & 0b111 {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            _ => mask_functions::meadow,
        }
    }
}


// Mask search
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum MaskSearch {
    // All 8 patterns in id order
    #[default]
    Full,
    // `count` distinct patterns drawn from a seeded shuffle, evaluated in draw order
    Sampled { count: usize, seed: u64 },
}

impl MaskSearch {
    pub fn candidates(&self) -> Vec<MaskPattern> {
        match *self {
            Self::Full => MaskPattern::all().collect(),
            Self::Sampled { count, seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut masks = MaskPattern::all().collect::<Vec<_>>();
                masks.shuffle(&mut rng);
                masks.truncate(count.clamp(1, 8));
                masks
            }
        }
    }
}


// Mask selection
//------------------------------------------------------------------------------

// Applies the candidate with the lowest penalty, earliest candidate on ties
pub fn apply_best_mask(qr: &mut QR, search: &MaskSearch) -> MaskPattern {
    let candidates = search.candidates();
    debug_assert!(!candidates.is_empty(), "No mask candidates");

    let best = candidates
        .into_iter()
        .map(|m| {
            let mut qr = qr.clone();
            qr.apply_mask(m);
            let penalty = compute_total_penalty(&qr);
            trace!(mask = *m, penalty, "Mask candidate scored");
            (m, penalty)
        })
        .min_by_key(|&(_, penalty)| penalty);

    let (best_mask, penalty) = best.unwrap_or((MaskPattern(0), 0));
    debug!(mask = *best_mask, penalty, "Mask selected");
    qr.apply_mask(best_mask);
    best_mask
}

// Penalty scoring
//------------------------------------------------------------------------------

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let mut runs = Vec::with_capacity(w as usize + 1);
    let mut pen = 0;
    for i in 0..w {
        collect_runs((0..w).map(|j| *qr.get(i, j)), &mut runs);
        pen += compute_adjacent_penalty(&runs) + compute_finder_pattern_penalty(&runs);
        collect_runs((0..w).map(|j| *qr.get(j, i)), &mut runs);
        pen += compute_adjacent_penalty(&runs) + compute_finder_pattern_penalty(&runs);
    }
    pen + compute_block_penalty(qr) + compute_balance_penalty(qr)
}

// Run lengths of a line, light runs on even indices. A line starting dark gets
// an empty leading light run.
fn collect_runs(line: impl Iterator<Item = Color>, runs: &mut Vec<usize>) {
    runs.clear();
    runs.push(0);
    let mut last = Color::Light;
    for clr in line {
        if clr != last {
            runs.push(0);
            last = clr;
        }
        if let Some(len) = runs.last_mut() {
            *len += 1;
        }
    }
}

// N1: 3 for a run of 5, plus 1 per extra module
fn compute_adjacent_penalty(runs: &[usize]) -> u32 {
    runs.iter().filter(|&&len| len >= 5).map(|&len| (3 + len - 5) as u32).sum()
}

// N3: dark runs in 1:1:3:1:1 proportion with a 4 unit light margin on either
// side. The symbol edge counts as light.
fn compute_finder_pattern_penalty(runs: &[usize]) -> u32 {
    let n = runs.len();
    let mut pen = 0;
    for i in (3..n.saturating_sub(2)).step_by(2) {
        let len = runs[i];
        if len % 3 != 0 {
            continue;
        }
        let fact = len / 3;
        if runs[i - 2] != fact || runs[i - 1] != fact || runs[i + 1] != fact || runs[i + 2] != fact
        {
            continue;
        }
        let left_margin = i == 3 || runs[i - 3] >= 4 * fact;
        let right_margin = i + 4 >= n || runs[i + 3] >= 4 * fact;
        if left_margin || right_margin {
            pen += 40;
        }
    }
    pen
}

// N2: 3 per 2x2 block of one color
fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

// N4: 10 per 5% step away from an even dark ratio
fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark_cnt = qr.count_dark_modules();
    let w = qr.width();
    let tot = w * w;
    let percent = (dark_cnt * 100 / tot) as i64;
    ((percent - 50).unsigned_abs() / 5 * 10) as u32
}

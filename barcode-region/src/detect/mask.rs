use super::gradient::GradientField;

/// Boolean grid over the block grid of a [`GradientField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMask {
    pub cols: u32,
    pub rows: u32,
    pub block_size: u32,
    pub bits: Vec<bool>,
}

impl CandidateMask {
    /// Create an all-false mask.
    pub fn new(cols: u32, rows: u32, block_size: u32) -> Self {
        Self {
            cols,
            rows,
            block_size,
            bits: vec![false; (cols * rows) as usize],
        }
    }

    #[inline]
    pub fn get(&self, bx: u32, by: u32) -> bool {
        self.bits[(by * self.cols + bx) as usize]
    }

    #[inline]
    pub fn set(&mut self, bx: u32, by: u32, val: bool) {
        self.bits[(by * self.cols + bx) as usize] = val;
    }

    /// Number of set blocks.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Number of set blocks inside the inclusive block range.
    pub fn count_in(&self, bx0: u32, by0: u32, bx1: u32, by1: u32) -> u32 {
        let mut n = 0;
        for by in by0..=by1 {
            for bx in bx0..=bx1 {
                if self.get(bx, by) {
                    n += 1;
                }
            }
        }
        n
    }

    /// Longest run of consecutive set blocks along any row of the inclusive range.
    pub fn longest_run_in(&self, bx0: u32, by0: u32, bx1: u32, by1: u32) -> u32 {
        let mut best = 0;
        for by in by0..=by1 {
            let mut run = 0;
            for bx in bx0..=bx1 {
                if self.get(bx, by) {
                    run += 1;
                    best = best.max(run);
                } else {
                    run = 0;
                }
            }
        }
        best
    }
}

/// Mark every block whose score is strictly above `threshold`.
pub fn candidate_mask(field: &GradientField, threshold: f32) -> CandidateMask {
    let mut mask = CandidateMask::new(field.cols, field.rows, field.block_size);
    for by in 0..field.rows {
        for bx in 0..field.cols {
            mask.set(bx, by, field.get(bx, by) > threshold);
        }
    }
    mask
}

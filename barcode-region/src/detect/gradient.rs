use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use super::image::GrayView;
use crate::config::GradientParams;

/// Upper bound of a block score. Scores are mean absolute differences of
/// 8-bit samples, so they never exceed this before clamping.
pub const MAX_SCORE: f32 = 255.0;

/// Per-block horizontal edge energy.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    /// Number of block columns, `ceil(width / block_size)`.
    pub cols: u32,
    /// Number of block rows, `ceil(height / block_size)`.
    pub rows: u32,
    pub block_size: u32,
    /// Row-major scores in `[0, MAX_SCORE]`.
    pub scores: Vec<f32>,
}

impl GradientField {
    #[inline]
    pub fn get(&self, bx: u32, by: u32) -> f32 {
        self.scores[(by * self.cols + bx) as usize]
    }
}

/// Score every block of the image.
///
/// When a cancel flag is supplied it is polled once per block row; `None` is
/// returned as soon as it is seen raised.
pub fn gradient_field(
    img: &GrayView,
    params: &GradientParams,
    cancel: Option<&AtomicBool>,
) -> Option<GradientField> {
    let bs = params.block_size.max(1);
    let cols = img.width().div_ceil(bs);
    let rows = img.height().div_ceil(bs);

    let cancelled = || cancel.is_some_and(|c| c.load(Ordering::Relaxed));

    #[cfg(feature = "parallel")]
    let row_scores: Option<Vec<Vec<f32>>> = (0..rows)
        .into_par_iter()
        .map(|by| {
            if cancelled() {
                None
            } else {
                Some(score_block_row(img, params, by, cols))
            }
        })
        .collect();

    #[cfg(not(feature = "parallel"))]
    let row_scores: Option<Vec<Vec<f32>>> = (0..rows)
        .map(|by| {
            if cancelled() {
                None
            } else {
                Some(score_block_row(img, params, by, cols))
            }
        })
        .collect();

    let scores = row_scores?.concat();
    Some(GradientField {
        cols,
        rows,
        block_size: bs,
        scores,
    })
}

fn score_block_row(img: &GrayView, params: &GradientParams, by: u32, cols: u32) -> Vec<f32> {
    let bs = params.block_size.max(1);
    let y0 = by * bs;
    let y1 = y0.saturating_add(bs).min(img.height());
    (0..cols)
        .map(|bx| {
            let x0 = bx * bs;
            let x1 = x0.saturating_add(bs).min(img.width());
            score_block(img, params, x0, x1, y0, y1)
        })
        .collect()
}

/// Rows sampled inside `[y0, y1)`: `n` rows spread evenly, one per row at most.
fn scanlines(y0: u32, y1: u32, n: u32) -> impl Iterator<Item = u32> {
    let h = y1 - y0;
    let n = n.clamp(1, h.max(1));
    let (h, n) = (h as u128, n as u128);
    (0..n).map(move |i| y0 + ((2 * i + 1) * h / (2 * n)) as u32)
}

/// Score one clipped block `[x0, x1) x [y0, y1)`.
pub fn score_block(
    img: &GrayView,
    params: &GradientParams,
    x0: u32,
    x1: u32,
    y0: u32,
    y1: u32,
) -> f32 {
    if x1 <= x0 + 1 || y1 <= y0 {
        return 0.0;
    }
    let level = params.binarize_level;
    let sample = |v: u8| -> i32 {
        match level {
            Some(t) if v > t => 255,
            Some(_) => 0,
            None => v as i32,
        }
    };

    let (xs, xe) = (x0 as usize, x1 as usize);
    let mut h_sum = 0u64;
    let mut h_count = 0u64;
    let mut v_sum = 0u64;
    let mut v_count = 0u64;

    for y in scanlines(y0, y1, params.scanlines_per_block) {
        let row = &img.row(y)[xs..xe];
        for pair in row.windows(2) {
            h_sum += (sample(pair[1]) - sample(pair[0])).unsigned_abs() as u64;
        }
        h_count += (row.len() - 1) as u64;

        // Pair with the next row inside the block, or the previous one at
        // the bottom edge. Single-row blocks have no vertical term.
        let other = if y + 1 < y1 {
            y + 1
        } else if y > y0 {
            y - 1
        } else {
            continue;
        };
        let other_row = &img.row(other)[xs..xe];
        for (&a, &b) in row.iter().zip(other_row) {
            v_sum += (sample(a) - sample(b)).unsigned_abs() as u64;
        }
        v_count += row.len() as u64;
    }

    let horizontal = h_sum as f32 / h_count as f32;
    let vertical = if v_count > 0 {
        v_sum as f32 / v_count as f32
    } else {
        0.0
    };
    (horizontal - params.vertical_weight * vertical).clamp(0.0, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(block_size: u32) -> GradientParams {
        GradientParams {
            block_size,
            scanlines_per_block: 8,
            binarize_level: None,
            vertical_weight: 1.0,
        }
    }

    /// Vertical bars of the given width alternating 0/255.
    fn bars(w: u32, h: u32, bar: u32) -> Vec<u8> {
        let mut buf = vec![0u8; (w * h) as usize];
        for y in 0..h {
            for x in 0..w {
                buf[(y * w + x) as usize] = if (x / bar) % 2 == 0 { 0 } else { 255 };
            }
        }
        buf
    }

    #[test]
    fn field_dimensions_round_up() {
        let buf = vec![0u8; 33 * 17];
        let img = GrayView::new(33, 17, &buf).unwrap();
        let field = gradient_field(&img, &params(16), None).unwrap();
        assert_eq!(field.cols, 3);
        assert_eq!(field.rows, 2);
        assert_eq!(field.scores.len(), 6);
    }

    #[test]
    fn uniform_image_scores_zero() {
        let buf = vec![77u8; 64 * 64];
        let img = GrayView::new(64, 64, &buf).unwrap();
        let field = gradient_field(&img, &params(16), None).unwrap();
        assert!(field.scores.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn vertical_bars_score_by_bar_width() {
        let buf = bars(32, 32, 2);
        let img = GrayView::new(32, 32, &buf).unwrap();
        let field = gradient_field(&img, &params(16), None).unwrap();
        // 15 pairs per row, transitions at x = 1, 3, ..., 13 → 7 * 255 / 15
        let expected = 7.0 * 255.0 / 15.0;
        for &s in &field.scores {
            assert!((s - expected).abs() < 1e-3, "score {s}");
        }
    }

    #[test]
    fn horizontal_stripes_are_suppressed() {
        // Rows alternate 0/255: no horizontal energy at all.
        let mut buf = vec![0u8; 32 * 32];
        for y in 0..32 {
            for x in 0..32 {
                buf[y * 32 + x] = if y % 2 == 0 { 0 } else { 255 };
            }
        }
        let img = GrayView::new(32, 32, &buf).unwrap();
        let field = gradient_field(&img, &params(16), None).unwrap();
        assert!(field.scores.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn checkerboard_cancels_with_vertical_weight() {
        let mut buf = vec![0u8; 16 * 16];
        for y in 0..16 {
            for x in 0..16 {
                buf[y * 16 + x] = if (x + y) % 2 == 0 { 0 } else { 255 };
            }
        }
        let img = GrayView::new(16, 16, &buf).unwrap();
        let field = gradient_field(&img, &params(16), None).unwrap();
        assert_eq!(field.get(0, 0), 0.0);

        let mut plain = params(16);
        plain.vertical_weight = 0.0;
        let field = gradient_field(&img, &plain, None).unwrap();
        assert!((field.get(0, 0) - 255.0).abs() < 1e-3);
    }

    #[test]
    fn binarize_level_flattens_low_contrast_noise() {
        // Values wobble between 100 and 120: below a level of 128 they all map to 0.
        let mut buf = vec![0u8; 16 * 16];
        for (i, v) in buf.iter_mut().enumerate() {
            *v = if i % 2 == 0 { 100 } else { 120 };
        }
        let img = GrayView::new(16, 16, &buf).unwrap();
        let mut p = params(16);
        p.vertical_weight = 0.0;
        let raw = gradient_field(&img, &p, None).unwrap();
        assert!(raw.get(0, 0) > 0.0);

        p.binarize_level = Some(128);
        let binarized = gradient_field(&img, &p, None).unwrap();
        assert_eq!(binarized.get(0, 0), 0.0);
    }

    #[test]
    fn single_column_block_scores_zero() {
        // Width 17 with block 16: the last block column is one pixel wide.
        let buf = bars(17, 16, 1);
        let img = GrayView::new(17, 16, &buf).unwrap();
        let field = gradient_field(&img, &params(16), None).unwrap();
        assert_eq!(field.cols, 2);
        assert!(field.get(0, 0) > 0.0);
        assert_eq!(field.get(1, 0), 0.0);
    }

    #[test]
    fn single_row_image_has_no_vertical_term() {
        let buf = bars(16, 1, 1);
        let img = GrayView::new(16, 1, &buf).unwrap();
        let field = gradient_field(&img, &params(16), None).unwrap();
        assert!((field.get(0, 0) - 255.0).abs() < 1e-3);
    }

    #[test]
    fn scanlines_are_distinct_and_in_range() {
        let rows: Vec<u32> = scanlines(16, 32, 8).collect();
        assert_eq!(rows, vec![17, 19, 21, 23, 25, 27, 29, 31]);
        let rows: Vec<u32> = scanlines(0, 3, 8).collect();
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn tall_block_with_many_scanlines() {
        // 2·n·h exceeds u32::MAX here.
        let (w, h) = (2u32, 50_000u32);
        let buf = bars(w, h, 1);
        let img = GrayView::new(w, h, &buf).unwrap();
        let p = GradientParams {
            block_size: 50_000,
            scanlines_per_block: 50_000,
            binarize_level: None,
            vertical_weight: 1.0,
        };
        let field = gradient_field(&img, &p, None).unwrap();
        assert_eq!((field.cols, field.rows), (1, 1));
        assert!((field.get(0, 0) - 255.0).abs() < 1e-3);

        let rows: Vec<u32> = scanlines(0, h, 50_000).collect();
        assert_eq!(rows.len(), 50_000);
        assert_eq!(rows[0], 0);
        assert_eq!(rows[49_999], 49_999);
        assert!(rows.windows(2).all(|r| r[0] < r[1]));
    }

    #[test]
    fn huge_block_size_clips_to_image() {
        let buf = bars(20, 10, 2);
        let img = GrayView::new(20, 10, &buf).unwrap();
        let field = gradient_field(&img, &params(u32::MAX), None).unwrap();
        assert_eq!((field.cols, field.rows), (1, 1));
        assert!(field.get(0, 0) > 0.0);
    }

    #[test]
    #[cfg(feature = "parallel")]
    fn parallel_field_matches_per_block_scores() {
        let (w, h) = (100u32, 70u32);
        let buf: Vec<u8> = (0..w * h).map(|i| (i.wrapping_mul(7919) % 251) as u8).collect();
        let img = GrayView::new(w, h, &buf).unwrap();
        let p = params(16);
        let field = gradient_field(&img, &p, None).unwrap();

        let mut expected = Vec::new();
        for by in 0..field.rows {
            for bx in 0..field.cols {
                let (x0, y0) = (bx * 16, by * 16);
                let x1 = (x0 + 16).min(w);
                let y1 = (y0 + 16).min(h);
                expected.push(score_block(&img, &p, x0, x1, y0, y1));
            }
        }
        assert_eq!(field.scores, expected);
    }

    #[test]
    fn raised_cancel_flag_aborts() {
        let buf = vec![0u8; 64 * 64];
        let img = GrayView::new(64, 64, &buf).unwrap();
        let flag = AtomicBool::new(true);
        assert!(gradient_field(&img, &params(16), Some(&flag)).is_none());
        let flag = AtomicBool::new(false);
        assert!(gradient_field(&img, &params(16), Some(&flag)).is_some());
    }
}

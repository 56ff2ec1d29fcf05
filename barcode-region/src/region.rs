#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned box believed to bound a 1-D barcode, in pixel coordinates.
///
/// Starts are inclusive and ends exclusive, so `x_start < x_end <= width` and
/// `y_start < y_end <= height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region {
    pub x_start: u32,
    pub x_end: u32,
    pub y_start: u32,
    pub y_end: u32,
}

impl Region {
    #[inline]
    pub fn width(&self) -> u32 {
        self.x_end - self.x_start
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.y_end - self.y_start
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f32 {
        self.width() as f32 / self.height() as f32
    }

    /// True if the two boxes share at least one pixel.
    pub fn intersects(&self, other: &Region) -> bool {
        self.x_start < other.x_end
            && other.x_start < self.x_end
            && self.y_start < other.y_end
            && other.y_start < self.y_end
    }

    /// True if the boxes, each grown by `margin` on every side, intersect or
    /// share an edge.
    pub fn near(&self, other: &Region, margin: u32) -> bool {
        let m2 = 2 * margin as u64;
        let within = |a0: u32, a1: u32, b0: u32, b1: u32| {
            (a0 as u64) <= b1 as u64 + m2 && (b0 as u64) <= a1 as u64 + m2
        };
        within(self.x_start, self.x_end, other.x_start, other.x_end)
            && within(self.y_start, self.y_end, other.y_start, other.y_end)
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Region) -> Region {
        Region {
            x_start: self.x_start.min(other.x_start),
            x_end: self.x_end.max(other.x_end),
            y_start: self.y_start.min(other.y_start),
            y_end: self.y_end.max(other.y_end),
        }
    }
}

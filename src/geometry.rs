// =============================================================================
// GEOMETRY.RS — Pixel rectangles
//
// Rectangles are given by two corners and include both of them, the same way
// a painter thinks about "from pixel 110 to pixel 390".
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::PatchError;

/// An axis-aligned pixel rectangle with **inclusive** corners.
///
/// `Rect::new(110, 90, 390, 150)` covers columns `110..=390` and rows
/// `90..=150`, i.e. 281 × 61 pixels.
///
/// Serialized as `[x0, y0, x1, y1]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u32; 4]", into = "[u32; 4]")]
pub struct Rect {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Rect {
    /// Build a rectangle from its top-left and bottom-right corners.
    ///
    /// Fails with [`PatchError::InvertedRect`] when the second corner lies
    /// left of or above the first.
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Result<Self, PatchError> {
        if x1 < x0 || y1 < y0 {
            return Err(PatchError::InvertedRect { x0, y0, x1, y1 });
        }
        Ok(Self { x0, y0, x1, y1 })
    }

    /// Const constructor for hand-written literals.
    ///
    /// Panics (at compile time when used in a `const`) if the corners are inverted.
    pub const fn ordered(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        assert!(x0 <= x1 && y0 <= y1, "rectangle corners are inverted");
        Self { x0, y0, x1, y1 }
    }

    /// Left column.
    pub fn x0(&self) -> u32 {
        self.x0
    }

    /// Top row.
    pub fn y0(&self) -> u32 {
        self.y0
    }

    /// Right column, included.
    pub fn x1(&self) -> u32 {
        self.x1
    }

    /// Bottom row, included.
    pub fn y1(&self) -> u32 {
        self.y1
    }

    /// Number of columns covered (never zero).
    #[inline]
    pub fn width(&self) -> u32 {
        self.x1 - self.x0 + 1
    }

    /// Number of rows covered (never zero).
    #[inline]
    pub fn height(&self) -> u32 {
        self.y1 - self.y0 + 1
    }

    /// Total pixel count, widened so a full `u32` range cannot overflow.
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Intersect with an image of `width × height` pixels.
    ///
    /// Returns `None` when nothing of the rectangle lands on the image.
    pub fn clip(&self, width: u32, height: u32) -> Option<Rect> {
        if width == 0 || height == 0 || self.x0 >= width || self.y0 >= height {
            return None;
        }
        Some(Rect {
            x0: self.x0,
            y0: self.y0,
            x1: self.x1.min(width - 1),
            y1: self.y1.min(height - 1),
        })
    }

    /// Iterate every `(x, y)` inside the rectangle, row by row.
    pub fn points(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y0..=self.y1).flat_map(move |y| (self.x0..=self.x1).map(move |x| (x, y)))
    }
}

impl TryFrom<[u32; 4]> for Rect {
    type Error = PatchError;

    fn try_from([x0, y0, x1, y1]: [u32; 4]) -> Result<Self, Self::Error> {
        Rect::new(x0, y0, x1, y1)
    }
}

impl From<Rect> for [u32; 4] {
    fn from(r: Rect) -> Self {
        [r.x0, r.y0, r.x1, r.y1]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

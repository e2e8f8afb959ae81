//! # Layout Module
//!
//! Pure geometry for the card: no pixels are touched here.
//!
//! ## Modules
//!
//! - [`wrap`]: Greedy word wrapping against a measure function
//! - [`allocate`]: Proportional vertical split between the two quotes
//! - [`card`]: Full card layout shared by the compositor and the hit tester
//!
//! Rendering and hit-testing both consume the same [`card::CardLayout`],
//! so a point the compositor paints always falls inside the region the
//! hit tester reports for that element.

pub mod allocate;
pub mod card;
pub mod wrap;

pub use card::{CardLayout, Frame, TextBlock, TextLine};

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two corners.
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Inclusive containment test (edges count as inside).
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Shrink by `amount` on every side.
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            self.width - 2.0 * amount,
            self.height - 2.0 * amount,
        )
    }
}

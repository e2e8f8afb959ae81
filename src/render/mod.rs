//! # Rendering Module
//!
//! Turns a card layout into pixels.
//!
//! ## Modules
//!
//! - [`canvas`]: RGBA surface with rectangle, band, blend and text primitives
//! - [`background`]: Background image decoding, data URLs and cover-fit placement
//! - [`compositor`]: Paints the full card in order
//! - [`transform`]: Rotation and blending helpers
//!
//! ## Usage Example
//!
//! ```
//! use quotecard::font::FontBook;
//! use quotecard::render::compositor::{render_card, Scene};
//! use quotecard::style::{ContentStrings, ManualOffsets, StyleParameters};
//!
//! let style = StyleParameters::default();
//! let content = ContentStrings::new("Hello world");
//! let offsets = ManualOffsets::default();
//!
//! let image = render_card(&Scene::new(&style, &content, &offsets), &FontBook::new());
//! assert_eq!(image.dimensions(), (970, 1074));
//! ```

pub mod background;
pub mod canvas;
pub mod compositor;
pub mod transform;

pub use background::{BackgroundImage, ImageTransform};
pub use canvas::{Canvas, encode_png};
pub use compositor::{Scene, render_card};

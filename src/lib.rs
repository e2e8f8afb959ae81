//! # Quotecard - Quote Card Rendering Library
//!
//! Quotecard lays out and renders framed quote cards, the kind shared on
//! social media: a colored border, one or two quotes, an optional author
//! line and an optional background image. It provides:
//!
//! - **Layout**: word wrapping, vertical space allocation, hit regions
//! - **Rendering**: RGBA compositing and PNG export
//! - **Editing**: pointer-driven repositioning, image pan/zoom/rotate
//! - **Persistence**: named templates and a generated-quote history
//! - **Generation**: prompt builders, a client and a proxy server for the
//!   OpenAI API
//!
//! ## Quick Start
//!
//! ```
//! use quotecard::editor::EditorState;
//! use quotecard::style::ContentStrings;
//!
//! let mut editor = EditorState::default();
//! editor.content = ContentStrings::new("Lumina nu se negociază.").with_author("Anonim");
//!
//! // Drag the quote 20px down
//! let layout = editor.layout();
//! let (x, y) = (layout.frame.center_x(), layout.quote1.start_y);
//! editor.pointer_down(x, y);
//! editor.pointer_move(x, y + 20.0);
//! editor.pointer_up();
//! assert_eq!(editor.offsets.quote1_offset, 20.0);
//!
//! let png = editor.export_png()?;
//! assert_eq!(editor.export_filename(), "lumina-nu-se-negociază.png");
//! # assert!(!png.is_empty());
//! # Ok::<(), quotecard::QuoteCardError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`style`] | Style parameters, content strings, manual offsets |
//! | [`layout`] | Text wrapping, area allocation, card geometry |
//! | [`font`] | Typeface registry (built-in bitmap face, TTF files) |
//! | [`render`] | Canvas, background image, compositor |
//! | [`hit_test`] | Element under a canvas point |
//! | [`editor`] | Interaction state machine |
//! | [`store`] | Key-value persistence, templates, quote history |
//! | [`prompt`] | Prompt builders for quote and image generation |
//! | [`generate`] | Client for the generation endpoints |
//! | [`server`] | HTTP proxy for the OpenAI API |
//! | [`export`] | Export file naming |
//! | [`error`] | Error types |

pub mod editor;
pub mod error;
pub mod export;
pub mod font;
pub mod generate;
pub mod layout;
pub mod prompt;
pub mod render;
pub mod server;
pub mod store;
pub mod style;

// Re-exports for convenience
pub use editor::EditorState;
pub use error::QuoteCardError;
pub use style::{ContentStrings, ManualOffsets, StyleParameters};

//! # Error Types
//!
//! This module defines error types used throughout the quotecard library.

use thiserror::Error;

/// Main error type for quotecard operations
#[derive(Debug, Error)]
pub enum QuoteCardError {
    /// Style or content input rejected at the boundary
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Image decoding, encoding or data-URL errors
    #[error("Image error: {0}")]
    Image(String),

    /// Font loading errors
    #[error("Font error: {0}")]
    Font(String),

    /// Key-value store errors (templates, history)
    #[error("Store error: {0}")]
    Store(String),

    /// Upstream generation API or backend errors
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Transport-level errors (bind, connection)
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

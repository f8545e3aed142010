//! # Error Types
//!
//! This module defines error types used throughout the printard library.

use thiserror::Error;

/// Main error type for printard operations
#[derive(Debug, Error)]
pub enum PrintardError {
    /// A paper, card or margin dimension that cannot produce a layout
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// Image aspect ratio that is zero, negative or not finite
    #[error("Degenerate aspect ratio: {0}")]
    DegenerateAspect(f32),

    /// An image reference could not be loaded, decoded or drawn
    #[error("Image error: {0}")]
    ImageDecode(String),

    /// The drawing surface could not finalize the document
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Paper or card name not present in the catalog
    #[error("Unknown size: {0}")]
    UnknownSize(String),

    /// Malformed job description
    #[error("Job error: {0}")]
    Job(String),

    /// HTTP server bind/serve failure
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

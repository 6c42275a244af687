//! Unified error types for sprite_engine

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sprite_engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source image not found: {path}")]
    SourceImageMissing { path: PathBuf },

    // === Registry Errors ===
    #[error("Sprite index {index} out of range (0..{len})")]
    SpriteIndexOutOfRange { index: usize, len: usize },

    #[error("No sprite with id '{id}'")]
    SpriteNotFound { id: String },

    // === Undo/Redo Errors ===
    #[error("History entry is missing its sprite payload")]
    MissingCommandPayload,

    // === External Errors ===
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Generic(String),
}

/// Result type alias for sprite_engine operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;

// === Convenience constructors ===
impl EngineError {
    /// Create a generic error from any displayable type
    pub fn generic(msg: impl std::fmt::Display) -> Self {
        Self::Generic(msg.to_string())
    }

    /// Create a missing source image error
    pub fn source_image_missing(path: impl Into<PathBuf>) -> Self {
        Self::SourceImageMissing { path: path.into() }
    }

    /// Create an out of range sprite index error
    pub fn sprite_index_out_of_range(index: usize, len: usize) -> Self {
        Self::SpriteIndexOutOfRange { index, len }
    }

    /// Create a sprite lookup error
    pub fn sprite_not_found(id: impl Into<String>) -> Self {
        Self::SpriteNotFound { id: id.into() }
    }
}

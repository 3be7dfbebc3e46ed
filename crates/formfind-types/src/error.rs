//! Error types for the formfind engine.
//!
//! All crates return `FormFindResult<T>` from fallible operations.

use thiserror::Error;

/// Unified error type for the formfind engine.
#[derive(Debug, Error)]
pub enum FormFindError {
    /// A vertex index (edge endpoint, anchor, or accessor) is outside `[0, M)`.
    #[error("index {index} is not between 0 and {vertex_count}")]
    VertexOutOfRange {
        index: usize,
        vertex_count: usize,
    },

    /// Supplied geometry does not match the topology vertex count.
    #[error("Geometry has {actual} points but topology has {expected} vertices")]
    GeometryMismatch {
        expected: usize,
        actual: usize,
    },

    /// A committed state vector does not have exactly `2·M` slots.
    #[error("State vector has {actual} slots, expected {expected}")]
    StateLengthMismatch {
        expected: usize,
        actual: usize,
    },

    /// Grid resolution or shape is unusable for the requested pattern.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An operation was called before the system was initialized.
    #[error("Not initialized: {0}")]
    NotInitialized(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FormFindError {
    /// Shorthand for an out-of-range vertex index.
    pub fn out_of_range(index: usize, vertex_count: usize) -> Self {
        Self::VertexOutOfRange {
            index,
            vertex_count,
        }
    }
}

/// Convenience alias for `Result<T, FormFindError>`.
pub type FormFindResult<T> = Result<T, FormFindError>;

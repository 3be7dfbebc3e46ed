//! # formfind-types
//!
//! Shared types, error types, and physical defaults
//! for the formfind particle-spring form-finding engine.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other formfind crates share.

pub mod constants;
pub mod error;

pub use error::{FormFindError, FormFindResult};

// Re-export glam's vector as the canonical point/vector type.
pub use glam::Vec3;

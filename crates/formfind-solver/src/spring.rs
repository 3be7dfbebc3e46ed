//! Spring — per-edge physical parameters and last evaluated force/length.

use serde::{Deserialize, Serialize};

/// A spring bound to one topology edge.
///
/// Endpoints are validated by the owning system, not here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    /// Index of the "from" particle.
    pub from: usize,
    /// Index of the "to" particle.
    pub to: usize,
    /// Stiffness `k_s`.
    pub stiffness: f32,
    /// Damping `k_d`.
    pub damping: f32,
    /// Natural (unstretched) length.
    pub rest_length: f32,
    /// Scalar force magnitude from the last force evaluation.
    pub force: f32,
    /// Current length from the last force evaluation.
    pub length: f32,
}

impl Spring {
    /// Creates a spring with the given constants and no evaluation history.
    pub fn new(from: usize, to: usize, stiffness: f32, damping: f32, rest_length: f32) -> Self {
        Self {
            from,
            to,
            stiffness,
            damping,
            rest_length,
            force: 0.0,
            length: 0.0,
        }
    }

    /// `force * length`, this spring's term of the ΣF·L diagnostic.
    #[inline]
    pub fn force_length(&self) -> f32 {
        self.force * self.length
    }
}

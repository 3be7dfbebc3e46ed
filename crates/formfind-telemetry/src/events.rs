//! Simulation event types.
//!
//! Lightweight value types carrying just enough data to monitor a
//! relaxation run: what changed, and how tense the structure is.

use serde::{Deserialize, Serialize};

/// A simulation event, tagged with the frame it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Frame number (0-indexed) when the event was emitted.
    pub frame: u32,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// System state and springs were (re)built.
    SystemInitialized {
        /// Particle count.
        vertex_count: usize,
        /// Spring count.
        spring_count: usize,
        /// Anchor count.
        anchor_count: usize,
    },

    /// A frame of sub-steps completed.
    FrameEnd {
        /// Total integrator steps taken so far.
        steps: u64,
        /// Σ F·L over all springs after the frame.
        sum_fl: f32,
        /// Wall-clock time for the frame (seconds).
        wall_time: f64,
    },

    /// A vertex was pinned.
    AnchorPinned {
        /// Pinned vertex index.
        vertex: usize,
    },

    /// A runtime parameter changed between frames.
    ParameterChanged {
        /// Parameter name (`stiffness`, `rest_length`, `gravity`).
        name: String,
        /// New value.
        value: f32,
    },
}

impl SimulationEvent {
    /// Creates a new event for the given frame.
    pub fn new(frame: u32, kind: EventKind) -> Self {
        Self { frame, kind }
    }
}

//! # formfind-telemetry
//!
//! Event bus for simulation telemetry. Emits structured events
//! (initialization, frame timing, ΣF·L, anchor and parameter changes)
//! that are consumed by pluggable sinks (tracing, in-memory capture).

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, SimulationEvent};
pub use sinks::{EventSink, SharedVecSink, TracingSink};

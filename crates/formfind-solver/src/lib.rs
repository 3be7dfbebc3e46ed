//! # formfind-solver
//!
//! Mass-spring state, force law, and explicit time integration.
//!
//! ## Key Types
//!
//! - [`MassSpringSystem`] — State vector, masses, anchors, springs; computes forces
//! - [`StateVector`] — Interleaved position/velocity buffer (`2·M` slots)
//! - [`Integrator`] — Pluggable stepping trait; [`ExplicitEuler`] implements it
//! - [`Simulation`] — Drives steps and frames, re-pins anchors, emits telemetry
//! - [`SimulationConfig`] — Physical constants and stepping parameters

pub mod anchors;
pub mod config;
pub mod integrator;
pub mod simulation;
pub mod spring;
pub mod state;
pub mod system;

pub use anchors::AnchorSet;
pub use config::{ForceParams, SimulationConfig, SystemConfig};
pub use integrator::{ExplicitEuler, Integrator};
pub use simulation::{FrameReport, Simulation};
pub use spring::Spring;
pub use state::StateVector;
pub use system::MassSpringSystem;

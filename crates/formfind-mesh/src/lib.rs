//! # formfind-mesh
//!
//! Construction-time graph logic for the form-finding engine.
//!
//! ## Key Types
//!
//! - [`Topology`] — Immutable directed edge list over a fixed vertex count,
//!   assembled through a bounds-checked [`TopologyBuilder`].
//! - [`GridSpec`] — Resolution and physical extent of a planar grid.
//! - [`ConnectivityPattern`] — Which springs the grid builder lays down.
//! - [`GridMesh`] — Positions, topology, and default anchors produced by
//!   [`generators::build_grid_mesh`].

pub mod generators;
pub mod grid;
pub mod topology;

pub use generators::{build_grid_mesh, ConnectivityPattern, GridMesh};
pub use grid::GridSpec;
pub use topology::{Edge, Topology, TopologyBuilder};

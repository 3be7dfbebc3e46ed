//! Physical constants and simulation defaults.
//!
//! Units are scene units (the default grid spans 700 × 700) and
//! integrator ticks, not SI.

/// Default gravity z-component. Positive z is "down" for the hanging surface.
pub const DEFAULT_GRAVITY_Z: f32 = 0.2;

/// Default spring rest length.
pub const DEFAULT_REST_LENGTH: f32 = 7.0;

/// Homogeneous particle mass.
pub const DEFAULT_PARTICLE_MASS: f32 = 1.4;

/// Viscous drag coefficient. Multiplied with velocity, so it is negative.
pub const DEFAULT_VISCOUS_DRAG: f32 = -0.0032;

/// Guard added to spring lengths so a zero-length spring never divides by zero.
pub const DISTANCE_EPSILON: f32 = 1.0e-6;

/// Default spring stiffness.
pub const DEFAULT_STIFFNESS: f32 = 0.07;

/// Default spring damping. Carried by every spring but not used by the force law.
pub const DEFAULT_DAMPING: f32 = -0.0004;

/// Default explicit integration step size.
pub const DEFAULT_STEP_SIZE: f32 = 1.0e-4;

/// Default number of integrator sub-steps per frame.
pub const DEFAULT_SUBSTEPS: u32 = 10;

/// Default grid resolution (vertices per side).
pub const DEFAULT_RESOLUTION: usize = 23;

/// Default physical extent of the grid along X and Y.
pub const DEFAULT_GRID_EXTENT: f32 = 700.0;

//! Integrator trait — the abstraction for advancing the state vector.
//!
//! An integrator reads the system's state, evaluates its derivative, and
//! returns the next state without committing it. The caller re-pins
//! anchors and commits:
//!
//! ```text
//! let mut next = integrator.take_step(&mut system, h)?;
//! // overwrite anchored positions in `next`
//! system.set_state(next)?;
//! ```

use formfind_types::{FormFindError, FormFindResult};

use crate::state::StateVector;
use crate::system::MassSpringSystem;

/// Trait for explicit time integrators.
///
/// # Implementations
///
/// - [`ExplicitEuler`] — one derivative evaluation, one forward update
pub trait Integrator: Send {
    /// Computes the state one step of size `h` ahead.
    ///
    /// Derivative evaluation half-advances the system's own state; the
    /// returned state is not committed.
    fn take_step(&self, system: &mut MassSpringSystem, h: f32) -> FormFindResult<StateVector>;

    /// Returns the integrator's name.
    fn name(&self) -> &str;
}

/// Forward Euler over the half-advanced state.
///
/// Derivative evaluation first moves positions by velocity and swaps
/// velocities for accelerations; this integrator then applies
/// `s[i] + d[i] · h` to that state. Because the derivative is the
/// half-advanced state itself, the update amounts to `s[i] · (1 + h)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitEuler;

impl ExplicitEuler {
    /// Creates the integrator.
    pub fn new() -> Self {
        Self
    }
}

impl Integrator for ExplicitEuler {
    fn take_step(&self, system: &mut MassSpringSystem, h: f32) -> FormFindResult<StateVector> {
        if !h.is_finite() {
            return Err(FormFindError::InvalidConfig(format!(
                "step size must be finite, got {h}"
            )));
        }
        let derivative = system.eval_derivative();
        system.state().apply_acceleration(&derivative, h)
    }

    fn name(&self) -> &str {
        "explicit_euler"
    }
}

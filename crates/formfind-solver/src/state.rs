//! Simulation state vector.
//!
//! The full degrees of freedom of the particle system, packed so the
//! second-order dynamics read as a first-order system:
//!
//! ```text
//! slots: [x0, v0, x1, v1, ..., x(M-1), v(M-1)]
//! ```
//!
//! Particle `i`'s position lives in slot `2i`, its velocity in slot `2i + 1`.
//! The length is always exactly `2·M`.

use formfind_types::{FormFindError, FormFindResult, Vec3};

/// Interleaved position/velocity buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    slots: Vec<Vec3>,
}

impl StateVector {
    /// Particles at `positions`, all at rest.
    pub fn from_positions(positions: &[Vec3]) -> Self {
        let mut slots = Vec::with_capacity(positions.len() * 2);
        for &p in positions {
            slots.push(p);
            slots.push(Vec3::ZERO);
        }
        Self { slots }
    }

    /// Wraps raw interleaved slots. Fails on an odd slot count.
    pub fn from_slots(slots: Vec<Vec3>) -> FormFindResult<Self> {
        if slots.len() % 2 != 0 {
            return Err(FormFindError::InvalidConfig(format!(
                "state vector needs an even slot count, got {}",
                slots.len()
            )));
        }
        Ok(Self { slots })
    }

    /// Number of particles `M`.
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.slots.len() / 2
    }

    /// Number of slots (`2·M`).
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the state holds no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Position of particle `i`. Panics if out of range.
    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        self.slots[i * 2]
    }

    /// Velocity slot of particle `i`. Panics if out of range.
    #[inline]
    pub fn velocity(&self, i: usize) -> Vec3 {
        self.slots[i * 2 + 1]
    }

    /// Position of particle `i`, or `None` if out of range.
    #[inline]
    pub fn get_position(&self, i: usize) -> Option<Vec3> {
        self.slots.get(i * 2).copied()
    }

    /// Overwrites the position of particle `i`. Panics if out of range.
    #[inline]
    pub fn set_position(&mut self, i: usize, p: Vec3) {
        self.slots[i * 2] = p;
    }

    /// Overwrites the velocity slot of particle `i`. Panics if out of range.
    #[inline]
    pub fn set_velocity(&mut self, i: usize, v: Vec3) {
        self.slots[i * 2 + 1] = v;
    }

    /// All slots in interleaved order.
    #[inline]
    pub fn slots(&self) -> &[Vec3] {
        &self.slots
    }

    /// Iterates over particle positions.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.slots.iter().step_by(2).copied()
    }

    /// Iterates over velocity slots.
    pub fn velocities(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.slots.iter().skip(1).step_by(2).copied()
    }

    /// First stage of a step: `x += v`, then `v = a`.
    ///
    /// Position is advanced by the velocity held at the start of the step
    /// (no step size), and the velocity slot is replaced by the
    /// mass-normalized acceleration of the same particle.
    pub fn advance_position_by_velocity(&mut self, accelerations: &[Vec3]) {
        debug_assert_eq!(accelerations.len(), self.particle_count());
        for (pair, &a) in self.slots.chunks_exact_mut(2).zip(accelerations) {
            let v = pair[1];
            pair[0] += v;
            pair[1] = a;
        }
    }

    /// Second stage of a step: `s[i] + d[i] · h` for every slot.
    ///
    /// Returns a new state; `self` is untouched.
    pub fn apply_acceleration(&self, derivative: &StateVector, h: f32) -> FormFindResult<StateVector> {
        if derivative.len() != self.len() {
            return Err(FormFindError::StateLengthMismatch {
                expected: self.len(),
                actual: derivative.len(),
            });
        }
        let slots = self
            .slots
            .iter()
            .zip(&derivative.slots)
            .map(|(&s, &d)| s + d * h)
            .collect();
        Ok(StateVector { slots })
    }
}

//! Mass-spring system — simulation state plus the force law.
//!
//! The system owns the state vector, per-particle masses, the anchor set,
//! and the springs derived from its [`Topology`]. It is the only place
//! physical forces are computed.
//!
//! # Force law
//!
//! For every particle: `f = g + c_visc · v`. For every spring `(a, b)`
//! with `d = x_b − x_a` and `L = |d| + ε`:
//!
//! ```text
//! s = (L − L0) / (L · (1/m_a + 1/m_b)) · k_s
//! f_a += d · s / m_a     (unless a is anchored)
//! f_b −= d · s / m_b     (unless b is anchored)
//! ```
//!
//! Anchored particles end with zero force.

use formfind_mesh::Topology;
use formfind_types::{FormFindError, FormFindResult, Vec3};
use tracing::debug;

use crate::anchors::AnchorSet;
use crate::config::{ForceParams, SystemConfig};
use crate::spring::Spring;
use crate::state::StateVector;

/// Particle-spring system over a fixed topology.
#[derive(Debug, Clone)]
pub struct MassSpringSystem {
    topology: Topology,
    config: SystemConfig,
    params: ForceParams,
    state: StateVector,
    masses: Vec<f32>,
    forces: Vec<Vec3>,
    anchors: AnchorSet,
    springs: Vec<Spring>,
    initialized: bool,
}

impl MassSpringSystem {
    /// Creates an uninitialized system with default constants.
    pub fn new(topology: Topology) -> Self {
        Self::with_config(topology, SystemConfig::default())
    }

    /// Creates an uninitialized system with the given constants.
    pub fn with_config(topology: Topology, config: SystemConfig) -> Self {
        let n = topology.vertex_count();
        Self {
            topology,
            params: ForceParams::from(&config),
            config,
            state: StateVector::from_positions(&[]),
            masses: Vec::new(),
            forces: Vec::new(),
            anchors: AnchorSet::empty(n),
            springs: Vec::new(),
            initialized: false,
        }
    }

    /// Allocates state, masses, and forces from `positions` and stores `anchors`.
    ///
    /// Velocities start at zero, every particle gets the configured mass,
    /// and gravity and rest length are reset to the configured values.
    /// Fails on an invalid config. Nothing is modified on failure.
    pub fn initialize(&mut self, positions: &[Vec3], anchors: &[usize]) -> FormFindResult<()> {
        self.config.validate()?;
        let n = self.topology.vertex_count();
        if positions.len() != n {
            return Err(FormFindError::GeometryMismatch {
                expected: n,
                actual: positions.len(),
            });
        }
        let anchors = AnchorSet::new(n, anchors)?;

        self.state = StateVector::from_positions(positions);
        self.masses = vec![self.config.particle_mass; n];
        self.forces = vec![Vec3::ZERO; n];
        self.anchors = anchors;
        self.params = ForceParams::from(&self.config);
        self.initialized = true;

        debug!(
            particles = n,
            anchors = self.anchors.len(),
            "mass-spring system initialized"
        );
        Ok(())
    }

    /// Rebuilds the spring list: one spring per topology edge, all with the
    /// given stiffness and damping and the current rest length.
    pub fn setup_springs(&mut self, stiffness: f32, damping: f32) -> FormFindResult<()> {
        if !self.initialized {
            return Err(FormFindError::NotInitialized(
                "call initialize() before setup_springs()".into(),
            ));
        }
        let rest_length = self.params.rest_length;
        self.springs = self
            .topology
            .edges()
            .iter()
            .map(|e| Spring::new(e.from, e.to, stiffness, damping, rest_length))
            .collect();

        debug!(springs = self.springs.len(), stiffness, rest_length, "springs set up");
        Ok(())
    }

    /// Accumulates gravity, drag, and spring forces for the current state.
    ///
    /// Also records each spring's current length and force magnitude.
    pub fn compute_forces(&mut self) {
        let params = self.params;

        for (i, force) in self.forces.iter_mut().enumerate() {
            *force = params.gravity;
            *force += self.state.velocity(i) * params.viscous_drag;
        }

        for spring in &mut self.springs {
            let (from, to) = (spring.from, spring.to);
            let dx = self.state.position(to) - self.state.position(from);
            let dist = dx.length() + params.distance_epsilon;
            spring.length = dist;

            let strength = (dist - spring.rest_length)
                / (dist * (1.0 / self.masses[from] + 1.0 / self.masses[to]))
                * spring.stiffness;
            spring.force = strength;

            if !self.anchors.contains(from) {
                self.forces[from] += dx * (strength / self.masses[from]);
            }
            if !self.anchors.contains(to) {
                self.forces[to] += dx * (-strength / self.masses[to]);
            }
        }

        for &a in self.anchors.indices() {
            self.forces[a] = Vec3::ZERO;
        }
    }

    /// Moves every position by its velocity and replaces the velocity slot
    /// with the force computed by the last [`compute_forces`](Self::compute_forces).
    pub fn advance_position_by_velocity(&mut self) {
        self.state.advance_position_by_velocity(&self.forces);
    }

    /// Evaluates the state derivative.
    ///
    /// Runs [`compute_forces`](Self::compute_forces) and then
    /// [`advance_position_by_velocity`](Self::advance_position_by_velocity),
    /// so the system's own state is half-advanced afterwards. The returned
    /// derivative is that half-advanced state: advanced positions in the
    /// position slots, accelerations in the velocity slots.
    pub fn eval_derivative(&mut self) -> StateVector {
        self.compute_forces();
        self.advance_position_by_velocity();
        self.state.clone()
    }

    /// Σ over springs of `force · length`.
    pub fn sum_fl(&self) -> f32 {
        self.springs.iter().map(Spring::force_length).sum()
    }

    // ─── Mutators ─────────────────────────────────────────────

    /// Replaces gravity with `(0, 0, z)`.
    pub fn set_gravity(&mut self, z: f32) {
        self.params.gravity = Vec3::new(0.0, 0.0, z);
    }

    /// Sets the rest length of every existing spring.
    ///
    /// Springs created by a later `setup_springs` still use the configured
    /// rest length.
    pub fn set_rest_length(&mut self, rest_length: f32) {
        for spring in &mut self.springs {
            spring.rest_length = rest_length;
        }
    }

    /// Sets the stiffness of every existing spring.
    pub fn set_stiffness(&mut self, stiffness: f32) {
        for spring in &mut self.springs {
            spring.stiffness = stiffness;
        }
    }

    /// Replaces the anchor set.
    pub fn set_fixed(&mut self, indices: &[usize]) -> FormFindResult<()> {
        self.anchors = AnchorSet::new(self.topology.vertex_count(), indices)?;
        Ok(())
    }

    /// Adds one anchor. Returns `true` if it was not already anchored.
    pub fn add_anchor(&mut self, index: usize) -> FormFindResult<bool> {
        self.anchors.insert(index)
    }

    /// Sets the mass of one particle.
    pub fn set_mass(&mut self, index: usize, mass: f32) -> FormFindResult<()> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(FormFindError::InvalidConfig(format!(
                "mass must be positive, got {mass}"
            )));
        }
        let vertex_count = self.masses.len();
        let slot = self
            .masses
            .get_mut(index)
            .ok_or_else(|| FormFindError::out_of_range(index, vertex_count))?;
        *slot = mass;
        Ok(())
    }

    /// Commits a new state. Its length must be `2·M`.
    pub fn set_state(&mut self, state: StateVector) -> FormFindResult<()> {
        let expected = 2 * self.topology.vertex_count();
        if state.len() != expected {
            return Err(FormFindError::StateLengthMismatch {
                expected,
                actual: state.len(),
            });
        }
        self.state = state;
        Ok(())
    }

    /// Overwrites the position slot of particle `index`.
    pub fn set_state_position_at(&mut self, index: usize, position: Vec3) -> FormFindResult<()> {
        self.check_index(index)?;
        self.state.set_position(index, position);
        Ok(())
    }

    // ─── Accessors ────────────────────────────────────────────

    /// Current state vector.
    #[inline]
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    /// Position of particle `index`.
    pub fn state_position_at(&self, index: usize) -> FormFindResult<Vec3> {
        self.check_index(index)?;
        Ok(self.state.position(index))
    }

    /// Number of particles `M`.
    #[inline]
    pub fn num_masses(&self) -> usize {
        self.topology.vertex_count()
    }

    /// Number of springs.
    #[inline]
    pub fn num_springs(&self) -> usize {
        self.springs.len()
    }

    /// Springs with their last evaluated length and force.
    #[inline]
    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// Forces from the last evaluation.
    #[inline]
    pub fn forces(&self) -> &[Vec3] {
        &self.forces
    }

    /// Per-particle masses.
    #[inline]
    pub fn masses(&self) -> &[f32] {
        &self.masses
    }

    /// Anchored particles.
    #[inline]
    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    /// The topology springs were derived from.
    #[inline]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Current runtime force parameters.
    #[inline]
    pub fn params(&self) -> &ForceParams {
        &self.params
    }

    /// Whether `initialize` has succeeded.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn check_index(&self, index: usize) -> FormFindResult<()> {
        if !self.initialized {
            return Err(FormFindError::NotInitialized(
                "system has no state before initialize()".into(),
            ));
        }
        let n = self.topology.vertex_count();
        if index >= n {
            return Err(FormFindError::out_of_range(index, n));
        }
        Ok(())
    }
}

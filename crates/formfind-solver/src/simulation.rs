//! Simulation driver — stepping, anchor re-pinning, and frame reporting.
//!
//! One step is one derivative evaluation plus one integration pass. After
//! every step the driver overwrites each anchor's position with its pinned
//! target and commits the result. A frame is a fixed number of steps.

use std::collections::BTreeMap;
use std::time::Instant;

use formfind_mesh::{GridMesh, GridSpec, Topology};
use formfind_telemetry::{EventBus, EventKind, SimulationEvent};
use formfind_types::{FormFindError, FormFindResult, Vec3};
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::integrator::{ExplicitEuler, Integrator};
use crate::spring::Spring;
use crate::state::StateVector;
use crate::system::MassSpringSystem;

/// Summary of one completed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Frame number (0-indexed).
    pub frame: u32,
    /// Total integrator steps taken so far.
    pub steps: u64,
    /// Σ F·L after the frame.
    pub sum_fl: f32,
    /// Wall-clock time for the frame (seconds).
    pub wall_time: f64,
}

/// Drives a [`MassSpringSystem`] with an [`Integrator`].
pub struct Simulation {
    system: MassSpringSystem,
    integrator: Box<dyn Integrator>,
    config: SimulationConfig,
    /// Initial geometry, the target of every pin.
    rest_positions: Vec<Vec3>,
    /// Anchor index -> pinned position.
    pins: BTreeMap<usize, Vec3>,
    grid: Option<GridSpec>,
    bus: EventBus,
    steps: u64,
    frames: u32,
}

impl Simulation {
    /// Builds a simulation over arbitrary geometry.
    ///
    /// Initializes the system with `positions` and `anchors`, then sets up
    /// springs from the config's stiffness and damping.
    pub fn new(
        topology: Topology,
        positions: &[Vec3],
        anchors: &[usize],
        config: SimulationConfig,
    ) -> FormFindResult<Self> {
        config.validate()?;

        let mut system = MassSpringSystem::with_config(topology, config.system);
        system.initialize(positions, anchors)?;
        system.setup_springs(config.stiffness, config.damping)?;

        let pins = system
            .anchors()
            .indices()
            .iter()
            .map(|&i| (i, positions[i]))
            .collect();

        info!(
            particles = system.num_masses(),
            springs = system.num_springs(),
            anchors = system.anchors().len(),
            "simulation ready"
        );

        Ok(Self {
            system,
            integrator: Box::new(ExplicitEuler::new()),
            config,
            rest_positions: positions.to_vec(),
            pins,
            grid: None,
            bus: EventBus::new(),
            steps: 0,
            frames: 0,
        })
    }

    /// Builds a simulation from grid-builder output, anchored at its corners.
    pub fn from_mesh(mesh: &GridMesh, config: SimulationConfig) -> FormFindResult<Self> {
        let mut sim = Self::new(mesh.topology.clone(), &mesh.positions, &mesh.anchors, config)?;
        sim.grid = Some(mesh.spec);
        Ok(sim)
    }

    /// Replaces the integrator.
    pub fn with_integrator(mut self, integrator: Box<dyn Integrator>) -> Self {
        self.integrator = integrator;
        self
    }

    /// Event bus, for registering sinks.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Emits the initialization event. Call after registering sinks.
    pub fn announce(&mut self) {
        self.bus.emit(SimulationEvent::new(
            self.frames,
            EventKind::SystemInitialized {
                vertex_count: self.system.num_masses(),
                spring_count: self.system.num_springs(),
                anchor_count: self.system.anchors().len(),
            },
        ));
        self.bus.flush();
    }

    /// Takes one integrator step, re-pins anchors, and commits.
    pub fn step(&mut self) -> FormFindResult<()> {
        let mut next: StateVector = self
            .integrator
            .take_step(&mut self.system, self.config.step_size)?;
        for (&i, &p) in &self.pins {
            next.set_position(i, p);
        }
        self.system.set_state(next)?;
        self.steps += 1;
        Ok(())
    }

    /// Runs the configured number of sub-steps and reports Σ F·L.
    pub fn advance_frame(&mut self) -> FormFindResult<FrameReport> {
        let start = Instant::now();
        for _ in 0..self.config.substeps {
            self.step()?;
        }
        let report = FrameReport {
            frame: self.frames,
            steps: self.steps,
            sum_fl: self.system.sum_fl(),
            wall_time: start.elapsed().as_secs_f64(),
        };

        self.bus.emit(SimulationEvent::new(
            report.frame,
            EventKind::FrameEnd {
                steps: report.steps,
                sum_fl: report.sum_fl,
                wall_time: report.wall_time,
            },
        ));
        self.bus.flush();
        self.frames += 1;
        Ok(report)
    }

    /// Runs `frames` frames and returns their reports.
    pub fn run_frames(&mut self, frames: u32) -> FormFindResult<Vec<FrameReport>> {
        let mut reports = Vec::with_capacity(frames as usize);
        for _ in 0..frames {
            reports.push(self.advance_frame()?);
        }
        if let Some(last) = reports.last() {
            debug!(frames, steps = last.steps, sum_fl = last.sum_fl, "run complete");
        }
        Ok(reports)
    }

    /// Pins `index` back onto the ground plane at its initial geometry.
    ///
    /// The vertex is anchored from now on and re-pinned every step.
    /// Returns `false`, leaving state and pin target untouched, if it was
    /// already anchored.
    pub fn pin_to_ground(&mut self, index: usize) -> FormFindResult<bool> {
        let target = *self
            .rest_positions
            .get(index)
            .ok_or_else(|| FormFindError::out_of_range(index, self.rest_positions.len()))?;
        if self.system.anchors().contains(index) {
            return Ok(false);
        }
        let ground = Vec3::new(target.x, target.y, 0.0);

        self.system.set_state_position_at(index, ground)?;
        self.system.add_anchor(index)?;
        self.pins.insert(index, ground);

        debug!(vertex = index, "anchor pinned");
        self.bus.emit(SimulationEvent::new(
            self.frames,
            EventKind::AnchorPinned { vertex: index },
        ));
        Ok(true)
    }

    /// Pins the grid vertex nearest the fractional load point `(u, v)`.
    ///
    /// Only available for simulations built from a grid mesh.
    pub fn pin_at_fraction(&mut self, u: f32, v: f32) -> FormFindResult<usize> {
        let grid = self.grid.ok_or_else(|| {
            FormFindError::InvalidConfig("load points need a grid-built simulation".into())
        })?;
        let index = grid.vertex_at_fraction(u, v);
        self.pin_to_ground(index)?;
        Ok(index)
    }

    // ─── Live parameters ──────────────────────────────────────

    /// Sets every spring's stiffness.
    pub fn set_stiffness(&mut self, stiffness: f32) {
        self.system.set_stiffness(stiffness);
        self.config.stiffness = stiffness;
        self.parameter_changed("stiffness", stiffness);
    }

    /// Sets every spring's rest length.
    pub fn set_rest_length(&mut self, rest_length: f32) {
        self.system.set_rest_length(rest_length);
        self.parameter_changed("rest_length", rest_length);
    }

    /// Sets the gravity z-component.
    pub fn set_gravity(&mut self, z: f32) {
        self.system.set_gravity(z);
        self.parameter_changed("gravity", z);
    }

    fn parameter_changed(&mut self, name: &str, value: f32) {
        self.bus.emit(SimulationEvent::new(
            self.frames,
            EventKind::ParameterChanged {
                name: name.to_string(),
                value,
            },
        ));
    }

    // ─── Readback ─────────────────────────────────────────────

    /// The underlying system.
    #[inline]
    pub fn system(&self) -> &MassSpringSystem {
        &self.system
    }

    /// Current state snapshot.
    #[inline]
    pub fn state(&self) -> &StateVector {
        self.system.state()
    }

    /// Current particle positions.
    pub fn positions(&self) -> Vec<Vec3> {
        self.system.state().positions().collect()
    }

    /// Springs with their last length and force.
    #[inline]
    pub fn springs(&self) -> &[Spring] {
        self.system.springs()
    }

    /// Σ F·L from the last force evaluation.
    #[inline]
    pub fn sum_fl(&self) -> f32 {
        self.system.sum_fl()
    }

    /// Pinned anchors and their targets.
    #[inline]
    pub fn pins(&self) -> &BTreeMap<usize, Vec3> {
        &self.pins
    }

    /// Grid the simulation was built from, if any.
    #[inline]
    pub fn grid(&self) -> Option<&GridSpec> {
        self.grid.as_ref()
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Name of the active integrator.
    pub fn integrator_name(&self) -> &str {
        self.integrator.name()
    }

    /// Integrator steps taken.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Frames completed.
    #[inline]
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

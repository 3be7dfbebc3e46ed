//! Integration tests for formfind-solver.

use formfind_mesh::{build_grid_mesh, ConnectivityPattern, GridSpec, Topology};
use formfind_solver::anchors::AnchorSet;
use formfind_solver::config::{SimulationConfig, SystemConfig};
use formfind_solver::integrator::{ExplicitEuler, Integrator};
use formfind_solver::simulation::Simulation;
use formfind_solver::state::StateVector;
use formfind_solver::system::MassSpringSystem;
use formfind_telemetry::{EventKind, SharedVecSink};
use formfind_types::constants::{DEFAULT_STEP_SIZE, DISTANCE_EPSILON};
use formfind_types::{FormFindError, Vec3};

const EPS: f32 = 1e-5;

fn approx(a: Vec3, b: Vec3, tol: f32) -> bool {
    (a - b).abs().max_element() < tol
}

/// Two particles joined by one spring.
fn pair(a: Vec3, b: Vec3, anchors: &[usize], config: SystemConfig) -> MassSpringSystem {
    let topology = Topology::from_pairs(2, [(0, 1)]).unwrap();
    let mut system = MassSpringSystem::with_config(topology, config);
    system.initialize(&[a, b], anchors).unwrap();
    system.setup_springs(0.07, -0.0004).unwrap();
    system
}

fn weightless() -> SystemConfig {
    SystemConfig {
        gravity: [0.0, 0.0, 0.0],
        ..Default::default()
    }
}

// ─── StateVector Tests ────────────────────────────────────────

#[test]
fn state_from_positions_is_interleaved() {
    let state = StateVector::from_positions(&[Vec3::X, Vec3::Y]);
    assert_eq!(state.len(), 4);
    assert_eq!(state.particle_count(), 2);
    assert_eq!(state.slots(), &[Vec3::X, Vec3::ZERO, Vec3::Y, Vec3::ZERO]);
    assert_eq!(state.positions().collect::<Vec<_>>(), vec![Vec3::X, Vec3::Y]);
    assert!(state.velocities().all(|v| v == Vec3::ZERO));
}

#[test]
fn state_from_odd_slots_fails() {
    assert!(matches!(
        StateVector::from_slots(vec![Vec3::ZERO; 3]),
        Err(FormFindError::InvalidConfig(msg)) if msg.contains("even")
    ));
    assert!(StateVector::from_slots(vec![Vec3::ZERO; 4]).is_ok());
}

#[test]
fn state_advance_position_by_velocity() {
    let mut state = StateVector::from_positions(&[Vec3::ZERO, Vec3::X]);
    state.set_velocity(0, Vec3::new(1.0, 2.0, 3.0));

    state.advance_position_by_velocity(&[Vec3::Z, Vec3::Y]);

    assert_eq!(state.position(0), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(state.velocity(0), Vec3::Z);
    assert_eq!(state.position(1), Vec3::X); // Was at rest
    assert_eq!(state.velocity(1), Vec3::Y);
}

#[test]
fn state_apply_acceleration() {
    let state = StateVector::from_positions(&[Vec3::X]);
    let derivative = StateVector::from_slots(vec![Vec3::Y, Vec3::Z]).unwrap();
    let next = state.apply_acceleration(&derivative, 0.5).unwrap();
    assert_eq!(next.position(0), Vec3::new(1.0, 0.5, 0.0));
    assert_eq!(next.velocity(0), Vec3::new(0.0, 0.0, 0.5));

    let short = StateVector::from_positions(&[]);
    assert!(state.apply_acceleration(&short, 0.5).is_err());
}

// ─── AnchorSet Tests ──────────────────────────────────────────

#[test]
fn anchors_sorted_and_deduplicated() {
    let anchors = AnchorSet::new(10, &[8, 2, 8, 0]).unwrap();
    assert_eq!(anchors.indices(), &[0, 2, 8]);
    assert_eq!(anchors.len(), 3);
    assert!(anchors.contains(2));
    assert!(!anchors.contains(3));
    assert!(!anchors.contains(99));
}

#[test]
fn anchors_reject_out_of_range() {
    let err = AnchorSet::new(4, &[1, 4]).unwrap_err();
    assert!(matches!(
        err,
        FormFindError::VertexOutOfRange { index: 4, vertex_count: 4 }
    ));
}

#[test]
fn anchor_insert_reports_novelty() {
    let mut anchors = AnchorSet::empty(5);
    assert!(anchors.is_empty());
    assert!(anchors.insert(3).unwrap());
    assert!(!anchors.insert(3).unwrap());
    assert!(anchors.insert(1).unwrap());
    assert_eq!(anchors.indices(), &[1, 3]);
}

// ─── Initialization Tests ─────────────────────────────────────

#[test]
fn initialize_allocates_state() {
    let mesh = build_grid_mesh(&GridSpec::square(4), ConnectivityPattern::Grid).unwrap();
    let mut system = MassSpringSystem::new(mesh.topology.clone());
    assert!(!system.is_initialized());

    system.initialize(&mesh.positions, &mesh.anchors).unwrap();

    let n = mesh.vertex_count();
    assert_eq!(system.num_masses(), n);
    assert_eq!(system.state().len(), 2 * n);
    for (i, p) in mesh.positions.iter().enumerate() {
        assert_eq!(system.state().position(i), *p);
        assert_eq!(system.state().velocity(i), Vec3::ZERO);
    }
    assert!(system.masses().iter().all(|&m| (m - 1.4).abs() < 1e-6));
    assert_eq!(system.anchors().indices(), &[0, 3, 12, 15]);
}

#[test]
fn initialize_rejects_size_mismatch() {
    let topology = Topology::builder(3).build();
    let mut system = MassSpringSystem::new(topology);
    let err = system.initialize(&[Vec3::ZERO, Vec3::X], &[]).unwrap_err();
    assert!(matches!(
        err,
        FormFindError::GeometryMismatch { expected: 3, actual: 2 }
    ));
    assert!(!system.is_initialized());
    assert!(system.state().is_empty());
}

#[test]
fn initialize_rejects_bad_anchor() {
    let topology = Topology::builder(2).build();
    let mut system = MassSpringSystem::new(topology);
    assert!(system.initialize(&[Vec3::ZERO, Vec3::X], &[2]).is_err());
}

#[test]
fn initialize_rejects_invalid_config() {
    for mass in [0.0, -1.4] {
        let config = SystemConfig {
            particle_mass: mass,
            ..Default::default()
        };
        let topology = Topology::from_pairs(2, [(0, 1)]).unwrap();
        let mut system = MassSpringSystem::with_config(topology, config);
        let err = system
            .initialize(&[Vec3::ZERO, Vec3::X], &[])
            .unwrap_err();
        assert!(matches!(err, FormFindError::InvalidConfig(_)));
        assert!(!system.is_initialized());
        assert!(system.setup_springs(0.07, 0.0).is_err());
    }
}

#[test]
fn initialize_resets_gravity() {
    let mut system = pair(Vec3::ZERO, Vec3::X, &[], SystemConfig::default());
    system.set_gravity(3.0);
    assert_eq!(system.params().gravity, Vec3::new(0.0, 0.0, 3.0));

    system.initialize(&[Vec3::ZERO, Vec3::X], &[]).unwrap();
    assert_eq!(system.params().gravity, Vec3::new(0.0, 0.0, 0.2));
}

// ─── Spring Setup Tests ───────────────────────────────────────

#[test]
fn setup_springs_requires_initialize() {
    let topology = Topology::from_pairs(2, [(0, 1)]).unwrap();
    let mut system = MassSpringSystem::new(topology);
    assert!(matches!(
        system.setup_springs(0.07, 0.0),
        Err(FormFindError::NotInitialized(_))
    ));
}

#[test]
fn setup_springs_one_per_edge() {
    let mesh = build_grid_mesh(&GridSpec::square(3), ConnectivityPattern::Grid).unwrap();
    let mut system = MassSpringSystem::new(mesh.topology.clone());
    system.initialize(&mesh.positions, &mesh.anchors).unwrap();
    system.setup_springs(0.5, -0.1).unwrap();

    assert_eq!(system.num_springs(), 12);
    for (spring, edge) in system.springs().iter().zip(mesh.topology.edges()) {
        assert_eq!((spring.from, spring.to), (edge.from, edge.to));
        assert_eq!(spring.stiffness, 0.5);
        assert_eq!(spring.damping, -0.1);
        assert_eq!(spring.rest_length, 7.0);
    }

    // Rebuilding replaces, it does not accumulate.
    system.setup_springs(0.5, -0.1).unwrap();
    assert_eq!(system.num_springs(), 12);
}

#[test]
fn set_rest_length_updates_existing_springs_only() {
    let mut system = pair(Vec3::ZERO, Vec3::X, &[], SystemConfig::default());
    system.set_rest_length(3.0);
    assert_eq!(system.num_springs(), 1);
    assert_eq!(system.springs()[0].rest_length, 3.0);

    // New springs use the configured rest length.
    system.setup_springs(0.07, 0.0).unwrap();
    assert_eq!(system.springs()[0].rest_length, 7.0);
}

#[test]
fn set_stiffness_updates_all_springs() {
    let mesh = build_grid_mesh(&GridSpec::square(3), ConnectivityPattern::Grid).unwrap();
    let mut system = MassSpringSystem::new(mesh.topology.clone());
    system.initialize(&mesh.positions, &mesh.anchors).unwrap();
    system.setup_springs(0.07, 0.0).unwrap();
    system.set_stiffness(0.9);
    assert!(system.springs().iter().all(|s| s.stiffness == 0.9));
    assert_eq!(system.num_springs(), 12);
}

// ─── Force Tests ──────────────────────────────────────────────

#[test]
fn stretched_spring_pulls_endpoints_together() {
    let mut system = pair(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), &[], weightless());
    system.compute_forces();

    let f = system.forces();
    // s = (L − 7) / (L · 2/1.4) · 0.07 ≈ 0.0147; f = d · s / 1.4
    assert!(approx(f[0], Vec3::new(0.105, 0.0, 0.0), EPS), "{:?}", f[0]);
    assert!(approx(f[1], -f[0], 1e-7));

    let spring = system.springs()[0];
    assert!((spring.length - 10.0).abs() < EPS);
    assert!((spring.force - 0.0147).abs() < EPS);
}

#[test]
fn compressed_spring_pushes_endpoints_apart() {
    let mut system = pair(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), &[], weightless());
    system.compute_forces();
    assert!(system.forces()[0].x < 0.0);
    assert!(system.forces()[1].x > 0.0);
    assert!(system.springs()[0].force < 0.0);
}

#[test]
fn zero_length_spring_stays_finite() {
    let mut system = pair(Vec3::ONE, Vec3::ONE, &[], SystemConfig::default());
    system.compute_forces();
    assert!(system.forces().iter().all(|f| f.is_finite()));
    assert!(system.springs()[0].length > 0.0);
}

#[test]
fn gravity_and_drag_on_free_particles() {
    let topology = Topology::builder(1).build();
    let mut system = MassSpringSystem::new(topology);
    system.initialize(&[Vec3::ZERO], &[]).unwrap();
    system.setup_springs(0.07, 0.0).unwrap();

    let mut state = system.state().clone();
    state.set_velocity(0, Vec3::new(100.0, 0.0, 0.0));
    system.set_state(state).unwrap();
    system.compute_forces();

    // g + c · v = (0, 0, 0.2) + (−0.32, 0, 0)
    assert!(approx(system.forces()[0], Vec3::new(-0.32, 0.0, 0.2), EPS));

    system.set_gravity(1.5);
    system.compute_forces();
    assert!((system.forces()[0].z - 1.5).abs() < EPS);
}

#[test]
fn anchored_particles_receive_no_force() {
    let mut system = pair(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), &[0], SystemConfig::default());
    system.compute_forces();
    assert_eq!(system.forces()[0], Vec3::ZERO);
    assert!(system.forces()[1].x < 0.0);
}

#[test]
fn equilibrium_spring_contributes_nothing() {
    let config = SystemConfig {
        rest_length: 5.0,
        ..Default::default()
    };
    let mut system = pair(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), &[1], config);
    system.compute_forces();

    // Only gravity acts on the free particle.
    assert!(approx(system.forces()[0], Vec3::new(0.0, 0.0, 0.2), 1e-6));
    assert!(system.springs()[0].force.abs() < 1e-6);
}

#[test]
fn heterogeneous_mass() {
    let mut system = pair(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), &[], weightless());
    system.set_mass(1, 2.8).unwrap();
    system.compute_forces();
    let f = system.forces();
    // Same spring strength, the heavier endpoint accelerates half as much.
    assert!((f[0].x + 2.0 * f[1].x).abs() < EPS);

    assert!(system.set_mass(2, 1.0).is_err());
    assert!(system.set_mass(0, 0.0).is_err());
}

// ─── ΣF·L Tests ───────────────────────────────────────────────

#[test]
fn sum_fl_non_negative_when_stretched() {
    let mesh = build_grid_mesh(&GridSpec::square(4), ConnectivityPattern::Grid).unwrap();
    let mut system = MassSpringSystem::new(mesh.topology.clone());
    system.initialize(&mesh.positions, &mesh.anchors).unwrap();
    system.setup_springs(0.07, 0.0).unwrap();
    system.compute_forces();

    // Grid spacing is ~233, far beyond the rest length of 7.
    assert!(system.springs().iter().all(|s| s.length > s.rest_length));
    assert!(system.sum_fl() >= 0.0);
    assert!(system.sum_fl() > 0.0);
}

#[test]
fn sum_fl_zero_at_rest_length() {
    let mut system = pair(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), &[], weightless());
    system.set_rest_length(4.0 + DISTANCE_EPSILON);
    system.compute_forces();
    assert_eq!(system.springs()[0].force, 0.0);
    assert_eq!(system.sum_fl(), 0.0);
}

#[test]
fn sum_fl_before_any_evaluation_is_zero() {
    let system = pair(Vec3::ZERO, Vec3::X, &[], SystemConfig::default());
    assert_eq!(system.sum_fl(), 0.0);
}

// ─── Derivative / Integrator Tests ────────────────────────────

#[test]
fn eval_derivative_half_advances_state() {
    let mut system = pair(Vec3::ZERO, Vec3::new(7.0, 0.0, 0.0), &[], SystemConfig::default());
    let mut state = system.state().clone();
    state.set_velocity(1, Vec3::new(0.0, 1.0, 0.0));
    system.set_state(state).unwrap();

    let derivative = system.eval_derivative();

    assert_eq!(system.state().position(1), Vec3::new(7.0, 1.0, 0.0));
    assert_eq!(system.state().velocity(1), system.forces()[1]);
    assert_eq!(&derivative, system.state());
}

#[test]
fn take_step_does_not_commit() {
    let mut system = pair(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), &[0], SystemConfig::default());
    let h = 0.01;
    let next = ExplicitEuler::new().take_step(&mut system, h).unwrap();

    let half = system.state().clone();
    assert_eq!(next.len(), half.len());
    for (n, s) in next.slots().iter().zip(half.slots()) {
        assert_eq!(*n, *s + *s * h);
    }
    assert_ne!(system.state(), &next);
}

#[test]
fn take_step_rejects_non_finite_step() {
    let mut system = pair(Vec3::ZERO, Vec3::X, &[], SystemConfig::default());
    assert!(ExplicitEuler.take_step(&mut system, f32::NAN).is_err());
    assert_eq!(ExplicitEuler.name(), "explicit_euler");
}

#[test]
fn equilibrium_step_is_gravity_only() {
    let config = SystemConfig {
        rest_length: 5.0,
        ..Default::default()
    };
    // Free particle at the origin so position scaling cannot move it.
    let mut system = pair(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), &[1], config);
    let h = DEFAULT_STEP_SIZE;
    let next = ExplicitEuler.take_step(&mut system, h).unwrap();

    assert!(approx(next.position(0), Vec3::ZERO, 1e-7));
    let expected = Vec3::new(0.0, 0.0, 0.2) * (1.0 + h);
    assert!(approx(next.velocity(0), expected, 1e-6), "{:?}", next.velocity(0));
}

// ─── Mutator Error Tests ──────────────────────────────────────

#[test]
fn set_state_checks_length() {
    let mut system = pair(Vec3::ZERO, Vec3::X, &[], SystemConfig::default());
    let err = system
        .set_state(StateVector::from_positions(&[Vec3::ZERO]))
        .unwrap_err();
    assert!(matches!(
        err,
        FormFindError::StateLengthMismatch { expected: 4, actual: 2 }
    ));
}

#[test]
fn position_accessors_check_range() {
    let mut system = pair(Vec3::ZERO, Vec3::X, &[], SystemConfig::default());
    assert_eq!(system.state_position_at(1).unwrap(), Vec3::X);
    assert!(system.state_position_at(2).is_err());
    assert!(system.set_state_position_at(5, Vec3::ONE).is_err());

    system.set_state_position_at(0, Vec3::ONE).unwrap();
    assert_eq!(system.state_position_at(0).unwrap(), Vec3::ONE);
}

#[test]
fn accessors_before_initialize_fail() {
    let system = MassSpringSystem::new(Topology::builder(2).build());
    assert!(matches!(
        system.state_position_at(0),
        Err(FormFindError::NotInitialized(_))
    ));
}

#[test]
fn set_fixed_replaces_anchors() {
    let mut system = pair(Vec3::ZERO, Vec3::X, &[0], SystemConfig::default());
    system.set_fixed(&[1]).unwrap();
    assert_eq!(system.anchors().indices(), &[1]);
    assert!(system.set_fixed(&[0, 2]).is_err());
    assert_eq!(system.anchors().indices(), &[1]); // Unchanged on error
}

// ─── Config Tests ─────────────────────────────────────────────

#[test]
fn config_defaults() {
    let config = SimulationConfig::default();
    assert_eq!(config.substeps, 10);
    assert!((config.step_size - 1e-4).abs() < 1e-9);
    assert!((config.stiffness - 0.07).abs() < 1e-6);
    assert_eq!(config.system.gravity, [0.0, 0.0, 0.2]);
    assert!(config.validate().is_ok());
    assert_eq!(SimulationConfig::single_step().substeps, 1);
}

#[test]
fn config_validation() {
    let bad_step = SimulationConfig {
        step_size: 0.0,
        ..Default::default()
    };
    assert!(bad_step.validate().is_err());

    let no_substeps = SimulationConfig {
        substeps: 0,
        ..Default::default()
    };
    assert!(no_substeps.validate().is_err());

    let mut bad_mass = SimulationConfig::default();
    bad_mass.system.particle_mass = -1.0;
    assert!(bad_mass.validate().is_err());

    let mut bad_gravity = SimulationConfig::default();
    bad_gravity.system.gravity[2] = f32::INFINITY;
    assert!(bad_gravity.validate().is_err());
}

#[test]
fn config_from_partial_toml() {
    let config = SimulationConfig::from_toml_str(
        r#"
        stiffness = 0.3
        substeps = 4

        [system]
        rest_length = 2.5
        "#,
    )
    .unwrap();
    assert_eq!(config.stiffness, 0.3);
    assert_eq!(config.substeps, 4);
    assert_eq!(config.system.rest_length, 2.5);
    assert!((config.system.particle_mass - 1.4).abs() < 1e-6); // Defaulted
}

#[test]
fn config_toml_errors() {
    assert!(matches!(
        SimulationConfig::from_toml_str("stiffness = \"stiff\""),
        Err(FormFindError::Serialization(_))
    ));
    assert!(matches!(
        SimulationConfig::from_toml_str("substeps = 0"),
        Err(FormFindError::InvalidConfig(_))
    ));
    assert!(matches!(
        SimulationConfig::load("/nonexistent/formfind.toml"),
        Err(FormFindError::Io(_))
    ));
}

#[test]
fn config_serialization() {
    let config = SimulationConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let recovered: SimulationConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, config);
}

// ─── Simulation Tests ─────────────────────────────────────────

#[test]
fn anchor_is_bit_identical_after_many_steps() {
    let topology = Topology::from_pairs(2, [(0, 1)]).unwrap();
    let anchor = Vec3::new(3.25, -1.5, 0.75);
    let mut sim = Simulation::new(
        topology,
        &[anchor, Vec3::new(12.0, 0.0, 0.0)],
        &[0],
        SimulationConfig::single_step(),
    )
    .unwrap();

    for _ in 0..1000 {
        sim.step().unwrap();
    }
    assert_eq!(sim.steps(), 1000);
    assert_eq!(sim.state().position(0), anchor);
    assert!(sim.state().position(1).is_finite());
}

#[test]
fn grid_sags_under_gravity_with_fixed_corners() {
    let mesh = build_grid_mesh(&GridSpec::square(5), ConnectivityPattern::Grid).unwrap();
    let mut sim = Simulation::from_mesh(&mesh, SimulationConfig::default()).unwrap();
    assert_eq!(sim.integrator_name(), "explicit_euler");

    let reports = sim.run_frames(3).unwrap();
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[2].frame, 2);
    assert_eq!(reports[2].steps, 30);
    assert_eq!(sim.frames(), 3);

    for &corner in &mesh.anchors {
        assert_eq!(sim.state().position(corner), mesh.positions[corner]);
    }
    // Centre vertex moves along +z (gravity direction).
    assert!(sim.state().position(12).z > 0.0);
    assert_eq!(sim.positions().len(), 25);
    assert_eq!(sim.springs().len(), mesh.edge_count());
}

#[test]
fn pin_at_fraction_anchors_load_point() {
    let mesh = build_grid_mesh(&GridSpec::square(5), ConnectivityPattern::Grid).unwrap();
    let mut sim = Simulation::from_mesh(&mesh, SimulationConfig::default()).unwrap();
    sim.run_frames(2).unwrap();
    assert!(sim.state().position(12).z > 0.0);

    let index = sim.pin_at_fraction(0.5, 0.5).unwrap();
    assert_eq!(index, 12);
    assert!(sim.system().anchors().contains(12));
    assert_eq!(sim.state().position(12).z, 0.0);

    sim.run_frames(2).unwrap();
    assert_eq!(sim.state().position(12), mesh.positions[12]);

    // Pinning again is a no-op.
    assert!(!sim.pin_to_ground(12).unwrap());
    assert!(sim.pin_to_ground(99).is_err());
}

#[test]
fn pin_existing_anchor_keeps_its_target() {
    let topology = Topology::from_pairs(2, [(0, 1)]).unwrap();
    let anchor = Vec3::new(1.0, 2.0, 5.0);
    let sink = SharedVecSink::new();
    let mut sim = Simulation::new(
        topology,
        &[anchor, Vec3::new(9.0, 2.0, 5.0)],
        &[0],
        SimulationConfig::single_step(),
    )
    .unwrap();
    sim.bus_mut().add_sink(Box::new(sink.clone()));

    assert!(!sim.pin_to_ground(0).unwrap());
    assert_eq!(sim.pins()[&0], anchor);
    assert_eq!(sim.state().position(0), anchor);

    sim.step().unwrap();
    sim.advance_frame().unwrap();
    assert_eq!(sim.state().position(0), anchor);
    assert!(sink
        .events()
        .iter()
        .all(|e| !matches!(e.kind, EventKind::AnchorPinned { .. })));
}

#[test]
fn pin_at_fraction_needs_grid() {
    let topology = Topology::from_pairs(2, [(0, 1)]).unwrap();
    let mut sim = Simulation::new(
        topology,
        &[Vec3::ZERO, Vec3::X],
        &[0],
        SimulationConfig::default(),
    )
    .unwrap();
    assert!(sim.grid().is_none());
    assert!(sim.pin_at_fraction(0.5, 0.5).is_err());
}

#[test]
fn simulation_rejects_bad_inputs() {
    let topology = Topology::from_pairs(2, [(0, 1)]).unwrap();
    let bad = SimulationConfig {
        substeps: 0,
        ..Default::default()
    };
    assert!(Simulation::new(topology.clone(), &[Vec3::ZERO, Vec3::X], &[], bad).is_err());
    assert!(Simulation::new(topology, &[Vec3::ZERO], &[], SimulationConfig::default()).is_err());
}

#[test]
fn simulation_emits_telemetry() {
    let mesh = build_grid_mesh(&GridSpec::square(3), ConnectivityPattern::Grid).unwrap();
    let mut sim = Simulation::from_mesh(&mesh, SimulationConfig::default()).unwrap();
    let sink = SharedVecSink::new();
    sim.bus_mut().add_sink(Box::new(sink.clone()));

    sim.announce();
    sim.set_stiffness(0.2);
    sim.pin_to_ground(4).unwrap();
    sim.advance_frame().unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 4);
    assert_eq!(
        events[0].kind,
        EventKind::SystemInitialized {
            vertex_count: 9,
            spring_count: 12,
            anchor_count: 4,
        }
    );
    assert!(matches!(
        &events[1].kind,
        EventKind::ParameterChanged { name, .. } if name == "stiffness"
    ));
    assert_eq!(events[2].kind, EventKind::AnchorPinned { vertex: 4 });
    assert!(matches!(events[3].kind, EventKind::FrameEnd { steps: 10, .. }));
    assert!(sim.springs().iter().all(|s| s.stiffness == 0.2));
}

#[test]
fn live_parameters_reach_the_system() {
    let mesh = build_grid_mesh(&GridSpec::square(3), ConnectivityPattern::Bracing).unwrap();
    let mut sim = Simulation::from_mesh(&mesh, SimulationConfig::default()).unwrap();
    sim.set_rest_length(12.0);
    sim.set_gravity(0.5);
    assert!(sim.springs().iter().all(|s| s.rest_length == 12.0));
    assert_eq!(sim.system().params().gravity, Vec3::new(0.0, 0.0, 0.5));
    assert_eq!(sim.springs().len(), 20);
}

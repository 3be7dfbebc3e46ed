//! CLI command implementations.

use std::path::Path;

use formfind_mesh::{build_grid_mesh, ConnectivityPattern, GridSpec};
use formfind_solver::{Simulation, SimulationConfig};
use formfind_telemetry::TracingSink;
use formfind_types::constants::DEFAULT_RESOLUTION;
use formfind_types::{FormFindError, FormFindResult};
use serde::{Deserialize, Serialize};

/// A relaxation run as described by a TOML file.
///
/// ```toml
/// frames = 200
/// load_points = [[0.5, 0.5]]
///
/// [grid]
/// columns = 23
/// rows = 23
///
/// [pattern]
/// kind = "random_diagonal"
/// seed = 7
///
/// [simulation]
/// stiffness = 0.07
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Grid resolution and extent.
    pub grid: GridSpec,
    /// Connectivity pattern.
    pub pattern: ConnectivityPattern,
    /// Physical and stepping parameters.
    pub simulation: SimulationConfig,
    /// Frames to run.
    pub frames: u32,
    /// Fractional `(u, v)` points pinned to the ground before the run.
    pub load_points: Vec<[f32; 2]>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            grid: GridSpec::square(DEFAULT_RESOLUTION),
            pattern: ConnectivityPattern::Grid,
            simulation: SimulationConfig::default(),
            frames: 100,
            load_points: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Parses a TOML document and validates every section.
    pub fn from_toml_str(content: &str) -> FormFindResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| FormFindError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file with [`RunConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> FormFindResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks grid, pattern, and simulation parameters together.
    pub fn validate(&self) -> FormFindResult<()> {
        formfind_mesh::generators::effective_spec(&self.grid, self.pattern)?;
        self.simulation.validate()?;
        for &[u, v] in &self.load_points {
            if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
                return Err(FormFindError::InvalidConfig(format!(
                    "load point ({u}, {v}) must lie in [0, 1]²"
                )));
            }
        }
        Ok(())
    }
}

/// Command-line overrides for `formfind run`.
pub struct RunOverrides {
    pub config: Option<String>,
    pub pattern: Option<String>,
    pub resolution: Option<usize>,
    pub frames: Option<u32>,
    pub seed: u64,
}

impl RunOverrides {
    /// Loads the config file (or defaults) and applies the overrides.
    fn resolve(&self) -> FormFindResult<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };
        if let Some(name) = &self.pattern {
            config.pattern = ConnectivityPattern::from_name(name, self.seed)?;
        }
        if let Some(n) = self.resolution {
            config.grid.columns = n;
            config.grid.rows = n;
        }
        if let Some(frames) = self.frames {
            config.frames = frames;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Relax a grid and print ΣF·L per frame.
pub fn run(overrides: &RunOverrides) -> Result<(), Box<dyn std::error::Error>> {
    let config = overrides.resolve()?;

    println!("formfind Relaxation");
    println!("═══════════════════");
    println!();

    let mesh = build_grid_mesh(&config.grid, config.pattern)?;
    let mut sim = Simulation::from_mesh(&mesh, config.simulation)?;
    sim.bus_mut().add_sink(Box::new(TracingSink::new()));
    sim.announce();

    for &[u, v] in &config.load_points {
        let index = sim.pin_at_fraction(u, v)?;
        println!("Pinned vertex {index} at ({u:.2}, {v:.2})");
    }

    println!(
        "Pattern:   {} ({}x{})",
        config.pattern.name(),
        mesh.spec.columns,
        mesh.spec.rows
    );
    println!("Particles: {}", sim.system().num_masses());
    println!("Springs:   {}", sim.system().num_springs());
    println!("Anchors:   {}", sim.system().anchors().len());
    println!("Frames:    {} x {} steps", config.frames, config.simulation.substeps);
    println!();

    let mut total_time = 0.0;
    for _ in 0..config.frames {
        let report = sim.advance_frame()?;
        total_time += report.wall_time;
        println!(
            "  frame {:>5}  steps {:>7}  ΣF·L {:>14.6e}",
            report.frame, report.steps, report.sum_fl
        );
    }
    sim.bus_mut().finish();

    let sag = sim
        .positions()
        .iter()
        .map(|p| p.z)
        .fold(f32::NEG_INFINITY, f32::max);
    println!();
    println!("Wall time: {total_time:.3}s");
    println!("Max z:     {sag:.4}");
    println!("Final ΣF·L: {:.6e}", sim.sum_fl());

    Ok(())
}

/// Print vertex, edge, and anchor counts for one pattern or all of them.
pub fn topology(
    pattern_name: &str,
    resolution: usize,
    seed: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("formfind Topology");
    println!("─────────────────");
    println!();

    let patterns: Vec<ConnectivityPattern> = if pattern_name == "all" {
        ConnectivityPattern::all(seed).to_vec()
    } else {
        vec![ConnectivityPattern::from_name(pattern_name, seed)?]
    };

    let spec = GridSpec::square(resolution);
    for pattern in patterns {
        let mesh = build_grid_mesh(&spec, pattern)?;
        println!(
            "{:<16} {:>3}x{:<3} {:>6} verts  {:>6} springs  {:>6} tris  {} anchors",
            pattern.name(),
            mesh.spec.columns,
            mesh.spec.rows,
            mesh.vertex_count(),
            mesh.edge_count(),
            mesh.triangles().len(),
            mesh.anchors.len(),
        );
    }

    Ok(())
}

/// Validate a run config.
pub fn validate(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("formfind Validator");
    println!("──────────────────");
    println!();

    if !path.ends_with(".toml") {
        println!("Unsupported file format. Use .toml (run config).");
        return Ok(());
    }

    println!("Validating config: {path}");
    match RunConfig::load(path) {
        Ok(config) => {
            let spec = formfind_mesh::generators::effective_spec(&config.grid, config.pattern)?;
            println!(
                "✅ Config is valid ({}, {}x{}, {} frames).",
                config.pattern.name(),
                spec.columns,
                spec.rows,
                config.frames
            );
        }
        Err(e) => {
            println!("❌ Config validation failed: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

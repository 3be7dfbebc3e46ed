//! Solver configuration.
//!
//! [`SystemConfig`] holds the physical constants of one mass-spring system;
//! [`SimulationConfig`] adds spring constants and stepping parameters.
//! [`ForceParams`] is the runtime subset that force evaluation reads, owned
//! by a single system and reset from its `SystemConfig` on `initialize`.

use std::path::Path;

use formfind_types::constants::{
    DEFAULT_DAMPING, DEFAULT_GRAVITY_Z, DEFAULT_PARTICLE_MASS, DEFAULT_REST_LENGTH,
    DEFAULT_STEP_SIZE, DEFAULT_STIFFNESS, DEFAULT_SUBSTEPS, DEFAULT_VISCOUS_DRAG,
    DISTANCE_EPSILON,
};
use formfind_types::{FormFindError, FormFindResult, Vec3};
use serde::{Deserialize, Serialize};

/// Physical constants of a mass-spring system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Gravity vector [gx, gy, gz] applied to every particle.
    pub gravity: [f32; 3],

    /// Rest length given to springs by `setup_springs`.
    pub rest_length: f32,

    /// Homogeneous particle mass.
    pub particle_mass: f32,

    /// Viscous drag coefficient, multiplied with velocity (negative).
    pub viscous_drag: f32,

    /// Added to every spring length to keep zero-length springs finite.
    pub distance_epsilon: f32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, 0.0, DEFAULT_GRAVITY_Z],
            rest_length: DEFAULT_REST_LENGTH,
            particle_mass: DEFAULT_PARTICLE_MASS,
            viscous_drag: DEFAULT_VISCOUS_DRAG,
            distance_epsilon: DISTANCE_EPSILON,
        }
    }
}

impl SystemConfig {
    /// Rejects non-finite values and non-positive mass or epsilon.
    pub fn validate(&self) -> FormFindResult<()> {
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(FormFindError::InvalidConfig(format!(
                "gravity {:?} must be finite",
                self.gravity
            )));
        }
        check_finite("rest_length", self.rest_length)?;
        check_finite("viscous_drag", self.viscous_drag)?;
        check_positive("particle_mass", self.particle_mass)?;
        check_positive("distance_epsilon", self.distance_epsilon)?;
        Ok(())
    }
}

/// Full configuration for a [`Simulation`](crate::simulation::Simulation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Physical constants.
    pub system: SystemConfig,

    /// Spring stiffness `k_s`.
    pub stiffness: f32,

    /// Spring damping `k_d`. Stored on every spring; the force law ignores it.
    pub damping: f32,

    /// Explicit integration step size `h`.
    pub step_size: f32,

    /// Integrator sub-steps per frame.
    pub substeps: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            system: SystemConfig::default(),
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            step_size: DEFAULT_STEP_SIZE,
            substeps: DEFAULT_SUBSTEPS,
        }
    }
}

impl SimulationConfig {
    /// Creates a config that advances one step per frame, for inspection.
    pub fn single_step() -> Self {
        Self {
            substeps: 1,
            ..Default::default()
        }
    }

    /// Checks every field.
    pub fn validate(&self) -> FormFindResult<()> {
        self.system.validate()?;
        check_finite("stiffness", self.stiffness)?;
        check_finite("damping", self.damping)?;
        check_positive("step_size", self.step_size)?;
        if self.substeps == 0 {
            return Err(FormFindError::InvalidConfig(
                "substeps must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a TOML document. Missing fields take defaults.
    pub fn from_toml_str(content: &str) -> FormFindResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| FormFindError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file with [`SimulationConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> FormFindResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Runtime parameters read by force evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceParams {
    /// Constant gravity vector.
    pub gravity: Vec3,
    /// Rest length used for newly created springs.
    pub rest_length: f32,
    /// Viscous drag coefficient.
    pub viscous_drag: f32,
    /// Spring length guard.
    pub distance_epsilon: f32,
}

impl From<&SystemConfig> for ForceParams {
    fn from(config: &SystemConfig) -> Self {
        Self {
            gravity: Vec3::from_array(config.gravity),
            rest_length: config.rest_length,
            viscous_drag: config.viscous_drag,
            distance_epsilon: config.distance_epsilon,
        }
    }
}

fn check_finite(name: &str, value: f32) -> FormFindResult<()> {
    if !value.is_finite() {
        return Err(FormFindError::InvalidConfig(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(())
}

fn check_positive(name: &str, value: f32) -> FormFindResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(FormFindError::InvalidConfig(format!(
            "{name} must be positive, got {value}"
        )));
    }
    Ok(())
}

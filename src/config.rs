#![warn(missing_docs)]
//! Simulation configuration
//!
//! The configuration is read from a YAML file. All keys are optional; missing keys fall back to the
//! reference setup (see [`SimulationConfig::default`]).
//!
//! ```yaml
//! length_um: 2000.0
//! core_radius_um: 50.0
//! center_index: 1.5
//! index_delta: 0.01
//! speed_of_light_mps: 3.0e8
//! step_count: 5000
//! modes: [step, graded]
//! launch_angles_deg: [1.0, 4.0, 8.0, 12.0]
//! ```
use std::{fs, path::Path};

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    degree,
    error::{FiberError, FiberResult},
    experiment::DispersionExperiment,
    fiber_profile::FiberProfile,
    propagation::PropagationMode,
    utils::math_utils::linspace,
};

/// Parameters of a complete simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// axial length of the fiber (µm)
    pub length_um: f64,
    /// core radius (µm)
    pub core_radius_um: f64,
    /// refractive index on the fiber axis
    pub center_index: f64,
    /// relative index contrast
    pub index_delta: f64,
    /// speed of light (m/s)
    pub speed_of_light_mps: f64,
    /// number of axial integration steps
    pub step_count: usize,
    /// index profiles to be simulated, in this order
    pub modes: Vec<PropagationMode>,
    /// launch angles (degrees)
    pub launch_angles_deg: Vec<f64>,
}
impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            length_um: 2000.0,
            core_radius_um: 50.0,
            center_index: 1.5,
            index_delta: 0.01,
            speed_of_light_mps: 3.0e8,
            step_count: 5000,
            modes: vec![PropagationMode::Step, PropagationMode::Graded],
            launch_angles_deg: linspace(1.0, 12.0, 10).unwrap_or_default(),
        }
    }
}
impl SimulationConfig {
    /// Reads a [`SimulationConfig`] from a YAML file.
    ///
    /// # Errors
    ///
    /// This function returns an error if the file cannot be read or contains invalid YAML.
    pub fn from_file(path: &Path) -> FiberResult<Self> {
        info!("Reading configuration from {}", path.display());
        let contents = fs::read_to_string(path).map_err(|e| {
            FiberError::Configuration(format!("cannot read file {} : {e}", path.display()))
        })?;
        Self::from_yaml(&contents)
    }
    /// Parses a [`SimulationConfig`] from a YAML string.
    ///
    /// # Errors
    ///
    /// This function returns an error if the string is not a valid configuration.
    pub fn from_yaml(yaml: &str) -> FiberResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            FiberError::Configuration(format!("parsing of configuration failed: {e}"))
        })
    }
    /// Serializes this [`SimulationConfig`] to YAML.
    ///
    /// # Errors
    ///
    /// This function returns an error if the serialization fails.
    pub fn to_yaml(&self) -> FiberResult<String> {
        serde_yaml::to_string(self).map_err(|e| {
            FiberError::Configuration(format!("serialization of configuration failed: {e}"))
        })
    }
    /// Creates the validated [`FiberProfile`] described by this config.
    ///
    /// # Errors
    ///
    /// This function returns an error if the fiber parameters are invalid (see [`FiberProfile::new`]).
    pub fn fiber_profile(&self) -> FiberResult<FiberProfile> {
        FiberProfile::new(
            self.length_um,
            self.core_radius_um,
            self.center_index,
            self.index_delta,
            self.speed_of_light_mps,
            self.step_count,
        )
    }
    /// Creates the validated [`DispersionExperiment`] for the given mode.
    ///
    /// # Errors
    ///
    /// This function returns an error if the fiber parameters or the launch angles are invalid.
    pub fn experiment(&self, mode: PropagationMode) -> FiberResult<DispersionExperiment> {
        let angles = self.launch_angles_deg.iter().map(|a| degree!(*a)).collect();
        DispersionExperiment::new(self.fiber_profile()?, mode, angles)
    }
    /// Creates one [`DispersionExperiment`] per configured mode.
    ///
    /// # Errors
    ///
    /// This function returns an error if no mode is configured or if the parameters are invalid.
    pub fn experiments(&self) -> FiberResult<Vec<DispersionExperiment>> {
        if self.modes.is_empty() {
            return Err(FiberError::Configuration(
                "at least one propagation mode is required".into(),
            ));
        }
        self.modes.iter().map(|mode| self.experiment(*mode)).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    #[test]
    fn default() {
        let config = SimulationConfig::default();
        assert_eq!(config.fiber_profile().unwrap(), FiberProfile::default());
        assert_eq!(
            config.modes,
            vec![PropagationMode::Step, PropagationMode::Graded]
        );
        assert_eq!(config.launch_angles_deg.len(), 10);
        assert_eq!(config.launch_angles_deg[9], 12.0);
    }
    #[test]
    fn from_yaml_partial() {
        let config = SimulationConfig::from_yaml("core_radius_um: 25.0\nmodes: [graded]\n").unwrap();
        assert_eq!(config.core_radius_um, 25.0);
        assert_eq!(config.modes, vec![PropagationMode::Graded]);
        assert_eq!(config.length_um, 2000.0);
        assert_eq!(config.step_count, 5000);
    }
    #[test]
    fn from_yaml_full() {
        let yaml = "length_um: 1000.0
core_radius_um: 31.25
center_index: 1.46
index_delta: 0.02
speed_of_light_mps: 2.99792458e8
step_count: 2500
modes: [step]
launch_angles_deg: [0.0, 5.0]
";
        let config = SimulationConfig::from_yaml(yaml).unwrap();
        let profile = config.fiber_profile().unwrap();
        assert_eq!(profile.step_count(), 2500);
        assert_eq!(profile.center_index(), 1.46);
        let experiments = config.experiments().unwrap();
        assert_eq!(experiments.len(), 1);
        assert_eq!(experiments[0].launch_angles().len(), 2);
    }
    #[test]
    fn from_yaml_invalid() {
        assert!(SimulationConfig::from_yaml("unknown_key: 1.0").is_err());
        assert!(SimulationConfig::from_yaml("modes: [parabolic]").is_err());
        assert!(SimulationConfig::from_yaml("step_count: -5").is_err());
    }
    #[test]
    fn invalid_parameters() {
        let config = SimulationConfig {
            core_radius_um: 0.0,
            ..SimulationConfig::default()
        };
        assert!(config.fiber_profile().is_err());
        assert!(config.experiments().is_err());
        let config = SimulationConfig {
            launch_angles_deg: vec![],
            ..SimulationConfig::default()
        };
        assert!(config.experiment(PropagationMode::Step).is_err());
        let config = SimulationConfig {
            modes: vec![],
            ..SimulationConfig::default()
        };
        assert_eq!(
            config.experiments().unwrap_err(),
            FiberError::Configuration("at least one propagation mode is required".into())
        );
    }
    #[test]
    fn yaml_roundtrip() {
        let config = SimulationConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(SimulationConfig::from_yaml(&yaml).unwrap(), config);
    }
    #[test]
    fn from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "index_delta: 0.005").unwrap();
        let config = SimulationConfig::from_file(file.path()).unwrap();
        assert_eq!(config.index_delta, 0.005);
        assert!(SimulationConfig::from_file(Path::new("./this_file_does_not_exist.yaml")).is_err());
    }
}

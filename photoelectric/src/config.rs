//! Application configuration
//!
//! Loaded from a TOML file; every field has a default so a partial file (or
//! no file at all) is fine. Example:
//!
//! ```toml
//! [simulation]
//! tick_rate_hz = 100.0
//! seed = 42
//!
//! [initial]
//! wavelength_nm = 450
//! intensity_percent = 60
//! material = "zinc"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::HistoryConfig;
use crate::materials::TargetMaterial;
use crate::model::DEFAULT_NOISE_STD_DEV;
use crate::params::SimulationParameters;
use crate::simulator::SimulatorConfig;

/// Looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "photoelectric.toml";

/// Upper bound on `history.max_retained`
pub const MAX_HISTORY_RETAINED: usize = 100_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub simulation: SimulationConfig,
    pub measurement: MeasurementConfig,
    pub history: HistorySection,
    pub initial: InitialConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Photoelectric Effect".to_string(),
            width: 1280,
            height: 800,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed animation rate (ticks per second)
    pub tick_rate_hz: f32,
    /// Upper bound on catch-up ticks per rendered frame
    pub max_ticks_per_frame: u32,
    pub spawn_interval_ticks: u64,
    pub regeneration_delay_ticks: u64,
    pub reserved_slot_count: u32,
    pub emission_boundary: f32,
    pub collection_boundary: f32,
    pub lateral_min: f32,
    pub lateral_max: f32,
    /// Fixed seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let sim = SimulatorConfig::default();
        Self {
            tick_rate_hz: 100.0,
            max_ticks_per_frame: 10,
            spawn_interval_ticks: sim.spawn_interval_ticks,
            regeneration_delay_ticks: sim.regeneration_delay_ticks,
            reserved_slot_count: sim.reserved_slot_count,
            emission_boundary: sim.emission_boundary,
            collection_boundary: sim.collection_boundary,
            lateral_min: sim.lateral_min,
            lateral_max: sim.lateral_max,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn simulator(&self) -> SimulatorConfig {
        SimulatorConfig {
            spawn_interval_ticks: self.spawn_interval_ticks,
            regeneration_delay_ticks: self.regeneration_delay_ticks,
            reserved_slot_count: self.reserved_slot_count,
            emission_boundary: self.emission_boundary,
            collection_boundary: self.collection_boundary,
            lateral_min: self.lateral_min,
            lateral_max: self.lateral_max,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Standard deviation of the jitter on plotted current samples
    pub noise_std_dev: f64,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            noise_std_dev: DEFAULT_NOISE_STD_DEV,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HistorySection {
    pub max_retained: usize,
    pub trim_batch: usize,
    pub scroll_step: f64,
    pub arrival_marker: f64,
}

impl Default for HistorySection {
    fn default() -> Self {
        let history = HistoryConfig::default();
        Self {
            max_retained: history.max_retained,
            trim_batch: history.trim_batch,
            scroll_step: history.scroll_step,
            arrival_marker: history.arrival_marker,
        }
    }
}

impl HistorySection {
    pub fn history(&self) -> HistoryConfig {
        HistoryConfig {
            max_retained: self.max_retained,
            trim_batch: self.trim_batch,
            scroll_step: self.scroll_step,
            arrival_marker: self.arrival_marker,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InitialConfig {
    pub wavelength_nm: i64,
    pub intensity_percent: i64,
    pub material: String,
}

impl Default for InitialConfig {
    fn default() -> Self {
        let params = SimulationParameters::default();
        Self {
            wavelength_nm: params.wavelength_nm() as i64,
            intensity_percent: params.intensity_percent() as i64,
            material: params.material().name().to_string(),
        }
    }
}

impl InitialConfig {
    pub fn parameters(&self) -> Result<SimulationParameters, crate::PhotoError> {
        let wavelength_nm = SimulationParameters::validate_wavelength(self.wavelength_nm)?;
        let intensity_percent = SimulationParameters::validate_intensity(self.intensity_percent)?;
        let material = TargetMaterial::from_name(&self.material)?;
        Ok(SimulationParameters::new(
            wavelength_nm as i64,
            intensity_percent as i64,
            material,
        ))
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Explicit path if given, else `photoelectric.toml` if present, else defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            log::info!("Loading configuration from {}", path.display());
            return Self::load(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            log::info!("Loading configuration from {}", fallback.display());
            Self::load(fallback)
        } else {
            log::warn!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if !(sim.tick_rate_hz.is_finite() && sim.tick_rate_hz > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "simulation.tick_rate_hz must be > 0, got {}",
                sim.tick_rate_hz
            )));
        }
        if sim.max_ticks_per_frame == 0 {
            return Err(ConfigError::Invalid("simulation.max_ticks_per_frame must be > 0".into()));
        }
        if sim.spawn_interval_ticks == 0 {
            return Err(ConfigError::Invalid("simulation.spawn_interval_ticks must be > 0".into()));
        }
        if sim.regeneration_delay_ticks == 0 {
            return Err(ConfigError::Invalid(
                "simulation.regeneration_delay_ticks must be > 0".into(),
            ));
        }
        for (name, value) in [
            ("emission_boundary", sim.emission_boundary),
            ("collection_boundary", sim.collection_boundary),
            ("lateral_min", sim.lateral_min),
            ("lateral_max", sim.lateral_max),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("simulation.{} must be finite, got {}", name, value)));
            }
        }
        if sim.collection_boundary <= sim.emission_boundary {
            return Err(ConfigError::Invalid(format!(
                "simulation.collection_boundary ({}) must exceed emission_boundary ({})",
                sim.collection_boundary, sim.emission_boundary
            )));
        }
        if sim.lateral_max < sim.lateral_min {
            return Err(ConfigError::Invalid("simulation.lateral_max must be >= lateral_min".into()));
        }
        if !(self.measurement.noise_std_dev.is_finite() && self.measurement.noise_std_dev >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "measurement.noise_std_dev must be >= 0, got {}",
                self.measurement.noise_std_dev
            )));
        }
        if self.history.max_retained == 0 || self.history.trim_batch == 0 {
            return Err(ConfigError::Invalid(
                "history.max_retained and history.trim_batch must be > 0".into(),
            ));
        }
        if self.history.max_retained > MAX_HISTORY_RETAINED {
            return Err(ConfigError::Invalid(format!(
                "history.max_retained must be <= {}, got {}",
                MAX_HISTORY_RETAINED, self.history.max_retained
            )));
        }
        if !(self.history.scroll_step.is_finite() && self.history.arrival_marker.is_finite()) {
            return Err(ConfigError::Invalid(
                "history.scroll_step and history.arrival_marker must be finite".into(),
            ));
        }
        if let Err(err) = self.initial.parameters() {
            return Err(ConfigError::Invalid(err.to_string()));
        }
        Ok(())
    }
}

//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation horizon and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Demand profile parameters.
    #[serde(default)]
    pub demand: DemandConfig,
    /// Solar generation parameters.
    #[serde(default)]
    pub solar: SolarConfig,
    /// Wind generation parameters.
    #[serde(default)]
    pub wind: WindConfig,
    /// Battery storage parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// External minimizer parameters.
    #[serde(default)]
    pub solver: SolverConfig,
}

/// Simulation horizon and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of hourly intervals in the horizon (must be > 0).
    pub horizon: usize,
    /// Master random seed for profile generation.
    pub seed: u64,
    /// Grid electricity price per kWh.
    pub grid_price: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon: 24,
            seed: 42,
            grid_price: 0.15,
        }
    }
}

/// Demand profile parameters: a day/night step function.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    /// Demand level inside the daytime window (kW).
    pub day_kw: f64,
    /// Demand level outside the daytime window (kW).
    pub night_kw: f64,
    /// First daytime interval (inclusive).
    pub daytime_start: usize,
    /// End of the daytime window (exclusive).
    pub daytime_end: usize,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            day_kw: 5.0,
            night_kw: 3.0,
            daytime_start: 6,
            daytime_end: 18,
        }
    }
}

/// Solar generation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Maximum output under ideal conditions (kW).
    pub max_kw: f64,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self { max_kw: 6.0 }
    }
}

/// Wind generation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindConfig {
    /// Maximum output under ideal conditions (kW).
    pub max_kw: f64,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self { max_kw: 5.0 }
    }
}

/// Battery storage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Total energy capacity (kWh).
    pub capacity_kwh: f64,
    /// Initial state of charge as a fraction (0.0–1.0).
    pub initial_soc: f64,
    /// Charge efficiency (0.0–1.0].
    pub eta_charge: f64,
    /// Discharge efficiency (0.0–1.0].
    pub eta_discharge: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 10.0,
            initial_soc: 0.2,
            eta_charge: 0.9,
            eta_discharge: 0.85,
        }
    }
}

/// External minimizer parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Maximum solver iterations before reporting non-convergence.
    pub max_iterations: u64,
    /// Simplex standard-deviation tolerance for termination.
    pub sd_tolerance: f64,
    /// Exterior penalty weight for bound violations.
    pub penalty_weight: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            sd_tolerance: 1e-8,
            penalty_weight: 1e4,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.horizon"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario (the original model constants).
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            demand: DemandConfig::default(),
            solar: SolarConfig::default(),
            wind: WindConfig::default(),
            battery: BatteryConfig::default(),
            solver: SolverConfig::default(),
        }
    }

    /// Returns the high-renewables preset: large PV and wind with more storage.
    pub fn high_renewables() -> Self {
        Self {
            solar: SolarConfig { max_kw: 12.0 },
            wind: WindConfig { max_kw: 8.0 },
            battery: BatteryConfig {
                capacity_kwh: 20.0,
                initial_soc: 0.3,
                ..BatteryConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the winter preset: short daylight, weak sun, higher demand.
    pub fn winter() -> Self {
        Self {
            simulation: SimulationConfig {
                grid_price: 0.22,
                ..SimulationConfig::default()
            },
            demand: DemandConfig {
                day_kw: 6.5,
                night_kw: 4.0,
                daytime_start: 8,
                daytime_end: 16,
            },
            solar: SolarConfig { max_kw: 2.5 },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "high_renewables", "winter"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "high_renewables" => Ok(Self::high_renewables()),
            "winter" => Ok(Self::winter()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Nothing is
    /// clamped: an out-of-range value is always reported, never repaired.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.horizon == 0 {
            errors.push(ConfigError {
                field: "simulation.horizon".into(),
                message: "must be > 0".into(),
            });
        }
        if s.grid_price <= 0.0 {
            errors.push(ConfigError {
                field: "simulation.grid_price".into(),
                message: "must be > 0".into(),
            });
        }

        let d = &self.demand;
        if d.daytime_start >= d.daytime_end {
            errors.push(ConfigError {
                field: "demand.daytime_start".into(),
                message: "must be < demand.daytime_end".into(),
            });
        }
        if s.horizon > 0 && d.daytime_end > s.horizon {
            errors.push(ConfigError {
                field: "demand.daytime_end".into(),
                message: "must be <= simulation.horizon".into(),
            });
        }
        if d.day_kw < 0.0 || d.night_kw < 0.0 {
            errors.push(ConfigError {
                field: "demand.day_kw".into(),
                message: "demand levels must be >= 0".into(),
            });
        }

        if self.solar.max_kw < 0.0 {
            errors.push(ConfigError {
                field: "solar.max_kw".into(),
                message: "must be >= 0".into(),
            });
        }
        if self.wind.max_kw < 0.0 {
            errors.push(ConfigError {
                field: "wind.max_kw".into(),
                message: "must be >= 0".into(),
            });
        }

        let bat = &self.battery;
        if bat.capacity_kwh <= 0.0 {
            errors.push(ConfigError {
                field: "battery.capacity_kwh".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&bat.initial_soc) {
            errors.push(ConfigError {
                field: "battery.initial_soc".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if !(bat.eta_charge > 0.0 && bat.eta_charge <= 1.0) {
            errors.push(ConfigError {
                field: "battery.eta_charge".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }
        if !(bat.eta_discharge > 0.0 && bat.eta_discharge <= 1.0) {
            errors.push(ConfigError {
                field: "battery.eta_discharge".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }

        let sol = &self.solver;
        if sol.max_iterations == 0 {
            errors.push(ConfigError {
                field: "solver.max_iterations".into(),
                message: "must be > 0".into(),
            });
        }
        if sol.sd_tolerance <= 0.0 {
            errors.push(ConfigError {
                field: "solver.sd_tolerance".into(),
                message: "must be > 0".into(),
            });
        }
        if sol.penalty_weight <= 0.0 {
            errors.push(ConfigError {
                field: "solver.penalty_weight".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn baseline_matches_original_constants() {
        let cfg = ScenarioConfig::baseline();
        assert_eq!(cfg.simulation.horizon, 24);
        assert_eq!(cfg.simulation.grid_price, 0.15);
        assert_eq!(cfg.battery.capacity_kwh, 10.0);
        assert_eq!(cfg.battery.eta_charge, 0.9);
        assert_eq!(cfg.battery.eta_discharge, 0.85);
        assert_eq!(cfg.demand.daytime_start, 6);
        assert_eq!(cfg.demand.daytime_end, 18);
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
horizon = 48
seed = 99
grid_price = 0.21

[demand]
day_kw = 4.0
night_kw = 1.5
daytime_start = 12
daytime_end = 36

[solar]
max_kw = 8.0

[wind]
max_kw = 3.0

[battery]
capacity_kwh = 15.0
initial_soc = 0.5
eta_charge = 0.92
eta_discharge = 0.88

[solver]
max_iterations = 500
sd_tolerance = 1e-6
penalty_weight = 100.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.horizon), Some(48));
        assert_eq!(cfg.as_ref().map(|c| c.battery.capacity_kwh), Some(15.0));
        assert_eq!(cfg.as_ref().map(|c| c.solver.max_iterations), Some(500));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
horizon = 24
bogus_field = true
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(99));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.horizon), Some(24));
        assert_eq!(cfg.as_ref().map(|c| c.solar.max_kw), Some(6.0));
    }

    #[test]
    fn validation_catches_zero_horizon() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.horizon = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.horizon"));
    }

    #[test]
    fn validation_catches_invalid_soc() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.battery.initial_soc = 1.5;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.initial_soc"));
    }

    #[test]
    fn validation_catches_zero_efficiency() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.battery.eta_charge = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.eta_charge"));
    }

    #[test]
    fn validation_catches_efficiency_above_one() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.battery.eta_discharge = 1.01;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.eta_discharge"));
    }

    #[test]
    fn validation_catches_daytime_window_outside_horizon() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.demand.daytime_end = 30;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "demand.daytime_end"));
    }

    #[test]
    fn validation_catches_inverted_daytime_window() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.demand.daytime_start = 18;
        cfg.demand.daytime_end = 6;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "demand.daytime_start"));
    }

    #[test]
    fn validation_catches_nonpositive_capacity() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.battery.capacity_kwh = -1.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.capacity_kwh"));
    }

    #[test]
    fn validation_catches_zero_solver_iterations() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.solver.max_iterations = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "solver.max_iterations"));
    }

    #[test]
    fn winter_has_shorter_daylight() {
        let base = ScenarioConfig::baseline();
        let winter = ScenarioConfig::winter();
        let base_hours = base.demand.daytime_end - base.demand.daytime_start;
        let winter_hours = winter.demand.daytime_end - winter.demand.daytime_start;
        assert!(winter_hours < base_hours);
        assert!(winter.solar.max_kw < base.solar.max_kw);
    }
}

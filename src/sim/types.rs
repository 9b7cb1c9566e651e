//! Core simulation types: configuration, decision vector, and result records.

use std::fmt;

use crate::battery::BatteryModel;
use crate::config::ScenarioConfig;

/// Numeric configuration for one dispatch simulation run.
///
/// The simulator and the optimizer both reference this struct, so the
/// horizon, prices, and bounds are derived in exactly one place.
///
/// # Examples
///
/// ```
/// use dispatch_sim::config::ScenarioConfig;
/// use dispatch_sim::sim::types::DispatchConfig;
///
/// let cfg = DispatchConfig::from_scenario(&ScenarioConfig::baseline());
/// assert_eq!(cfg.horizon, 24);
/// assert_eq!(cfg.grid_max_kw, 6.0);
/// ```
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Number of hourly intervals.
    pub horizon: usize,
    /// Grid electricity price per kWh.
    pub grid_price: f64,
    /// Per-interval upper bound on grid draw (kW).
    pub grid_max_kw: f64,
    /// Initial state of charge as a fraction of capacity.
    pub initial_soc_frac: f64,
    /// Battery parameters.
    pub battery: BatteryModel,
}

impl DispatchConfig {
    /// Derives the numeric run configuration from a validated scenario.
    ///
    /// The grid bound mirrors the search-space bound handed to the solver:
    /// the larger of the two renewable maxima.
    pub fn from_scenario(cfg: &ScenarioConfig) -> Self {
        Self {
            horizon: cfg.simulation.horizon,
            grid_price: cfg.simulation.grid_price,
            grid_max_kw: cfg.solar.max_kw.max(cfg.wind.max_kw),
            initial_soc_frac: cfg.battery.initial_soc,
            battery: BatteryModel {
                capacity_kwh: cfg.battery.capacity_kwh,
                eta_charge: cfg.battery.eta_charge,
                eta_discharge: cfg.battery.eta_discharge,
            },
        }
    }

    /// Length of a decision vector for this horizon.
    pub fn decision_len(&self) -> usize {
        3 * self.horizon
    }
}

/// Decision-vector length mismatch, detected at the start of every
/// simulator evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeError {
    /// Required length (`3 · horizon`).
    pub expected: usize,
    /// Length actually provided.
    pub actual: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "decision vector has length {} but the horizon requires {}",
            self.actual, self.expected
        )
    }
}

impl std::error::Error for ShapeError {}

/// Per-interval dispatch decisions over the full horizon.
///
/// One flat sequence of `3 · T` non-negative values, logically three
/// sub-sequences of length `T`: grid draw, battery charge, battery
/// discharge. This is the quantity the optimizer searches over; a
/// simulation pass treats it as immutable input.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionVector {
    values: Vec<f64>,
    horizon: usize,
}

impl DecisionVector {
    /// Wraps a flat `3 · horizon` sequence.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] if the length does not match the horizon.
    pub fn new(values: Vec<f64>, horizon: usize) -> Result<Self, ShapeError> {
        if values.len() != 3 * horizon {
            return Err(ShapeError {
                expected: 3 * horizon,
                actual: values.len(),
            });
        }
        Ok(Self { values, horizon })
    }

    /// Builds a vector from its three logical parts.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] if the parts are not all the same length.
    pub fn from_parts(grid: &[f64], charge: &[f64], discharge: &[f64]) -> Result<Self, ShapeError> {
        let horizon = grid.len();
        if charge.len() != horizon || discharge.len() != horizon {
            return Err(ShapeError {
                expected: 3 * horizon,
                actual: grid.len() + charge.len() + discharge.len(),
            });
        }
        let mut values = Vec::with_capacity(3 * horizon);
        values.extend_from_slice(grid);
        values.extend_from_slice(charge);
        values.extend_from_slice(discharge);
        Ok(Self { values, horizon })
    }

    /// All-zero decisions for the given horizon.
    pub fn zeros(horizon: usize) -> Self {
        Self {
            values: vec![0.0; 3 * horizon],
            horizon,
        }
    }

    /// Default initial guess: grid draw set to the demand profile, battery
    /// entries zero.
    pub fn grid_only(demand: &[f64]) -> Self {
        let horizon = demand.len();
        let mut values = vec![0.0; 3 * horizon];
        values[..horizon].copy_from_slice(demand);
        Self { values, horizon }
    }

    /// Horizon this vector was sized for.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Grid-draw sub-sequence (kW per interval).
    pub fn grid(&self) -> &[f64] {
        &self.values[..self.horizon]
    }

    /// Battery-charge sub-sequence (kW per interval).
    pub fn charge(&self) -> &[f64] {
        &self.values[self.horizon..2 * self.horizon]
    }

    /// Battery-discharge sub-sequence (kW per interval).
    pub fn discharge(&self) -> &[f64] {
        &self.values[2 * self.horizon..]
    }

    /// The flat `3 · T` sequence.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Accumulated totals and SOC trajectory from one simulation pass.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Total grid cost over the horizon (currency).
    pub cost: f64,
    /// Total renewable energy utilized (kWh).
    pub savings: f64,
    /// SOC at every interval boundary (kWh), length `T`.
    pub soc: Vec<f64>,
}

impl SimulationResult {
    /// Scalar the optimizer minimizes; more negative is better.
    pub fn objective(&self) -> f64 {
        self.cost - self.savings
    }
}

/// Complete record of one simulated interval, for reporting and export.
#[derive(Debug, Clone)]
pub struct IntervalRecord {
    /// Interval index.
    pub interval: usize,
    /// Demand (kW).
    pub demand_kw: f64,
    /// Solar generation (kW).
    pub solar_kw: f64,
    /// Wind generation (kW).
    pub wind_kw: f64,
    /// Requested grid draw from the decision vector (kW).
    pub grid_kw: f64,
    /// Requested battery charge (kW).
    pub charge_kw: f64,
    /// Requested battery discharge (kW).
    pub discharge_kw: f64,
    /// Demand served from renewables (kW).
    pub from_renewable_kw: f64,
    /// Demand served from the battery (kW).
    pub from_battery_kw: f64,
    /// Demand served from the grid (kW).
    pub from_grid_kw: f64,
    /// Demand left unserved (kW).
    pub unmet_kw: f64,
    /// SOC after this interval (kWh).
    pub soc_kwh: f64,
    /// Grid cost incurred this interval.
    pub cost: f64,
}

impl fmt::Display for IntervalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>3} | demand={:>5.2} kW  ren={:>5.2}  bat={:>5.2}  grid={:>5.2}  \
             unmet={:>5.2} | SOC={:>6.2} kWh | cost={:.4}",
            self.interval,
            self.demand_kw,
            self.from_renewable_kw,
            self.from_battery_kw,
            self.from_grid_kw,
            self.unmet_kw,
            self.soc_kwh,
            self.cost,
        )
    }
}

//! Dispatch optimizer: search-space bounds, initial guess, solver driving.

use std::fmt;

use crate::profile::Profiles;
use crate::sim::simulator::{self, BAD_OBJECTIVE};
use crate::sim::types::{DecisionVector, DispatchConfig, ShapeError};

use super::minimizer::{BoundedMinimizer, Bounds, SolverError};

/// Optimized decision vector together with the solver's final verdict.
///
/// Terminal: produced once per optimizer run and consumed by reporting.
/// `converged = false` is a visible, first-class outcome carrying the best
/// vector found so far; it must never be mistaken for a converged one.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Decision vector achieving the minimal objective found.
    pub decision: DecisionVector,
    /// Objective value at that vector (`cost − savings`).
    pub objective_value: f64,
    /// Whether the external minimizer converged on its own tolerance.
    pub converged: bool,
    /// Solver iterations performed.
    pub iterations: u64,
}

/// Failure to even start or finish a search. Non-convergence is not an
/// error; it is the `converged` flag on [`OptimizationResult`].
#[derive(Debug)]
pub enum OptimizeError {
    /// Initial guess does not match the horizon.
    Shape(ShapeError),
    /// External minimizer failed to set up or execute.
    Solver(SolverError),
}

impl fmt::Display for OptimizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape(e) => write!(f, "optimize error: {e}"),
            Self::Solver(e) => write!(f, "optimize error: {e}"),
        }
    }
}

impl std::error::Error for OptimizeError {}

impl From<ShapeError> for OptimizeError {
    fn from(e: ShapeError) -> Self {
        Self::Shape(e)
    }
}

impl From<SolverError> for OptimizeError {
    fn from(e: SolverError) -> Self {
        Self::Solver(e)
    }
}

/// Drives an external bounded minimizer over the dispatch objective.
///
/// Generic over `M: BoundedMinimizer` for static dispatch; the simulator
/// stays the "what is optimized" half while the minimizer backend is the
/// "how it is searched" half.
#[derive(Debug, Clone)]
pub struct DispatchOptimizer<M: BoundedMinimizer> {
    minimizer: M,
}

impl<M: BoundedMinimizer> DispatchOptimizer<M> {
    /// Creates an optimizer around the given minimizer backend.
    pub fn new(minimizer: M) -> Self {
        Self { minimizer }
    }

    /// Per-entry search-space bounds: grid draw within
    /// `[0, max(solar_max, wind_max)]`, charge and discharge within
    /// `[0, capacity]`, each repeated once per interval.
    pub fn bounds(cfg: &DispatchConfig) -> Bounds {
        let horizon = cfg.horizon;
        let mut upper = Vec::with_capacity(3 * horizon);
        upper.extend(std::iter::repeat_n(cfg.grid_max_kw, horizon));
        upper.extend(std::iter::repeat_n(cfg.battery.capacity_kwh, 2 * horizon));
        Bounds::new(vec![0.0; 3 * horizon], upper)
    }

    /// Default initial guess: serve all demand from the grid, battery idle.
    pub fn default_guess(profiles: &Profiles) -> DecisionVector {
        DecisionVector::grid_only(&profiles.demand)
    }

    /// Runs one blocking search and returns the solver's final vector and
    /// objective value unchanged — no post-processing, no re-validation
    /// beyond the bounds the solver itself enforced.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError::Shape`] if the initial guess does not match
    /// the horizon, or [`OptimizeError::Solver`] if the minimizer fails
    /// outright. Non-convergence is reported through the result flag.
    pub fn optimize(
        &self,
        profiles: &Profiles,
        cfg: &DispatchConfig,
        initial: &DecisionVector,
    ) -> Result<OptimizationResult, OptimizeError> {
        if initial.horizon() != cfg.horizon {
            return Err(OptimizeError::Shape(ShapeError {
                expected: cfg.decision_len(),
                actual: initial.as_slice().len(),
            }));
        }

        let bounds = Self::bounds(cfg);
        let objective =
            |x: &[f64]| simulator::objective(x, profiles, cfg).unwrap_or(BAD_OBJECTIVE);

        let outcome = self
            .minimizer
            .minimize(objective, initial.as_slice(), &bounds)?;

        let decision = DecisionVector::new(outcome.x, cfg.horizon)?;
        Ok(OptimizationResult {
            decision,
            objective_value: outcome.value,
            converged: outcome.converged,
            iterations: outcome.iterations,
        })
    }
}

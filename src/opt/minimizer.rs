//! Bounded nonlinear minimizer contract and the default argmin backend.
//!
//! The dispatch optimizer only depends on the narrow [`BoundedMinimizer`]
//! trait: objective in, best vector plus value plus convergence flag out.
//! Any bounded local or global minimizer satisfying that contract is
//! substitutable for the Nelder–Mead backend shipped here.

use std::fmt;

use argmin::core::{CostFunction, Error, Executor, State, TerminationReason};
use argmin::solver::neldermead::NelderMead;

/// Box bounds over the search space, one `[lower, upper]` pair per entry.
#[derive(Debug, Clone)]
pub struct Bounds {
    /// Per-entry lower bounds.
    pub lower: Vec<f64>,
    /// Per-entry upper bounds.
    pub upper: Vec<f64>,
}

impl Bounds {
    /// Creates bounds from matching lower/upper vectors.
    ///
    /// # Panics
    ///
    /// Panics if the vectors differ in length or any pair is inverted.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Self {
        assert_eq!(lower.len(), upper.len());
        assert!(lower.iter().zip(&upper).all(|(lo, hi)| lo <= hi));
        Self { lower, upper }
    }

    /// Number of bounded entries.
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Whether the bound list is empty.
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }
}

/// Outcome of one minimizer run.
///
/// A `converged = false` outcome still carries the best vector found so
/// far; callers must check the flag before trusting the result.
#[derive(Debug, Clone)]
pub struct MinimizeOutcome {
    /// Best parameter vector found.
    pub x: Vec<f64>,
    /// Objective value at `x` (penalty included; zero inside the bounds).
    pub value: f64,
    /// Whether the solver terminated on its own tolerance rather than the
    /// iteration cap.
    pub converged: bool,
    /// Iterations actually performed.
    pub iterations: u64,
}

/// Solver setup or execution failure. Distinct from non-convergence,
/// which is reported through [`MinimizeOutcome::converged`].
#[derive(Debug)]
pub struct SolverError {
    /// Human-readable failure description.
    pub message: String,
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "solver error: {}", self.message)
    }
}

impl std::error::Error for SolverError {}

/// External bounded nonlinear minimizer capability.
pub trait BoundedMinimizer {
    /// Minimizes `objective` within `bounds`, starting from `initial`.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] when the solver cannot be constructed or
    /// fails during execution. Running out of iterations is not an error;
    /// it surfaces as `converged = false` on the outcome.
    fn minimize<F>(
        &self,
        objective: F,
        initial: &[f64],
        bounds: &Bounds,
    ) -> Result<MinimizeOutcome, SolverError>
    where
        F: Fn(&[f64]) -> f64;
}

/// Wrapper that turns the box-constrained problem into an unconstrained
/// one by adding quadratic penalty terms for bound violations:
///
/// ```text
/// P(x) = f(x) + w · Σ max(0, lb_i − x_i)² + w · Σ max(0, x_i − ub_i)²
/// ```
///
/// The penalty is exterior: it is exactly zero inside the bounds and grows
/// smoothly outside them.
struct PenalizedObjective<'a, F> {
    objective: F,
    bounds: &'a Bounds,
    weight: f64,
}

impl<F> CostFunction for PenalizedObjective<'_, F>
where
    F: Fn(&[f64]) -> f64,
{
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        let mut cost = (self.objective)(x);
        for (i, &xi) in x.iter().enumerate() {
            if xi < self.bounds.lower[i] {
                let violation = self.bounds.lower[i] - xi;
                cost += self.weight * violation * violation;
            }
            if xi > self.bounds.upper[i] {
                let violation = xi - self.bounds.upper[i];
                cost += self.weight * violation * violation;
            }
        }
        Ok(cost)
    }
}

/// Derivative-free Nelder–Mead backend over `Vec<f64>`.
///
/// The initial simplex is built around the caller's initial guess, so a
/// good starting vector (grid = demand) is kept as one of the vertices.
#[derive(Debug, Clone)]
pub struct NelderMeadMinimizer {
    /// Iteration cap; exceeding it reports non-convergence.
    pub max_iterations: u64,
    /// Simplex standard-deviation tolerance for termination.
    pub sd_tolerance: f64,
    /// Exterior penalty weight for bound violations.
    pub penalty_weight: f64,
}

impl Default for NelderMeadMinimizer {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            sd_tolerance: 1e-8,
            penalty_weight: 1e4,
        }
    }
}

impl NelderMeadMinimizer {
    /// Initial simplex: the guess itself plus one vertex per dimension,
    /// offset by a fraction of that dimension's bound span (stepping
    /// inward when the offset would leave the box).
    fn build_simplex(initial: &[f64], bounds: &Bounds) -> Vec<Vec<f64>> {
        let n = initial.len();
        let mut simplex = Vec::with_capacity(n + 1);
        simplex.push(initial.to_vec());
        for i in 0..n {
            let span = bounds.upper[i] - bounds.lower[i];
            let step = if span > 0.0 { 0.05 * span } else { 0.1 };
            let mut vertex = initial.to_vec();
            vertex[i] = if vertex[i] + step <= bounds.upper[i] {
                vertex[i] + step
            } else {
                vertex[i] - step
            };
            simplex.push(vertex);
        }
        simplex
    }
}

impl BoundedMinimizer for NelderMeadMinimizer {
    fn minimize<F>(
        &self,
        objective: F,
        initial: &[f64],
        bounds: &Bounds,
    ) -> Result<MinimizeOutcome, SolverError>
    where
        F: Fn(&[f64]) -> f64,
    {
        if initial.len() != bounds.len() {
            return Err(SolverError {
                message: format!(
                    "initial guess has {} entries but {} bounds were given",
                    initial.len(),
                    bounds.len()
                ),
            });
        }
        if initial.is_empty() {
            return Err(SolverError {
                message: "cannot minimize over an empty search space".to_string(),
            });
        }

        let problem = PenalizedObjective {
            objective,
            bounds,
            weight: self.penalty_weight,
        };

        let simplex = Self::build_simplex(initial, bounds);
        let solver = NelderMead::new(simplex)
            .with_sd_tolerance(self.sd_tolerance)
            .map_err(|e| SolverError {
                message: format!("invalid sd tolerance: {e}"),
            })?;

        let max_iterations = self.max_iterations;
        let result = Executor::new(problem, solver)
            .configure(|state| state.max_iters(max_iterations))
            .run()
            .map_err(|e| SolverError {
                message: format!("nelder-mead execution failed: {e}"),
            })?;

        let state = result.state();
        let x = state.get_best_param().cloned().ok_or_else(|| SolverError {
            message: "solver terminated without a best parameter".to_string(),
        })?;

        let converged = match state.get_termination_reason() {
            Some(TerminationReason::MaxItersReached) | None => false,
            Some(_) => true,
        };

        Ok(MinimizeOutcome {
            x,
            value: state.get_best_cost(),
            converged,
            iterations: state.get_iter(),
        })
    }
}

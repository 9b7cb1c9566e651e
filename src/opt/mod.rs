//! Bounded minimizer contract and the dispatch optimizer built on it.

pub mod minimizer;
pub mod optimizer;

pub use minimizer::{BoundedMinimizer, Bounds, MinimizeOutcome, NelderMeadMinimizer, SolverError};
pub use optimizer::{DispatchOptimizer, OptimizationResult, OptimizeError};

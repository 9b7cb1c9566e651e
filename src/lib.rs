//! Hybrid renewable/battery/grid dispatch optimizer.

/// Stateless battery SOC model.
pub mod battery;
pub mod config;
/// CSV export of dispatch traces.
pub mod io;
pub mod opt;
/// Demand, solar, and wind profile generation.
pub mod profile;
pub mod reporting;
/// Dispatch simulation core and objective function.
pub mod sim;

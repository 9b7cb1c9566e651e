//! Dispatch simulation core: decision replay, energy balance, SOC tracking.

pub mod simulator;
pub mod types;

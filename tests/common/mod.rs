//! Shared fixtures for integration tests.

use dispatch_sim::battery::BatteryModel;
use dispatch_sim::profile::Profiles;
use dispatch_sim::sim::types::DispatchConfig;

/// Dispatch configuration with the baseline battery and a 4-interval horizon
/// unless overridden by the caller.
pub fn default_config(horizon: usize) -> DispatchConfig {
    DispatchConfig {
        horizon,
        grid_price: 0.15,
        grid_max_kw: 6.0,
        initial_soc_frac: 0.2,
        battery: BatteryModel {
            capacity_kwh: 10.0,
            eta_charge: 0.9,
            eta_discharge: 0.85,
        },
    }
}

/// Flat profiles where renewables alone cover demand in every interval.
pub fn renewables_cover_demand(horizon: usize) -> Profiles {
    Profiles {
        demand: vec![2.0; horizon],
        solar: vec![3.0; horizon],
        wind: vec![1.0; horizon],
    }
}

/// Profiles with daytime-only solar and a day/night demand step.
pub fn day_night_profiles(horizon: usize, daytime_start: usize, daytime_end: usize) -> Profiles {
    let mut demand = vec![3.0; horizon];
    let mut solar = vec![0.0; horizon];
    for t in daytime_start..daytime_end {
        demand[t] = 5.0;
        solar[t] = 4.0;
    }
    Profiles {
        demand,
        solar,
        wind: vec![1.0; horizon],
    }
}

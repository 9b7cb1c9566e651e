//! Dispatch simulator: replays a decision vector over the horizon.
//!
//! The replay is an explicit fold over intervals carrying a single SOC
//! scalar. Nothing is shared between passes, so the optimizer may evaluate
//! candidate vectors back to back (or in parallel) against the same
//! read-only profiles.

use crate::profile::Profiles;

use super::types::{DispatchConfig, IntervalRecord, ShapeError, SimulationResult};

/// Finite stand-in objective for candidates that produce NaN or infinity.
///
/// The external minimizer compares objective values; handing it NaN would
/// poison those comparisons, so anomalous candidates score this instead.
pub const BAD_OBJECTIVE: f64 = 1e12;

/// Energy flows resolved for a single interval.
struct IntervalFlows {
    soc_next: f64,
    from_renewable: f64,
    from_battery: f64,
    from_grid: f64,
    unmet: f64,
}

/// Resolves one interval's energy balance in strict priority order:
/// renewables first, then battery, then grid.
///
/// Grid supply is capped by the requested grid decision entry, so an
/// under-provisioned candidate leaves demand unmet rather than drawing
/// unbounded power. Bound enforcement on the decision entries themselves
/// is the optimizer's job, not the simulator's.
fn balance_interval(
    prev_soc: f64,
    t: usize,
    grid: f64,
    charge: f64,
    discharge: f64,
    profiles: &Profiles,
    cfg: &DispatchConfig,
) -> IntervalFlows {
    let renewable = profiles.renewable_kw(t);
    let demand = profiles.demand[t];

    let usable_battery = cfg.battery.usable_energy(prev_soc, discharge);
    let soc_next = cfg.battery.next_soc(prev_soc, charge, discharge);

    let from_renewable = renewable.min(demand);
    let mut remaining = demand - from_renewable;

    let from_battery = remaining.min(usable_battery);
    remaining -= from_battery;

    let from_grid = remaining.min(grid);
    remaining -= from_grid;

    IntervalFlows {
        soc_next,
        from_renewable,
        from_battery,
        from_grid,
        unmet: remaining,
    }
}

fn check_shape(decision: &[f64], cfg: &DispatchConfig) -> Result<(), ShapeError> {
    if decision.len() != cfg.decision_len() {
        return Err(ShapeError {
            expected: cfg.decision_len(),
            actual: decision.len(),
        });
    }
    Ok(())
}

/// Replays the horizon for one decision vector and accumulates totals.
///
/// `decision` is the flat `[grid | charge | discharge]` sequence. Interval
/// 0 contributes nothing; intervals `1..T` are replayed in order since each
/// balance depends on the previous interval's SOC. Out-of-bound decision
/// entries are not rejected here; only the SOC is clipped.
///
/// # Errors
///
/// Returns a [`ShapeError`] if `decision.len() != 3 · horizon`.
pub fn evaluate(
    decision: &[f64],
    profiles: &Profiles,
    cfg: &DispatchConfig,
) -> Result<SimulationResult, ShapeError> {
    check_shape(decision, cfg)?;
    let horizon = cfg.horizon;
    let (grid, rest) = decision.split_at(horizon);
    let (charge, discharge) = rest.split_at(horizon);

    let mut soc = Vec::with_capacity(horizon);
    soc.push(cfg.battery.initial_soc(cfg.initial_soc_frac));

    let mut cost = 0.0;
    let mut savings = 0.0;

    for t in 1..horizon {
        let flows = balance_interval(
            soc[t - 1],
            t,
            grid[t],
            charge[t],
            discharge[t],
            profiles,
            cfg,
        );
        soc.push(flows.soc_next);
        cost += flows.from_grid * cfg.grid_price;
        savings += flows.from_renewable;
    }

    Ok(SimulationResult { cost, savings, soc })
}

/// Replays the horizon and returns one [`IntervalRecord`] per interval.
///
/// Same fold as [`evaluate`]; interval 0 carries the initial SOC with all
/// flows zero. Intended for reporting and CSV export, not for the solver's
/// inner loop.
///
/// # Errors
///
/// Returns a [`ShapeError`] if `decision.len() != 3 · horizon`.
pub fn trace(
    decision: &[f64],
    profiles: &Profiles,
    cfg: &DispatchConfig,
) -> Result<Vec<IntervalRecord>, ShapeError> {
    check_shape(decision, cfg)?;
    let horizon = cfg.horizon;
    let (grid, rest) = decision.split_at(horizon);
    let (charge, discharge) = rest.split_at(horizon);

    let mut rows = Vec::with_capacity(horizon);
    let mut prev_soc = cfg.battery.initial_soc(cfg.initial_soc_frac);
    rows.push(IntervalRecord {
        interval: 0,
        demand_kw: profiles.demand[0],
        solar_kw: profiles.solar[0],
        wind_kw: profiles.wind[0],
        grid_kw: grid[0],
        charge_kw: charge[0],
        discharge_kw: discharge[0],
        from_renewable_kw: 0.0,
        from_battery_kw: 0.0,
        from_grid_kw: 0.0,
        unmet_kw: 0.0,
        soc_kwh: prev_soc,
        cost: 0.0,
    });

    for t in 1..horizon {
        let flows = balance_interval(
            prev_soc,
            t,
            grid[t],
            charge[t],
            discharge[t],
            profiles,
            cfg,
        );
        rows.push(IntervalRecord {
            interval: t,
            demand_kw: profiles.demand[t],
            solar_kw: profiles.solar[t],
            wind_kw: profiles.wind[t],
            grid_kw: grid[t],
            charge_kw: charge[t],
            discharge_kw: discharge[t],
            from_renewable_kw: flows.from_renewable,
            from_battery_kw: flows.from_battery,
            from_grid_kw: flows.from_grid,
            unmet_kw: flows.unmet,
            soc_kwh: flows.soc_next,
            cost: flows.from_grid * cfg.grid_price,
        });
        prev_soc = flows.soc_next;
    }

    Ok(rows)
}

/// The scalar the optimizer minimizes: `cost − savings`.
///
/// Candidates containing non-finite entries, and evaluations whose totals
/// overflow to non-finite values, score [`BAD_OBJECTIVE`] so the solver's
/// comparisons stay well-defined.
///
/// # Errors
///
/// Returns a [`ShapeError`] if `decision.len() != 3 · horizon`.
pub fn objective(
    decision: &[f64],
    profiles: &Profiles,
    cfg: &DispatchConfig,
) -> Result<f64, ShapeError> {
    check_shape(decision, cfg)?;
    if decision.iter().any(|x| !x.is_finite()) {
        return Ok(BAD_OBJECTIVE);
    }
    let value = evaluate(decision, profiles, cfg)?.objective();
    if value.is_finite() {
        Ok(value)
    } else {
        Ok(BAD_OBJECTIVE)
    }
}

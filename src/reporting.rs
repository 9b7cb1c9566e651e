//! Post-hoc summary of an optimized dispatch run.

use std::fmt;

use crate::sim::types::IntervalRecord;

/// Aggregate figures derived from a complete dispatch trace.
///
/// Computed post-hoc from the per-interval records so the printed summary
/// always agrees with the exported rows.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// Total grid cost over the horizon (currency).
    pub total_cost: f64,
    /// Renewable energy used to serve demand (kWh).
    pub renewable_kwh: f64,
    /// Battery energy delivered to demand (kWh).
    pub battery_kwh: f64,
    /// Grid energy used (kWh).
    pub grid_kwh: f64,
    /// Demand left unserved (kWh). The objective does not penalize this;
    /// it is surfaced here so an under-supplying solution is visible.
    pub unmet_kwh: f64,
    /// Largest per-interval grid draw (kW).
    pub peak_grid_kw: f64,
    /// Battery energy moved in either direction, as requested (kWh).
    pub battery_throughput_kwh: f64,
    /// Objective value: `total_cost − renewable_kwh`.
    pub objective: f64,
    /// Whether the solver converged; an unconverged report is best-effort.
    pub converged: bool,
}

impl DispatchReport {
    /// Computes the report from the complete trace.
    pub fn from_trace(rows: &[IntervalRecord], converged: bool) -> Self {
        let mut total_cost = 0.0;
        let mut renewable_kwh = 0.0;
        let mut battery_kwh = 0.0;
        let mut grid_kwh = 0.0;
        let mut unmet_kwh = 0.0;
        let mut peak_grid_kw = 0.0_f64;
        let mut throughput = 0.0;

        for r in rows {
            total_cost += r.cost;
            renewable_kwh += r.from_renewable_kw;
            battery_kwh += r.from_battery_kw;
            grid_kwh += r.from_grid_kw;
            unmet_kwh += r.unmet_kw;
            peak_grid_kw = peak_grid_kw.max(r.from_grid_kw);
            throughput += r.charge_kw + r.discharge_kw;
        }

        Self {
            total_cost,
            renewable_kwh,
            battery_kwh,
            grid_kwh,
            unmet_kwh,
            peak_grid_kw,
            battery_throughput_kwh: throughput,
            objective: total_cost - renewable_kwh,
            converged,
        }
    }
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Dispatch Report ---")?;
        writeln!(f, "Total grid cost:       {:.4}", self.total_cost)?;
        writeln!(f, "Renewable energy used: {:.2} kWh", self.renewable_kwh)?;
        writeln!(f, "Battery energy used:   {:.2} kWh", self.battery_kwh)?;
        writeln!(f, "Grid energy used:      {:.2} kWh", self.grid_kwh)?;
        writeln!(f, "Unmet demand:          {:.2} kWh", self.unmet_kwh)?;
        writeln!(f, "Peak grid draw:        {:.2} kW", self.peak_grid_kw)?;
        writeln!(
            f,
            "Battery throughput:    {:.2} kWh",
            self.battery_throughput_kwh
        )?;
        writeln!(f, "Objective value:       {:.4}", self.objective)?;
        write!(
            f,
            "Solver converged:      {}",
            if self.converged { "yes" } else { "no (best effort)" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        interval: usize,
        from_renewable: f64,
        from_battery: f64,
        from_grid: f64,
        cost: f64,
    ) -> IntervalRecord {
        IntervalRecord {
            interval,
            demand_kw: from_renewable + from_battery + from_grid,
            solar_kw: 0.0,
            wind_kw: 0.0,
            grid_kw: from_grid,
            charge_kw: 0.0,
            discharge_kw: 0.0,
            from_renewable_kw: from_renewable,
            from_battery_kw: from_battery,
            from_grid_kw: from_grid,
            unmet_kw: 0.0,
            soc_kwh: 5.0,
            cost,
        }
    }

    #[test]
    fn totals_sum_over_intervals() {
        let rows = vec![
            row(0, 0.0, 0.0, 0.0, 0.0),
            row(1, 5.0, 0.0, 5.0, 0.75),
            row(2, 0.0, 4.0, 10.0, 1.50),
        ];
        let report = DispatchReport::from_trace(&rows, true);
        assert!((report.total_cost - 2.25).abs() < 1e-12);
        assert!((report.renewable_kwh - 5.0).abs() < 1e-12);
        assert!((report.battery_kwh - 4.0).abs() < 1e-12);
        assert!((report.grid_kwh - 15.0).abs() < 1e-12);
        assert_eq!(report.peak_grid_kw, 10.0);
        assert!((report.objective - (2.25 - 5.0)).abs() < 1e-12);
    }

    #[test]
    fn empty_trace_reports_zeros() {
        let report = DispatchReport::from_trace(&[], true);
        assert_eq!(report.total_cost, 0.0);
        assert_eq!(report.renewable_kwh, 0.0);
        assert_eq!(report.peak_grid_kw, 0.0);
    }

    #[test]
    fn unconverged_report_says_so() {
        let report = DispatchReport::from_trace(&[], false);
        let text = format!("{report}");
        assert!(text.contains("best effort"));
    }
}

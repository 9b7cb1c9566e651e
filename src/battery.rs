//! Stateless battery model: SOC recurrence and usable-energy gating.

/// Battery parameters shared by every SOC computation.
///
/// The model itself owns no state of charge. Callers carry the SOC scalar
/// through a simulation pass and feed it back into each step, which keeps
/// repeated objective evaluations independent of each other.
///
/// The efficiency accounting is asymmetric on purpose: charging losses are
/// applied inside the SOC recurrence, while discharging losses are applied
/// only to the energy delivered to the load. The recurrence always removes
/// the raw discharge amount from storage.
#[derive(Debug, Clone, Copy)]
pub struct BatteryModel {
    /// Total energy capacity (kWh).
    pub capacity_kwh: f64,
    /// Charge efficiency (0.0–1.0].
    pub eta_charge: f64,
    /// Discharge efficiency (0.0–1.0].
    pub eta_discharge: f64,
}

impl BatteryModel {
    /// Initial SOC for a fractional fill level.
    pub fn initial_soc(&self, frac: f64) -> f64 {
        frac * self.capacity_kwh
    }

    /// Advances the SOC by one interval and clips to `[0, capacity]`.
    ///
    /// `soc = prev_soc + charge · eta_charge − discharge`, clipped. The
    /// raw discharge amount leaves storage; delivered energy is a separate
    /// question answered by [`BatteryModel::usable_energy`].
    pub fn next_soc(&self, prev_soc: f64, charge: f64, discharge: f64) -> f64 {
        let soc = prev_soc + charge * self.eta_charge - discharge;
        soc.clamp(0.0, self.capacity_kwh)
    }

    /// Energy deliverable to the load for a requested discharge (kWh).
    ///
    /// An empty battery delivers nothing regardless of the request.
    pub fn usable_energy(&self, prev_soc: f64, discharge: f64) -> f64 {
        if prev_soc > 0.0 {
            discharge * self.eta_discharge
        } else {
            0.0
        }
    }
}

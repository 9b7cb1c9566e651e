//! CSV export for dispatch trace records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::IntervalRecord;

/// Schema v1 column header for CSV trace export.
const HEADER: &str = "interval,demand_kw,solar_kw,wind_kw,grid_kw,charge_kw,\
                      discharge_kw,from_renewable_kw,from_battery_kw,\
                      from_grid_kw,unmet_kw,soc_kwh,cost";

/// Exports a dispatch trace to a CSV file at the given path.
///
/// Writes a header row followed by one data row per interval. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(rows: &[IntervalRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rows, buf)
}

/// Writes a dispatch trace as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(rows: &[IntervalRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in rows {
        wtr.write_record(&[
            r.interval.to_string(),
            format!("{:.4}", r.demand_kw),
            format!("{:.4}", r.solar_kw),
            format!("{:.4}", r.wind_kw),
            format!("{:.4}", r.grid_kw),
            format!("{:.4}", r.charge_kw),
            format!("{:.4}", r.discharge_kw),
            format!("{:.4}", r.from_renewable_kw),
            format!("{:.4}", r.from_battery_kw),
            format!("{:.4}", r.from_grid_kw),
            format!("{:.4}", r.unmet_kw),
            format!("{:.4}", r.soc_kwh),
            format!("{:.6}", r.cost),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `deliveries.csv`
//! - `deductions.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{DeductionRow, DeliveryRow, OutputResult};

/// Writes run output to two CSV files.
pub struct CsvWriter {
    deliveries: Writer<File>,
    deductions: Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut deliveries = Writer::from_path(dir.join("deliveries.csv"))?;
        deliveries.write_record([
            "passenger_id",
            "injection_time",
            "delivery_time",
            "start_floor",
            "start_hallway",
            "end_floor",
            "end_hallway",
            "satisfaction",
            "deduction_count",
        ])?;

        let mut deductions = Writer::from_path(dir.join("deductions.csv"))?;
        deductions.write_record(["passenger_id", "time", "factor", "reason"])?;

        Ok(Self {
            deliveries,
            deductions,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_deliveries(&mut self, rows: &[DeliveryRow]) -> OutputResult<()> {
        for row in rows {
            self.deliveries.write_record(&[
                row.passenger_id.to_string(),
                format!("{:.3}", row.injection_time),
                format!("{:.3}", row.delivery_time),
                row.start_floor.to_string(),
                row.start_hallway.as_str().to_string(),
                row.end_floor.to_string(),
                row.end_hallway.as_str().to_string(),
                format!("{:.3}", row.satisfaction),
                row.deduction_count.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_deductions(&mut self, rows: &[DeductionRow]) -> OutputResult<()> {
        for row in rows {
            self.deductions.write_record(&[
                row.passenger_id.to_string(),
                format!("{:.3}", row.time),
                format!("{:.2}", row.factor),
                row.reason.clone(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.deliveries.flush()?;
        self.deductions.flush()?;
        Ok(())
    }
}

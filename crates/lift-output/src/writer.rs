//! The `OutputWriter` trait implemented by all backend writers.

use crate::{DeductionRow, DeliveryRow, OutputResult};

/// Trait implemented by the CSV and SQLite writers.
///
/// When driven by the observer, errors are stored rather than propagated;
/// retrieve them with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of delivery rows.
    fn write_deliveries(&mut self, rows: &[DeliveryRow]) -> OutputResult<()>;

    /// Write a batch of deduction rows.
    fn write_deductions(&mut self, rows: &[DeductionRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

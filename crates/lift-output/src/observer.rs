//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use tracing::warn;

use lift_core::{PassengerId, SimTime};
use lift_passenger::Passenger;
use lift_sim::{PassengerHandler, SimObserver};

use crate::row::{DeductionRow, DeliveryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes deliveries and deductions to any
/// [`OutputWriter`] backend.
///
/// Deductions are buffered and written in one batch per delivery and at the
/// end of the run.  Errors from the writer are stored internally because
/// `SimObserver` methods have no return value.  After `sim.run()` returns,
/// check for errors with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<DeductionRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending:    Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush_deductions(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let rows = std::mem::take(&mut self.pending);
        let result = self.writer.write_deductions(&rows);
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            warn!(error = %e, "output write failed");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_deduction(&mut self, now: SimTime, passenger: PassengerId, factor: f64, reason: &str) {
        self.pending.push(DeductionRow {
            passenger_id: passenger.0,
            time:         now.as_secs_f64(),
            factor,
            reason:       reason.to_string(),
        });
    }

    fn on_delivered(&mut self, now: SimTime, passenger: &Passenger) {
        self.flush_deductions();
        let result = self.writer.write_deliveries(&[DeliveryRow::new(passenger, now)]);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _now: SimTime, _handler: &PassengerHandler) {
        self.flush_deductions();
        let result = self.writer.finish();
        self.store_err(result);
    }
}

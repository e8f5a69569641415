//! End-of-run delivery and satisfaction statistics.

use std::fmt;

use lift_core::SimTime;
use lift_passenger::State;

use crate::{PassengerHandler, SimError, SimResult};

/// Aggregates over delivered passengers.  Only computed when every
/// passenger was delivered.
#[derive(Clone, Debug, PartialEq)]
pub struct DeliverySummary {
    /// Seconds.
    pub average_delivery_time: f64,
    /// Seconds.
    pub max_delivery_time:     f64,
    pub average_satisfaction:  f64,
    pub min_satisfaction:      f64,
}

impl DeliverySummary {
    /// Lower is better.
    pub fn delivery_performance(&self) -> f64 {
        4.0 * self.average_delivery_time + self.max_delivery_time
    }

    /// Higher is better.
    pub fn satisfaction_performance(&self) -> f64 {
        4.0 * self.average_satisfaction + self.min_satisfaction
    }
}

/// Snapshot of the handler's bookkeeping at the end of a run.
///
/// `Display` renders the summary; [`StatsReport::full_text`] adds the
/// per-passenger listing.
#[derive(Clone, Debug)]
pub struct StatsReport {
    pub delivered:    usize,
    /// Injected but not delivered.
    pub stranded:     usize,
    pub not_injected: usize,
    pub total:        usize,
    /// `None` unless every passenger was delivered.
    pub summary:      Option<DeliverySummary>,
    stranded_lines:   Vec<String>,
    /// Status line and satisfaction log of each delivered passenger.
    delivered_lines:  Vec<(String, String)>,
}

impl StatsReport {
    /// Collect statistics from `handler`.
    ///
    /// Fails if an injected passenger is still in `Init`, or is `Done`
    /// without having been recorded as delivered.
    pub fn from_handler(handler: &PassengerHandler) -> SimResult<Self> {
        let mut stranded_lines = Vec::new();
        for &id in handler.injected() {
            let p = handler.passenger(id).ok_or(SimError::UnknownPassenger(id))?;
            match p.state() {
                State::Init => {
                    return Err(SimError::Inconsistent(format!(
                        "{id} was injected but never started"
                    )));
                }
                State::Done => {
                    return Err(SimError::Inconsistent(format!(
                        "{id} finished but was never recorded as delivered"
                    )));
                }
                _ => stranded_lines.push(p.status_line()),
            }
        }

        let mut total_delivery = SimTime::ZERO;
        let mut max_delivery = SimTime::ZERO;
        let mut total_satisfaction = 0.0;
        let mut min_satisfaction = f64::MAX;
        let mut delivered_lines = Vec::with_capacity(handler.delivered().len());
        for &id in handler.delivered() {
            let p = handler.passenger(id).ok_or(SimError::UnknownPassenger(id))?;
            let t = p.delivery_time().unwrap_or(SimTime::ZERO);
            total_delivery = total_delivery + t;
            max_delivery = max_delivery.max(t);
            total_satisfaction += p.score();
            min_satisfaction = min_satisfaction.min(p.score());
            delivered_lines.push((p.status_line(), p.satisfaction().to_string()));
        }

        let delivered = handler.delivered().len();
        let stranded = stranded_lines.len();
        let total = handler.total();
        let not_injected = total.saturating_sub(delivered + stranded);

        let summary = (stranded == 0 && not_injected == 0 && delivered > 0).then(|| DeliverySummary {
            average_delivery_time: total_delivery.as_secs_f64() / delivered as f64,
            max_delivery_time:     max_delivery.as_secs_f64(),
            average_satisfaction:  total_satisfaction / delivered as f64,
            min_satisfaction,
        });

        Ok(Self {
            delivered,
            stranded,
            not_injected,
            total,
            summary,
            stranded_lines,
            delivered_lines,
        })
    }

    /// `i32::MAX` when not every passenger was delivered.
    pub fn delivery_performance(&self) -> f64 {
        self.summary
            .as_ref()
            .map_or(i32::MAX as f64, DeliverySummary::delivery_performance)
    }

    /// `0` when not every passenger was delivered.
    pub fn satisfaction_performance(&self) -> f64 {
        self.summary
            .as_ref()
            .map_or(0.0, DeliverySummary::satisfaction_performance)
    }

    /// Summary plus every stranded and delivered passenger.
    pub fn full_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.render(&mut out, true);
        out
    }

    fn render(&self, out: &mut impl fmt::Write, full: bool) -> fmt::Result {
        writeln!(out, "STATISTICS FOR ELEVATOR SIMULATION PASSENGER DELIVERY")?;
        writeln!(out, "-----------------------------------------------------")?;
        writeln!(out)?;

        if full {
            if self.stranded > 0 {
                writeln!(out, "The following passengers were stranded:")?;
                for line in &self.stranded_lines {
                    writeln!(out, "{line}")?;
                }
            }
            writeln!(out)?;
            writeln!(out, "These passengers were delivered:")?;
            for (status, satisfaction) in &self.delivered_lines {
                writeln!(out, "{status}")?;
                write!(out, "{satisfaction}")?;
            }
        }

        writeln!(out)?;
        writeln!(out, "Passenger Delivery Summary")?;
        writeln!(out, "Delivered: {}", self.delivered)?;
        writeln!(out, "Stranded: {}", self.stranded)?;
        writeln!(out, "Total: {}", self.total)?;
        writeln!(out)?;

        match &self.summary {
            Some(s) => {
                writeln!(out, "Deliver Stats (lower is better):")?;
                writeln!(out, "Average_delivery_time: {:.3}", s.average_delivery_time)?;
                writeln!(out, "Maximum_delivery_time:  {:.3}", s.max_delivery_time)?;
                writeln!(out, "Delivery_performance_score:  {:.3}", s.delivery_performance())?;
                writeln!(out)?;
                writeln!(out, "Satisfaction Stats (higher is better):")?;
                writeln!(out, "Average_satisfaction_score: {:.3}", s.average_satisfaction)?;
                writeln!(out, "Min_satisfaction_score:  {:.3}", s.min_satisfaction)?;
                writeln!(out, "Satisfaction_performance_score:  {:.3}", s.satisfaction_performance())?;
                writeln!(out)?;
            }
            None => {
                writeln!(out, "Deliver Stats (lower is better):")?;
                writeln!(out, "Average_delivery_time: n/a")?;
                writeln!(out, "Maximum_delivery_time:  n/a")?;
                writeln!(out, "Delivery_performance_score:  {}", i32::MAX)?;
                writeln!(out)?;
                writeln!(out, "Satisfaction Stats (higher is better):")?;
                writeln!(out, "Average_satisfaction_score: n/a")?;
                writeln!(out, "Min_satisfaction_score:  n/a")?;
                writeln!(out, "Satisfaction_performance_score:  {:.3}", 0.0)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}

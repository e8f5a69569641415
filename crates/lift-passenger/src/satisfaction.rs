//! Append-only satisfaction ledger.

use std::fmt;

use lift_core::SimTime;

pub const INITIAL_SCORE: f64 = 100.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deduction {
    pub time:   SimTime,
    /// Multiplier applied to the score, in `[0, 1]`.
    pub factor: f64,
    pub reason: String,
}

/// Score starting at 100, multiplied by each deduction factor.
#[derive(Clone, Debug)]
pub struct Satisfaction {
    score:      f64,
    deductions: Vec<Deduction>,
}

impl Default for Satisfaction {
    fn default() -> Self {
        Self { score: INITIAL_SCORE, deductions: Vec::new() }
    }
}

impl Satisfaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Multiply the score by `factor` (clamped to `[0, 1]`) and log it.
    pub fn deduct(&mut self, time: SimTime, factor: f64, reason: impl Into<String>) {
        debug_assert!((0.0..=1.0).contains(&factor), "deduction factor {factor} out of range");
        let factor = factor.clamp(0.0, 1.0);
        self.score *= factor;
        self.deductions.push(Deduction { time, factor, reason: reason.into() });
    }

    #[inline]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Every deduction, oldest first.
    #[inline]
    pub fn deductions(&self) -> &[Deduction] {
        &self.deductions
    }
}

impl fmt::Display for Satisfaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Satisfaction score: {}", self.score)?;
        for d in &self.deductions {
            writeln!(f, "    @{:.9}: {:.2} {}", d.time.as_secs_f64(), d.factor, d.reason)?;
        }
        Ok(())
    }
}

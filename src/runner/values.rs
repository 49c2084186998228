use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// One point of the sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TestValue {
    Int(i64),
    /// Already rounded to 3 decimals
    Float(f64),
}

impl fmt::Display for TestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestValue::Int(v) => write!(f, "{}", v),
            // Debug keeps the ".0" on whole floats, so 2.0 is typed as "2.0"
            TestValue::Float(v) => write!(f, "{:?}", v),
        }
    }
}

impl Serialize for TestValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TestValue::Int(v) => serializer.serialize_i64(*v),
            TestValue::Float(v) => serializer.serialize_f64(*v),
        }
    }
}

/// Start, end and step of a sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum SweepError {
    #[error("invalid sweep range {start} to {end} step {step}: {reason}")]
    InvalidRange {
        start: f64,
        end: f64,
        step: f64,
        reason: &'static str,
    },
}

impl SweepRange {
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self { start, end, step }
    }

    fn invalid(&self, reason: &'static str) -> SweepError {
        SweepError::InvalidRange {
            start: self.start,
            end: self.end,
            step: self.step,
            reason,
        }
    }

    fn validate(&self) -> Result<(), SweepError> {
        if !(self.start.is_finite() && self.end.is_finite() && self.step.is_finite()) {
            Err(self.invalid("values must be finite"))
        } else if self.step <= 0.0 {
            Err(self.invalid("step must be positive"))
        } else {
            Ok(())
        }
    }

    /// Truncate a bound to an integer, refusing values `i64` cannot hold
    fn whole_bound(&self, value: f64) -> Result<i64, SweepError> {
        let value = value.trunc();
        if value < i64::MIN as f64 || value >= i64::MAX as f64 {
            return Err(self.invalid("bounds outside the integer range"));
        }
        Ok(value as i64)
    }

    fn is_whole_step(&self) -> bool {
        self.step.fract() == 0.0
    }
}

/// Upper limit on the number of values in one sweep
pub const MAX_VALUES: usize = 1_000_000;

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Values of the range in sweep order, without the priming value
///
/// A whole step walks the integers from `trunc(start)` to `trunc(end)`
/// inclusive. A fractional step adds the step repeatedly while the running
/// value stays `<= end`, rounding each emitted value to 3 decimals.
pub fn domain_values(range: &SweepRange) -> Result<Vec<TestValue>, SweepError> {
    range.validate()?;

    if range.is_whole_step() {
        let start = range.whole_bound(range.start)?;
        let end = range.whole_bound(range.end)?;
        // saturates for steps past i64::MAX, which still yields only `start`
        let step = range.step as i64;
        if start > end {
            return Ok(Vec::new());
        }
        let count = end
            .checked_sub(start)
            .and_then(|span| (span / step).checked_add(1))
            .filter(|count| *count as u64 <= MAX_VALUES as u64)
            .ok_or_else(|| range.invalid("range too large"))?;
        return Ok((0..count).map(|k| TestValue::Int(start + k * step)).collect());
    }

    let mut values = Vec::new();
    let mut running = range.start;
    while running <= range.end {
        if values.len() == MAX_VALUES {
            return Err(range.invalid("range too large"));
        }
        values.push(TestValue::Float(round3(running)));
        let next = running + range.step;
        if next == running {
            // step is below the float resolution at this magnitude
            break;
        }
        running = next;
    }
    Ok(values)
}

/// Full sweep sequence: the domain values with the first one repeated in
/// front as the priming value. An empty domain stays empty.
pub fn generate_values(range: &SweepRange) -> Result<Vec<TestValue>, SweepError> {
    let mut values = domain_values(range)?;
    if let Some(first) = values.first().copied() {
        values.insert(0, first);
    }
    Ok(values)
}

//! Sampling validation
//!
//! Compares a baseline capture (no sampling) against a sampled capture and
//! checks, per event type, that `sampled / baseline` is close to the
//! configured sampling probability:
//!
//! ```text
//! actual = sampled / baseline
//! error  = |actual - expected| / expected
//! pass   = error <= tolerance
//! ```
//!
//! Types with a zero baseline are skipped (the ratio is undefined). When
//! nothing could be evaluated the verdict says so instead of passing.

use crate::event_counts::{Breakdown, EventCounts, Extraction};
use crate::event_type::EventType;
use crate::rates::{RateSpecError, SamplingRateSpec};
use serde::Serialize;
use thiserror::Error;

/// Configuration errors detected before any comparison runs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("tolerance must be a non-negative fraction, got {0}")]
    InvalidTolerance(f64),

    #[error(transparent)]
    InvalidRate(#[from] RateSpecError),
}

/// Outcome for one event type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplingResult {
    pub event_type: EventType,
    pub baseline_count: u64,
    pub sampled_count: u64,
    /// Configured probability (0-1)
    pub expected_rate: f64,
    /// `sampled_count / baseline_count`
    pub actual_rate: f64,
    /// Relative deviation in percent; `None` when the expected rate is zero
    /// but events were still captured
    pub error_percentage: Option<f64>,
    pub within_tolerance: bool,
}

/// Aggregate verdict over all evaluated types
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    /// Every evaluated type is within tolerance
    Pass,
    /// At least one type is outside tolerance
    Fail { failed: Vec<EventType> },
    /// Nothing could be compared
    NoEvaluableData { reason: String },
}

/// Full validation output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// One entry per evaluated type, canonical order
    pub results: Vec<SamplingResult>,
    /// Types skipped because their baseline count was zero
    pub skipped: Vec<EventType>,
    /// Tolerance used, as a fraction
    pub tolerance: f64,
    pub verdict: Verdict,
}

impl ValidationReport {
    /// True only for `Verdict::Pass`
    pub fn passed(&self) -> bool {
        matches!(self.verdict, Verdict::Pass)
    }

    /// Mean error over results with a defined error percentage
    pub fn average_error_percentage(&self) -> Option<f64> {
        let errors: Vec<f64> = self
            .results
            .iter()
            .filter_map(|r| r.error_percentage)
            .collect();
        if errors.is_empty() {
            return None;
        }
        Some(errors.iter().sum::<f64>() / errors.len() as f64)
    }

    /// Percentage of evaluated types within tolerance
    pub fn pass_rate(&self) -> Option<f64> {
        if self.results.is_empty() {
            return None;
        }
        let passed = self.results.iter().filter(|r| r.within_tolerance).count();
        Some(passed as f64 / self.results.len() as f64 * 100.0)
    }

    /// Types outside tolerance, canonical order
    pub fn failed_types(&self) -> Vec<EventType> {
        self.results
            .iter()
            .filter(|r| !r.within_tolerance)
            .map(|r| r.event_type)
            .collect()
    }
}

/// Validate sampled counts against a baseline
///
/// `tolerance` is a fraction (0.05 = 5%). Types missing from `rates` are
/// expected at rate 1.0, i.e. fully captured.
pub fn validate(
    baseline: &EventCounts,
    sampled: &EventCounts,
    rates: &SamplingRateSpec,
    tolerance: f64,
) -> Result<ValidationReport, ValidationError> {
    check_tolerance(tolerance)?;
    rates.check()?;

    let mut results = Vec::new();
    let mut skipped = Vec::new();

    for event_type in EventType::ALL {
        let b = baseline.get(event_type);
        let s = sampled.get(event_type);

        if b == 0 {
            tracing::debug!("skipping {}: zero baseline", event_type);
            skipped.push(event_type);
            continue;
        }

        let result = compare(event_type, b, s, rates.rate_for(event_type), tolerance);
        tracing::debug!(
            "{}: expected {:.4}, actual {:.4}, error {:?}",
            event_type,
            result.expected_rate,
            result.actual_rate,
            result.error_percentage
        );
        results.push(result);
    }

    let verdict = if results.is_empty() {
        Verdict::NoEvaluableData {
            reason: "every event type has a zero baseline count".to_string(),
        }
    } else {
        let failed: Vec<EventType> = results
            .iter()
            .filter(|r| !r.within_tolerance)
            .map(|r| r.event_type)
            .collect();
        if failed.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail { failed }
        }
    };

    Ok(ValidationReport {
        results,
        skipped,
        tolerance,
        verdict,
    })
}

/// Validate two extracted captures
///
/// A capture without `event_counts` (only a coarse total, or nothing at
/// all) cannot be split per type, so the report has no results and says
/// which capture lacked the breakdown.
pub fn validate_captures(
    baseline: &Extraction,
    sampled: &Extraction,
    rates: &SamplingRateSpec,
    tolerance: f64,
) -> Result<ValidationReport, ValidationError> {
    check_tolerance(tolerance)?;
    rates.check()?;

    let missing: Vec<String> = [("baseline", baseline), ("sampled", sampled)]
        .iter()
        .filter_map(|(label, capture)| match capture.breakdown {
            Breakdown::PerType => None,
            Breakdown::TotalOnly(total) => Some(format!("{label} (total events only: {total})")),
            Breakdown::Empty => Some(format!("{label} (no event counts at all)")),
        })
        .collect();

    if missing.is_empty() {
        return validate(&baseline.counts, &sampled.counts, rates, tolerance);
    }

    Ok(ValidationReport {
        results: Vec::new(),
        skipped: Vec::new(),
        tolerance,
        verdict: Verdict::NoEvaluableData {
            reason: format!(
                "per-type event counts unavailable for {}; cannot validate per-type sampling",
                missing.join(" and ")
            ),
        },
    })
}

fn compare(
    event_type: EventType,
    baseline: u64,
    sampled: u64,
    expected: f64,
    tolerance: f64,
) -> SamplingResult {
    let actual = sampled as f64 / baseline as f64;

    let error = if expected == 0.0 {
        (sampled == 0).then_some(0.0)
    } else {
        Some((actual - expected).abs() / expected)
    };

    // Compare in count space so exact boundaries (950/1000 at 5%) are not
    // lost to the division above
    let within_tolerance = if expected == 0.0 {
        sampled == 0
    } else {
        let deviation = (sampled as f64 - baseline as f64 * expected).abs();
        let allowed = tolerance * expected * baseline as f64;
        deviation <= allowed * (1.0 + 4.0 * f64::EPSILON)
    };

    SamplingResult {
        event_type,
        baseline_count: baseline,
        sampled_count: sampled,
        expected_rate: expected,
        actual_rate: actual,
        error_percentage: error.map(|e| e * 100.0),
        within_tolerance,
    }
}

fn check_tolerance(tolerance: f64) -> Result<(), ValidationError> {
    if tolerance.is_finite() && tolerance >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidTolerance(tolerance))
    }
}

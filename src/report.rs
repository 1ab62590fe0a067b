//! Text and JSON rendering of validation reports

use crate::event_type::EventType;
use crate::validator::{SamplingResult, ValidationReport, Verdict};
use serde::Serialize;
use std::fmt::Write;

/// JSON document format tag
pub const JSON_FORMAT: &str = "xgotop-sampling-v1";

const RULE_WIDTH: usize = 80;

/// Render the fixed-width table with its summary
pub fn render_text(report: &ValidationReport) -> String {
    let mut out = String::new();
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(out, "SAMPLING VALIDATION REPORT");
    let _ = writeln!(out, "{heavy}");
    let header = format!(
        "{:<15} {:<10} {:<10} {:<12} {:<12} {:<10} {:<10}",
        "Event Type", "Baseline", "Sampled", "Expected %", "Actual %", "Error %", "Status"
    );
    let _ = writeln!(out, "{}", header.trim_end());
    let _ = writeln!(out, "{light}");

    for result in &report.results {
        let _ = writeln!(out, "{}", render_row(result));
    }

    let _ = writeln!(out, "{light}");

    if !report.skipped.is_empty() {
        let names: Vec<&str> = report.skipped.iter().map(|t| t.name()).collect();
        let _ = writeln!(out, "Skipped (zero baseline): {}", names.join(", "));
    }

    let _ = writeln!(out, "Tolerance: {:.2}%", report.tolerance * 100.0);

    if let Some(avg) = report.average_error_percentage() {
        let _ = writeln!(out, "\nAverage Error: {avg:.2}%");
    }
    if let Some(rate) = report.pass_rate() {
        let _ = writeln!(out, "Pass Rate: {rate:.1}%");
    }

    let _ = writeln!(out);
    match &report.verdict {
        Verdict::Pass => {
            let _ = writeln!(out, "PASS: all sampling rates are within tolerance");
        }
        Verdict::Fail { failed } => {
            let _ = writeln!(
                out,
                "FAIL: sampling rates outside tolerance for {}",
                join_names(failed)
            );
            let _ = writeln!(
                out,
                "Note: small deviations are expected due to the probabilistic nature of sampling."
            );
        }
        Verdict::NoEvaluableData { reason } => {
            let _ = writeln!(out, "NO EVALUABLE DATA: {reason}");
        }
    }

    out
}

fn render_row(r: &SamplingResult) -> String {
    let error = match r.error_percentage {
        Some(e) => format!("{e:.2}"),
        None => "undef".to_string(),
    };
    let status = if r.within_tolerance { "PASS" } else { "FAIL" };
    format!(
        "{:<15} {:<10} {:<10} {:<12.1} {:<12.1} {:<10} {:<10}",
        r.event_type.name(),
        r.baseline_count,
        r.sampled_count,
        r.expected_rate * 100.0,
        r.actual_rate * 100.0,
        error,
        status
    )
    .trim_end()
    .to_string()
}

fn join_names(types: &[EventType]) -> String {
    types.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ")
}

/// Summary block of the JSON document
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    pub evaluated: usize,
    pub average_error_percentage: Option<f64>,
    pub pass_rate: Option<f64>,
    pub passed: bool,
}

/// JSON document wrapping a report
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport<'a> {
    pub format: &'static str,
    pub version: &'static str,
    #[serde(flatten)]
    pub report: &'a ValidationReport,
    pub summary: JsonSummary,
}

impl<'a> JsonReport<'a> {
    pub fn new(report: &'a ValidationReport) -> Self {
        Self {
            format: JSON_FORMAT,
            version: env!("CARGO_PKG_VERSION"),
            report,
            summary: JsonSummary {
                evaluated: report.results.len(),
                average_error_percentage: report.average_error_percentage(),
                pass_rate: report.pass_rate(),
                passed: report.passed(),
            },
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

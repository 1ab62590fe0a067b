//! Quick inspection of metrics files
//!
//! Shows whether a capture carries per-type event counts and summarizes the
//! periodic metric series xgotop records (`rps`, `pps`, `ewp`, `lat`).

use crate::event_counts::{extract, Breakdown, ExtractError, Extraction};
use serde_json::Value;
use std::fmt::Write;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Metric series summarized by `inspect`, in display order
pub const SERIES_KEYS: [&str; 4] = ["rps", "pps", "ewp", "lat"];

/// Max and sample count over the positive values of one series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub key: &'static str,
    pub max: f64,
    pub samples: usize,
}

/// Everything `inspect` reports for one file
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub path: PathBuf,
    pub extraction: Extraction,
    pub series: Vec<SeriesSummary>,
}

/// Read and summarize one metrics file
pub fn inspect_file<P: AsRef<Path>>(path: P) -> Result<MetricsSummary, ExtractError> {
    let path = path.as_ref();
    let document: Value = {
        let file = File::open(path)?;
        serde_json::from_reader(BufReader::new(file))?
    };
    inspect_document(path, &document)
}

/// Summarize an already parsed document
pub fn inspect_document(path: &Path, document: &Value) -> Result<MetricsSummary, ExtractError> {
    let extraction = extract(document)?;
    let series = SERIES_KEYS
        .iter()
        .filter_map(|&key| summarize_series(key, document.get(key)?))
        .collect();

    Ok(MetricsSummary {
        path: path.to_path_buf(),
        extraction,
        series,
    })
}

fn summarize_series(key: &'static str, value: &Value) -> Option<SeriesSummary> {
    let positive: Vec<f64> = value
        .as_array()?
        .iter()
        .filter_map(Value::as_f64)
        .filter(|v| *v > 0.0)
        .collect();

    let max = positive.iter().copied().reduce(f64::max)?;
    Some(SeriesSummary {
        key,
        max,
        samples: positive.len(),
    })
}

impl MetricsSummary {
    /// Human-readable block for this file
    pub fn render(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(60);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "File: {}", self.path.display());
        let _ = writeln!(out, "{rule}");

        match self.extraction.breakdown {
            Breakdown::PerType => {
                let _ = writeln!(out, "event_counts field found");
                let _ = writeln!(out, "\nEvent counts by type:");
                for (ty, count) in self.extraction.counts.iter() {
                    let _ = writeln!(out, "  {:<15}: {:>10}", ty.name(), group_thousands(count));
                }
                for (id, count) in &self.extraction.dropped {
                    let label = format!("unknown({id})");
                    let _ = writeln!(out, "  {:<15}: {:>10}", label, group_thousands(*count));
                }
                let total = self
                    .extraction
                    .counts
                    .total()
                    .saturating_add(self.extraction.dropped_total());
                let _ = writeln!(out, "  {:<15}: {:>10}", "TOTAL", group_thousands(total));
            }
            Breakdown::TotalOnly(total) => {
                let _ = writeln!(out, "event_counts field NOT found");
                let _ = writeln!(out, "  total_events: {}", group_thousands(total));
                let _ = writeln!(
                    out,
                    "  Rebuild xgotop and rerun the capture to record per-type event counts"
                );
            }
            Breakdown::Empty => {
                let _ = writeln!(out, "event_counts field NOT found");
                let _ = writeln!(
                    out,
                    "  Rebuild xgotop and rerun the capture to record per-type event counts"
                );
            }
        }

        if !self.series.is_empty() {
            let _ = writeln!(out, "\nOther metrics:");
            for s in &self.series {
                let _ = writeln!(out, "  {}: max={:.0}, samples={}", s.key, s.max, s.samples);
            }
        }

        out
    }
}

/// `1234567` -> `1,234,567`
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

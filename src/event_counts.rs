//! Event count extraction from xgotop metrics documents
//!
//! A metrics document is the JSON file xgotop writes on shutdown. Newer
//! builds include an `event_counts` object keyed by event type id; older
//! builds only carry a coarse `total_events` figure (or nothing at all).

use crate::event_type::EventType;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// Key holding the per-type counts
pub const EVENT_COUNTS_KEY: &str = "event_counts";

/// Key holding the coarse total used by older tracer builds
pub const TOTAL_EVENTS_KEY: &str = "total_events";

/// Errors raised while decoding a metrics document
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read metrics document: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("metrics document must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("`event_counts` must be an object, found {0}")]
    InvalidCollection(&'static str),

    #[error("invalid count for event id {id}: {value}")]
    InvalidCount { id: String, value: Value },

    #[error("invalid `total_events` value: {0}")]
    InvalidTotal(Value),
}

/// Per-type event counts for one capture
///
/// Every canonical type is always present (zero when the capture did not
/// report it). Values only change through the consuming builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EventCounts {
    counts: [u64; EventType::ALL.len()],
}

impl EventCounts {
    /// All-zero counts
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `event_type` set to `count`
    pub fn with(mut self, event_type: EventType, count: u64) -> Self {
        self.counts[event_type.index()] = count;
        self
    }

    /// Count for one type
    pub fn get(&self, event_type: EventType) -> u64 {
        self.counts[event_type.index()]
    }

    /// Sum over all canonical types
    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0u64, |acc, c| acc.saturating_add(*c))
    }

    /// `(type, count)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (EventType, u64)> + '_ {
        EventType::ALL.iter().map(move |t| (*t, self.get(*t)))
    }
}

impl FromIterator<(EventType, u64)> for EventCounts {
    fn from_iter<I: IntoIterator<Item = (EventType, u64)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |counts, (ty, n)| counts.with(ty, n))
    }
}

/// How a capture reported its events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakdown {
    /// `event_counts` was present
    PerType,
    /// Only `total_events` was present; per-type counts are all zero
    TotalOnly(u64),
    /// Neither field was present
    Empty,
}

/// Result of extracting one metrics document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub counts: EventCounts,
    pub breakdown: Breakdown,
    /// `(id, count)` entries from `event_counts` that are not canonical
    /// event types
    pub dropped: Vec<(String, u64)>,
}

impl Extraction {
    /// Whether per-type validation is possible for this capture
    pub fn has_breakdown(&self) -> bool {
        matches!(self.breakdown, Breakdown::PerType)
    }

    /// Sum of the counts recorded under unknown ids
    pub fn dropped_total(&self) -> u64 {
        self.dropped
            .iter()
            .fold(0u64, |acc, (_, c)| acc.saturating_add(*c))
    }

    /// Coarse total, when the capture only carried one
    pub fn unresolved_total(&self) -> Option<u64> {
        match self.breakdown {
            Breakdown::TotalOnly(total) => Some(total),
            _ => None,
        }
    }
}

/// Extract event counts from an already parsed document
pub fn extract(document: &Value) -> Result<Extraction, ExtractError> {
    let object = document
        .as_object()
        .ok_or(ExtractError::NotAnObject(json_kind(document)))?;

    match object.get(EVENT_COUNTS_KEY) {
        Some(Value::Null) | None => extract_total(object),
        Some(Value::Object(collection)) => extract_per_type(collection),
        Some(other) => Err(ExtractError::InvalidCollection(json_kind(other))),
    }
}

/// Parse and extract a document from a JSON string
pub fn extract_str(json: &str) -> Result<Extraction, ExtractError> {
    let document: Value = serde_json::from_str(json)?;
    extract(&document)
}

/// Parse and extract a document from any reader
pub fn extract_reader<R: Read>(reader: R) -> Result<Extraction, ExtractError> {
    let document: Value = serde_json::from_reader(reader)?;
    extract(&document)
}

/// Read, parse and extract a metrics file
///
/// The file is closed before returning, whether or not parsing succeeded.
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Extraction, ExtractError> {
    let path = path.as_ref();
    tracing::debug!("reading metrics file {}", path.display());
    let file = File::open(path)?;
    extract_reader(BufReader::new(file))
}

fn extract_per_type(collection: &Map<String, Value>) -> Result<Extraction, ExtractError> {
    let mut counts = EventCounts::new();
    let mut dropped = Vec::new();

    for (key, value) in collection {
        let count = parse_count(value).ok_or_else(|| ExtractError::InvalidCount {
            id: key.clone(),
            value: value.clone(),
        })?;

        match key.trim().parse::<u64>().ok().and_then(EventType::from_id) {
            Some(ty) => {
                counts = counts.with(ty, counts.get(ty).saturating_add(count));
            }
            None => {
                tracing::warn!("dropping unknown event type id {:?} (count {})", key, count);
                dropped.push((key.clone(), count));
            }
        }
    }

    Ok(Extraction {
        counts,
        breakdown: Breakdown::PerType,
        dropped,
    })
}

fn extract_total(object: &Map<String, Value>) -> Result<Extraction, ExtractError> {
    let breakdown = match object.get(TOTAL_EVENTS_KEY) {
        Some(Value::Null) | None => {
            tracing::warn!("no `{}` or `{}` in metrics document", EVENT_COUNTS_KEY, TOTAL_EVENTS_KEY);
            Breakdown::Empty
        }
        Some(value) => {
            let total = parse_count(value).ok_or_else(|| ExtractError::InvalidTotal(value.clone()))?;
            tracing::warn!(
                "no `{}` in metrics document, only total events ({}) available; per-type breakdown unavailable",
                EVENT_COUNTS_KEY,
                total
            );
            Breakdown::TotalOnly(total)
        }
    };

    Ok(Extraction {
        counts: EventCounts::new(),
        breakdown,
        dropped: Vec::new(),
    })
}

/// Non-negative integer, accepting integral floats such as `12.0`
fn parse_count(value: &Value) -> Option<u64> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(n) = number.as_u64() {
        return Some(n);
    }
    let f = number.as_f64()?;
    // 2^64 itself is not representable as u64
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < 18_446_744_073_709_551_616.0)
        .then_some(f as u64)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

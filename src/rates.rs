//! Sampling rate specifications
//!
//! Parses the `type:rate,type:rate` strings handed to xgotop's sampler,
//! e.g. `newgoroutine:0.1,makemap:0.2`.
//!
//! Types without an entry are expected to be fully captured (rate 1.0).
//! Names that are not canonical event types are kept, but they never match
//! anything during validation.

use crate::event_type::EventType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

/// Expected rate for a type with no rate entry
pub const DEFAULT_RATE: f64 = 1.0;

/// Errors raised while building a rate spec
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateSpecError {
    #[error("invalid sampling rate format: {0:?} (expected type:rate)")]
    InvalidPair(String),

    #[error("invalid rate for {event}: {value:?}")]
    InvalidRate { event: String, value: String },

    #[error("sampling rate for {event} must be between 0 and 1, got {rate}")]
    OutOfRange { event: String, rate: f64 },
}

/// Expected sampling probability per event type name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SamplingRateSpec {
    rates: BTreeMap<String, f64>,
}

impl SamplingRateSpec {
    /// Empty spec: every type expected at `DEFAULT_RATE`
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `type:rate,...` string
    ///
    /// Blank input and blank segments produce no entries. Later duplicates
    /// replace earlier ones.
    pub fn parse(spec: &str) -> Result<Self, RateSpecError> {
        let mut rates = Self::new();

        for pair in spec.split(',') {
            if pair.trim().is_empty() {
                continue;
            }

            let mut parts = pair.split(':');
            let (Some(event), Some(value), None) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(RateSpecError::InvalidPair(pair.to_string()));
            };

            let event = event.trim();
            let value = value.trim();
            if event.is_empty() {
                return Err(RateSpecError::InvalidPair(pair.to_string()));
            }

            let rate = value.parse::<f64>().map_err(|_| RateSpecError::InvalidRate {
                event: event.to_string(),
                value: value.to_string(),
            })?;

            rates.insert(event, rate)?;
        }

        Ok(rates)
    }

    /// Add or replace an entry, rejecting rates outside `[0, 1]`
    pub fn insert(&mut self, event: impl Into<String>, rate: f64) -> Result<(), RateSpecError> {
        let event = event.into();
        check_rate(&event, rate)?;
        if EventType::from_name(&event).is_none() {
            tracing::debug!("rate spec entry {} does not name a canonical event type", event);
        }
        self.rates.insert(event, rate);
        Ok(())
    }

    /// Rate stored under an arbitrary name
    pub fn get(&self, event: &str) -> Option<f64> {
        self.rates.get(event).copied()
    }

    /// Expected rate for a canonical type, defaulting to `DEFAULT_RATE`
    pub fn rate_for(&self, event: EventType) -> f64 {
        self.get(event.name()).unwrap_or(DEFAULT_RATE)
    }

    /// Whether `event` has an explicit rate
    pub fn contains(&self, event: EventType) -> bool {
        self.rates.contains_key(event.name())
    }

    /// Names that do not match any canonical event type
    pub fn unrecognized(&self) -> Vec<&str> {
        self.rates
            .keys()
            .map(String::as_str)
            .filter(|name| EventType::from_name(name).is_none())
            .collect()
    }

    /// Re-check every stored rate
    ///
    /// Specs deserialized from a config file bypass `insert`.
    pub fn check(&self) -> Result<(), RateSpecError> {
        self.rates
            .iter()
            .try_for_each(|(event, rate)| check_rate(event, *rate))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Overlay `other` on top of `self`; entries in `other` win
    pub fn merged(mut self, other: &SamplingRateSpec) -> Self {
        for (event, rate) in &other.rates {
            self.rates.insert(event.clone(), *rate);
        }
        self
    }
}

impl FromStr for SamplingRateSpec {
    type Err = RateSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn check_rate(event: &str, rate: f64) -> Result<(), RateSpecError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(RateSpecError::OutOfRange {
            event: event.to_string(),
            rate,
        })
    }
}

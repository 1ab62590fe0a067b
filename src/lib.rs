//! xgotop-validate - sampling-rate validation for xgotop captures
//!
//! xgotop can sample Go runtime events per event type. This library checks a
//! sampled capture against an unsampled baseline: for every event type the
//! observed `sampled / baseline` ratio should match the configured sampling
//! probability within a relative tolerance.
//!
//! ```
//! use xgotop_validate::{validate, EventCounts, EventType, SamplingRateSpec};
//!
//! let baseline = EventCounts::new().with(EventType::Newgoroutine, 1000);
//! let sampled = EventCounts::new().with(EventType::Newgoroutine, 95);
//! let rates = SamplingRateSpec::parse("newgoroutine:0.1").unwrap();
//!
//! let report = validate(&baseline, &sampled, &rates, 0.10).unwrap();
//! assert!(report.passed());
//! ```

pub mod cli;
pub mod config;
pub mod event_counts;
pub mod event_type;
pub mod inspect;
pub mod rates;
pub mod report;
pub mod validator;

pub use event_counts::{extract, extract_file, Breakdown, EventCounts, ExtractError, Extraction};
pub use event_type::EventType;
pub use rates::{RateSpecError, SamplingRateSpec};
pub use validator::{
    validate, validate_captures, SamplingResult, ValidationError, ValidationReport, Verdict,
};

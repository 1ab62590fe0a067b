//! Validation settings, optionally loaded from a TOML file
//!
//! # Example sampling.toml
//!
//! ```toml
//! # Accept up to 5% relative deviation
//! tolerance = 5.0
//!
//! [rates]
//! newgoroutine = 0.1
//! makemap = 0.2
//! ```

use crate::rates::SamplingRateSpec;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default tolerance, in percent
pub const DEFAULT_TOLERANCE_PERCENT: f64 = 10.0;

/// Settings for one validation run
///
/// # Example
/// ```
/// use xgotop_validate::config::ValidationConfig;
///
/// let config = ValidationConfig::default();
/// assert_eq!(config.tolerance, 10.0);
/// assert_eq!(config.tolerance_fraction(), 0.1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Maximum relative deviation between actual and expected rate, in percent
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Expected sampling rate per event type; missing types expect 1.0
    #[serde(default)]
    pub rates: SamplingRateSpec,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE_PERCENT
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE_PERCENT,
            rates: SamplingRateSpec::new(),
        }
    }
}

impl ValidationConfig {
    /// Load settings from a TOML file
    ///
    /// ```no_run
    /// use xgotop_validate::config::ValidationConfig;
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = ValidationConfig::from_file("sampling.toml")?;
    /// println!("tolerance: {}%", config.tolerance);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse and check settings from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.check()?;
        Ok(config)
    }

    /// Reject negative tolerances and rates outside `[0, 1]`
    pub fn check(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            bail!(
                "tolerance must be a non-negative percentage, got {}",
                self.tolerance
            );
        }
        self.rates.check()?;
        Ok(())
    }

    /// Tolerance as a fraction (10% -> 0.1)
    pub fn tolerance_fraction(&self) -> f64 {
        self.tolerance / 100.0
    }
}

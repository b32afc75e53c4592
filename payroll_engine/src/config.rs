//! Engine configuration.
//!
//! The deduction policy and pay slip tax are read from a JSON file
//! such as:
//!
//! ```json
//! { "policy": { "usePercentage": false, "absenceFlatAmount": 150000 }, "taxAmount": 400000 }
//! ```
//!
//! Every field is optional and falls back to the engine defaults.  The
//! library itself never reads configuration on its own; callers load
//! an [`EngineConfig`] and hand the resulting [`PayrollEngine`] around.

use crate::engine::{PayrollEngine, DEFAULT_TAX_AMOUNT};
use crate::error::PayrollError;
use crate::models::DeductionPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "PAYROLL_CONFIG";

/// Settings for a [`PayrollEngine`], loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Deduction policy for attendance.
    pub policy: DeductionPolicy,
    /// Tax shown on bulk pay slips, in rupiah.
    pub tax_amount: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: DeductionPolicy::default(),
            tax_amount: DEFAULT_TAX_AMOUNT,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a configuration document.
    pub fn from_json(data: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(data).context("failed to parse engine configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the configuration at `path`, or the defaults when `path`
    /// is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&data).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Checks the policy ranges and that `tax_amount` is not negative.
    pub fn validate(&self) -> std::result::Result<(), PayrollError> {
        self.policy.validate()?;
        if self.tax_amount < 0 {
            return Err(PayrollError::policy(format!(
                "taxAmount must not be negative, got {}",
                self.tax_amount
            )));
        }
        Ok(())
    }

    /// Builds an engine with these settings.
    pub fn engine(&self) -> PayrollEngine {
        PayrollEngine::new(self.policy.clone(), self.tax_amount)
    }
}

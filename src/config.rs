//! Merchant Configuration
//!
//! Per-deployment settings supplied by the host as a JSON metafield value.
//! Everything is optional: an absent or empty configuration means the stock
//! schedule evaluated against the raw cart total.

use serde::Deserialize;
use thiserror::Error;

use crate::{qualifying::TotalPolicy, tiers::PercentTier};

/// Errors raised while reading merchant configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The metafield value was not valid configuration JSON.
    #[error("invalid discount configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Deployment configuration for the calculator.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// How the qualifying amount is computed.
    pub total_policy: TotalPolicy,

    /// Override of the percent schedule; entries may arrive in any order.
    pub tiers: Option<Vec<PercentTier>>,
}

impl Config {
    /// Parse configuration from the JSON value of the deployment metafield.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the value is not valid JSON or
    /// does not match the configuration shape.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }
}

//! Summarization configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Summary environment configuration
#[derive(Debug, Clone, Default)]
pub struct SummaryEnvConfig {
    /// Resolve independent metrics concurrently
    pub fan_out: bool,
}

impl SummaryEnvConfig {
    pub fn from_env() -> Result<Self> {
        let fan_out = match env::var("SUMMARY_FAN_OUT") {
            Ok(value) => value
                .trim()
                .parse::<bool>()
                .with_context(|| format!("Invalid SUMMARY_FAN_OUT: {}", value))?,
            Err(_) => false,
        };

        Ok(Self { fan_out })
    }
}

//! Configuration module for pageload-summary.
//!
//! Structured configuration loaded from environment variables, organized by
//! concern: summarization and observability.

mod observability_config;
mod summary_config;

pub use observability_config::ObservabilityEnvConfig;
pub use summary_config::SummaryEnvConfig;

use crate::application::summary::SummaryOptions;
use anyhow::{Context, Result};

/// Main application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub summary: SummaryEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let summary = SummaryEnvConfig::from_env().context("Failed to load summary config")?;
        let observability = ObservabilityEnvConfig::from_env();

        Ok(Self {
            summary,
            observability,
        })
    }

    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            fan_out: self.summary.fan_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_sequential() {
        let config = Config::default();
        assert_eq!(config.summary_options(), SummaryOptions { fan_out: false });
        assert!(config.observability.metrics_enabled);
    }
}

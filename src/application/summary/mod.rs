//! Timing summary orchestration.
//!
//! A [`ProviderRegistry`] declares, per provider, whether it is mandatory, which
//! phase it runs in, what input it receives and which output fields it populates.
//! The [`Assembler`] walks the registry once, invoking each provider through the
//! request [`gate`], and merges the results into a [`TimingSummary`]. The
//! [`SummaryBuilder`] is the entry point tying this to raw inputs.
//!
//! [`TimingSummary`]: crate::domain::summary::TimingSummary

pub mod assembler;
pub mod provider_registry;
pub mod request_gate;
pub mod summary_builder;

pub use assembler::{Assembler, Assembly, ProviderOutcome};
pub use provider_registry::{
    MetricProviders, OutputMapping, Phase, ProviderPolicy, ProviderRegistry, ProviderSpec,
    STANDARD_POLICY,
};
pub use request_gate::gate;
pub use summary_builder::{SummaryBuilder, SummaryOptions};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Raw trace of a single page load, as recorded by the browser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "traceEvents", default)]
    pub trace_events: Vec<serde_json::Value>,
}

impl Trace {
    pub fn new(trace_events: Vec<serde_json::Value>) -> Self {
        Self { trace_events }
    }

    /// Content fingerprint used to key memoized computations over the bare trace
    pub fn fingerprint(&self) -> Result<InputFingerprint, serde_json::Error> {
        let mut hasher = Sha256::new();
        hasher.update(b"trace\n");
        hasher.update(serde_json::to_vec(self)?);
        Ok(InputFingerprint::from_hasher(hasher))
    }
}

/// Browser instrumentation (protocol) log captured alongside the trace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentationLog {
    pub entries: Vec<serde_json::Value>,
}

impl InstrumentationLog {
    pub fn new(entries: Vec<serde_json::Value>) -> Self {
        Self { entries }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GatherMode {
    #[default]
    Navigation,
    Timespan,
    Snapshot,
}

/// How the page was gathered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatherContext {
    #[serde(default)]
    pub gather_mode: GatherMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThrottlingMethod {
    #[default]
    Simulate,
    Devtools,
    Provided,
}

/// Run settings handed through to providers untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub throttling_method: ThrottlingMethod,
    /// Provider-specific settings this crate does not interpret
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Everything a summarization is computed from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInputs {
    pub trace: Trace,
    #[serde(default)]
    pub instrumentation_log: InstrumentationLog,
    #[serde(default)]
    pub gather_context: GatherContext,
    #[serde(default)]
    pub settings: Settings,
}

impl RawInputs {
    pub fn new(
        trace: Trace,
        instrumentation_log: InstrumentationLog,
        gather_context: GatherContext,
        settings: Settings,
    ) -> Self {
        Self {
            trace,
            instrumentation_log,
            gather_context,
            settings,
        }
    }
}

/// Shared input bundle handed to every provider that needs more than the trace.
///
/// Built once per summarization. Both fingerprints are computed up front so that
/// cache lookups never re-serialize the trace.
#[derive(Debug, Clone)]
pub struct MetricComputationData<'a> {
    pub trace: &'a Trace,
    pub instrumentation_log: &'a InstrumentationLog,
    pub gather_context: &'a GatherContext,
    pub settings: &'a Settings,
    trace_fingerprint: InputFingerprint,
    fingerprint: InputFingerprint,
}

impl<'a> MetricComputationData<'a> {
    pub fn new(inputs: &'a RawInputs) -> Result<Self, serde_json::Error> {
        let trace_fingerprint = inputs.trace.fingerprint()?;

        let mut hasher = Sha256::new();
        hasher.update(b"computation\n");
        hasher.update(trace_fingerprint.as_str().as_bytes());
        hasher.update(b"\n");
        hasher.update(serde_json::to_vec(&inputs.instrumentation_log)?);
        hasher.update(b"\n");
        hasher.update(serde_json::to_vec(&inputs.gather_context)?);
        hasher.update(b"\n");
        hasher.update(serde_json::to_vec(&inputs.settings)?);

        Ok(Self {
            trace: &inputs.trace,
            instrumentation_log: &inputs.instrumentation_log,
            gather_context: &inputs.gather_context,
            settings: &inputs.settings,
            trace_fingerprint,
            fingerprint: InputFingerprint::from_hasher(hasher),
        })
    }

    pub fn fingerprint(&self) -> &InputFingerprint {
        &self.fingerprint
    }

    pub fn trace_fingerprint(&self) -> &InputFingerprint {
        &self.trace_fingerprint
    }
}

/// Which part of the shared bundle a provider consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// The bare trace only
    Trace,
    /// The whole bundle
    Computation,
}

/// Input handed to a single provider call
#[derive(Debug, Clone, Copy)]
pub enum ProviderInput<'a> {
    /// The bare trace, for parses that need nothing else
    Trace {
        trace: &'a Trace,
        fingerprint: &'a InputFingerprint,
    },
    /// The full shared bundle
    Computation(&'a MetricComputationData<'a>),
}

impl<'a> ProviderInput<'a> {
    /// Select the slice of `data` a provider declared with `kind` receives
    pub fn from_bundle(kind: InputKind, data: &'a MetricComputationData<'a>) -> Self {
        match kind {
            InputKind::Trace => ProviderInput::Trace {
                trace: data.trace,
                fingerprint: &data.trace_fingerprint,
            },
            InputKind::Computation => ProviderInput::Computation(data),
        }
    }

    pub fn kind(&self) -> InputKind {
        match self {
            ProviderInput::Trace { .. } => InputKind::Trace,
            ProviderInput::Computation(_) => InputKind::Computation,
        }
    }

    pub fn trace(&self) -> &'a Trace {
        match *self {
            ProviderInput::Trace { trace, .. } => trace,
            ProviderInput::Computation(data) => data.trace,
        }
    }

    /// Fingerprint of exactly what the provider receives
    pub fn fingerprint(&self) -> &'a InputFingerprint {
        match *self {
            ProviderInput::Trace { fingerprint, .. } => fingerprint,
            ProviderInput::Computation(data) => &data.fingerprint,
        }
    }
}

/// Hex-encoded SHA-256 identity of a provider input
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputFingerprint(String);

impl InputFingerprint {
    fn from_hasher(hasher: Sha256) -> Self {
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InputFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_inputs() -> RawInputs {
        RawInputs::new(
            Trace::new(vec![json!({"name": "navigationStart", "ts": 1000})]),
            InstrumentationLog::new(vec![json!({"method": "Network.requestWillBeSent"})]),
            GatherContext::default(),
            Settings::default(),
        )
    }

    #[test]
    fn test_fingerprint_is_stable_for_equal_inputs() {
        let a = sample_inputs();
        let b = sample_inputs();

        let data_a = MetricComputationData::new(&a).unwrap();
        let data_b = MetricComputationData::new(&b).unwrap();

        assert_eq!(data_a.fingerprint(), data_b.fingerprint());
        assert_eq!(data_a.trace_fingerprint(), data_b.trace_fingerprint());
        assert_eq!(data_a.fingerprint().as_str().len(), 64);
    }

    #[test]
    fn test_settings_change_bundle_but_not_trace_fingerprint() {
        let a = sample_inputs();
        let mut b = sample_inputs();
        b.settings.throttling_method = ThrottlingMethod::Devtools;

        let data_a = MetricComputationData::new(&a).unwrap();
        let data_b = MetricComputationData::new(&b).unwrap();

        assert_ne!(data_a.fingerprint(), data_b.fingerprint());
        assert_eq!(data_a.trace_fingerprint(), data_b.trace_fingerprint());
    }

    #[test]
    fn test_provider_input_selects_bundle_slice() {
        let inputs = sample_inputs();
        let data = MetricComputationData::new(&inputs).unwrap();

        let trace_input = ProviderInput::from_bundle(InputKind::Trace, &data);
        assert_eq!(trace_input.kind(), InputKind::Trace);
        assert_eq!(trace_input.fingerprint(), data.trace_fingerprint());

        let bundle_input = ProviderInput::from_bundle(InputKind::Computation, &data);
        assert_eq!(bundle_input.kind(), InputKind::Computation);
        assert_eq!(bundle_input.fingerprint(), data.fingerprint());
        assert_eq!(bundle_input.trace(), &inputs.trace);
    }

    #[test]
    fn test_raw_inputs_deserialize_with_defaults() {
        let inputs: RawInputs = serde_json::from_value(json!({
            "trace": {"traceEvents": []},
            "settings": {"throttlingMethod": "provided", "formFactor": "mobile"}
        }))
        .unwrap();

        assert!(inputs.instrumentation_log.entries.is_empty());
        assert_eq!(inputs.gather_context.gather_mode, GatherMode::Navigation);
        assert_eq!(inputs.settings.throttling_method, ThrottlingMethod::Provided);
        assert_eq!(inputs.settings.extra.get("formFactor"), Some(&json!("mobile")));
    }
}

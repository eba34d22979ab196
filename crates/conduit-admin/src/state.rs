use conduit_config::RedactionPolicy;
use conduit_core::Managers;
use conduit_telemetry::Recorder;

/// Process-wide handler state, cloned into every request
#[derive(Clone)]
pub struct AdminState {
    pub managers: Managers,
    pub recorder: Recorder,
    pub redaction: RedactionPolicy,
    /// Largest body a decoder will read, in bytes
    pub body_limit: usize,
}

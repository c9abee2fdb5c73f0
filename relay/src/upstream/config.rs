use std::path::PathBuf;
use std::time::Duration;

use super::types::EndpointKind;

/// Upstream client configuration.
///
/// Built once at process start (see `Environment::upstream_config`) and
/// passed into the client; the client never reads ambient state.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the upstream API, without a trailing slash
    pub base_url: String,
    /// Path of the identity-verification endpoint, relative to `base_url`
    pub verification_path: String,
    /// Path of the trace endpoint, relative to `base_url`
    pub trace_path: String,
    /// PEM-encoded client certificate for mutual TLS
    pub client_cert_path: Option<PathBuf>,
    /// PEM-encoded private key for mutual TLS
    pub client_key_path: Option<PathBuf>,
    /// Skip verification of the upstream's server certificate chain.
    ///
    /// The upstream's TLS server is trusted by configuration, not by chain
    /// verification. Named explicitly so the weakening stays visible and
    /// overridable, not a silent default.
    pub accept_invalid_upstream_certs: bool,
    /// Fixed delay between poll attempts while the upstream reports pending
    pub poll_interval: Duration,
    /// Grace period between an accepted submission and the first poll,
    /// avoiding an immediate redundant poll against a job that just started
    pub submit_grace: Duration,
    /// Hard ceiling on poll attempts per inbound call
    pub max_poll_attempts: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://uat-api.thisisme.com".to_string(),
            verification_path: "dhadatapro".to_string(),
            trace_path: "v4/trace".to_string(),
            client_cert_path: None,
            client_key_path: None,
            accept_invalid_upstream_certs: true,
            poll_interval: Duration::from_secs(3),
            submit_grace: Duration::from_secs(2),
            max_poll_attempts: 10,
        }
    }
}

impl UpstreamConfig {
    /// URL receiving the initial POST for `kind`
    #[must_use]
    pub fn submit_url(&self, kind: EndpointKind) -> String {
        let path = match kind {
            EndpointKind::Verification => &self.verification_path,
            EndpointKind::Trace => &self.trace_path,
        };
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_matches('/')
        )
    }

    /// URL polled for the status of a deferred job
    #[must_use]
    pub fn poll_url(&self, kind: EndpointKind, request_id: &str) -> String {
        format!("{}/{request_id}", self.submit_url(kind))
    }
}

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

/// The two upstream endpoints the relay forwards to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// Identity verification against the national registry
    Verification,
    /// Person trace (addresses, employers, telephones)
    Trace,
}

impl EndpointKind {
    /// Per-request transport timeout for the initial submission
    #[must_use]
    pub const fn submit_timeout(self) -> Duration {
        match self {
            Self::Verification => Duration::from_secs(30),
            Self::Trace => Duration::from_secs(45),
        }
    }
}

/// Inbound verification request, forwarded to the upstream per call and
/// never persisted
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct VerificationRequest {
    /// National identity number to verify or trace
    #[validate(length(min = 1))]
    pub identity_number: String,
    /// Opaque caller reference, passed through to the upstream when non-empty
    #[serde(default)]
    pub reference: Option<String>,
}

impl VerificationRequest {
    /// Builds the upstream submission payload.
    ///
    /// `reference` is included only when non-empty; `disable_report` is the
    /// string `"true"`, as the upstream expects.
    #[must_use]
    pub fn submit_payload(&self) -> Value {
        let mut payload = json!({
            "identity_number": self.identity_number,
            "disable_report": "true",
        });
        if let Some(reference) = self.reference.as_deref().filter(|r| !r.is_empty()) {
            payload["reference"] = Value::String(reference.to_string());
        }
        payload
    }
}

/// Outcome of one submission or one poll attempt.
///
/// Always a structured value: transport and parse failures are represented
/// as synthetic results rather than errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResult {
    /// HTTP status reported by the upstream (or synthesised on failure)
    pub status: u16,
    /// Raw JSON response body
    pub body: Value,
}

impl UpstreamResult {
    /// Terminal success statuses used by the upstream
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200 | 227)
    }

    /// `303` means the job is still processing
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.status == 303
    }

    /// Correlation id issued by the upstream for a deferred job
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.body.get("request_id").and_then(Value::as_str)
    }

    /// Synthetic failure result carrying an error description
    #[must_use]
    pub fn internal_error(description: &str) -> Self {
        Self {
            status: 500,
            body: json!({ "error": description }),
        }
    }

    /// Synthetic result for an exhausted zero-attempt poll budget
    #[must_use]
    pub fn timed_out() -> Self {
        Self {
            status: 408,
            body: json!({ "error": "TIMEOUT" }),
        }
    }
}

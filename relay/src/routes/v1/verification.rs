use std::sync::Arc;

use axum::{Extension, Json};
use axum_valid::Valid;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;
use validator::Validate;

use crate::extract::{extract, ExtractedTrace};
use crate::upstream::{EndpointKind, UpstreamClient, UpstreamResult, VerificationRequest};

/// Result envelope returned for every verification operation.
///
/// `success` is always explicit; callers never have to infer an outcome
/// from the transport status.
#[derive(Debug, Serialize, JsonSchema)]
pub struct OperationOutcome {
    /// Whether the operation reached a terminal success status (200 or 227)
    pub success: bool,
    /// Status reported by the upstream (or synthesised on failure)
    pub status_code: u16,
    /// Correlation id for a still-deferred job, when the upstream issued one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Raw upstream response body
    pub data: Value,
    /// Flattened trace projection, attached on successful trace results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted: Option<ExtractedTrace>,
}

impl OperationOutcome {
    fn from_result(result: UpstreamResult) -> Self {
        Self {
            success: result.is_success(),
            status_code: result.status,
            request_id: result.request_id().map(ToOwned::to_owned),
            data: result.body,
            extracted: None,
        }
    }

    fn with_extraction(result: UpstreamResult) -> Self {
        let extracted = result.is_success().then(|| extract(&result.body));
        let mut outcome = Self::from_result(result);
        outcome.extracted = extracted;
        outcome
    }
}

/// Combined envelope for the verify-all operation
#[derive(Debug, Serialize, JsonSchema)]
pub struct CombinedOutcome {
    /// True if either sub-flow succeeded; partial data is still useful
    pub success: bool,
    /// Outcome of the identity-verification sub-flow
    pub verification: OperationOutcome,
    /// Outcome of the trace sub-flow
    pub trace: OperationOutcome,
}

/// Status check request for a previously deferred job
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct StatusRequest {
    /// Correlation id returned by an earlier submission
    #[validate(length(min = 1))]
    pub request_id: String,
    /// Endpoint the job was submitted to; defaults to identity verification
    #[serde(default)]
    pub endpoint: Option<EndpointKind>,
}

/// Runs an identity verification to completion
///
/// Submits the identity number to the upstream verification endpoint and,
/// when the upstream defers the job, polls its status until a terminal
/// outcome or the attempt budget is exhausted.
#[instrument(skip(upstream, payload))]
pub async fn verify(
    Extension(upstream): Extension<Arc<UpstreamClient>>,
    Valid(Json(payload)): Valid<Json<VerificationRequest>>,
) -> Json<OperationOutcome> {
    let result = upstream
        .verify_and_wait(EndpointKind::Verification, &payload)
        .await;
    Json(OperationOutcome::from_result(result))
}

/// Runs a person trace to completion
///
/// Same submit-and-poll sequence as `verify`, against the trace endpoint.
/// On terminal success the first address, first employer and first mobile
/// number are projected into `extracted`.
#[instrument(skip(upstream, payload))]
pub async fn trace(
    Extension(upstream): Extension<Arc<UpstreamClient>>,
    Valid(Json(payload)): Valid<Json<VerificationRequest>>,
) -> Json<OperationOutcome> {
    let result = upstream.verify_and_wait(EndpointKind::Trace, &payload).await;
    Json(OperationOutcome::with_extraction(result))
}

/// Runs the verification and trace sub-flows for the same identity
///
/// The sub-flows run independently; a failure in one never suppresses the
/// other. Overall `success` is true if either sub-flow succeeded.
#[instrument(skip(upstream, payload))]
pub async fn verify_all(
    Extension(upstream): Extension<Arc<UpstreamClient>>,
    Valid(Json(payload)): Valid<Json<VerificationRequest>>,
) -> Json<CombinedOutcome> {
    let (verification, trace) = futures::future::join(
        upstream.verify_and_wait(EndpointKind::Verification, &payload),
        upstream.verify_and_wait(EndpointKind::Trace, &payload),
    )
    .await;

    let verification = OperationOutcome::from_result(verification);
    let trace = OperationOutcome::with_extraction(trace);

    Json(CombinedOutcome {
        success: verification.success || trace.success,
        verification,
        trace,
    })
}

/// Checks the status of a previously deferred job once
///
/// A single poll attempt with no retries; a still-pending job is reported
/// with its 303 status.
#[instrument(skip(upstream, payload))]
pub async fn check_status(
    Extension(upstream): Extension<Arc<UpstreamClient>>,
    Valid(Json(payload)): Valid<Json<StatusRequest>>,
) -> Json<OperationOutcome> {
    let kind = payload.endpoint.unwrap_or(EndpointKind::Verification);
    let result = upstream.poll(kind, &payload.request_id, 1).await;
    Json(OperationOutcome::from_result(result))
}

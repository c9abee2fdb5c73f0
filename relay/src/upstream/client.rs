use std::time::Duration;

use reqwest::{Client, RequestBuilder};

use super::config::UpstreamConfig;
use super::error::UpstreamError;
use super::types::{EndpointKind, UpstreamResult, VerificationRequest};

/// Maximum number of idle connections to maintain per host
const MAX_IDLE_CONNECTIONS_PER_HOST: usize = 10;

/// Length at which a non-JSON upstream body is truncated in error results
const MALFORMED_BODY_PREVIEW_LEN: usize = 256;

/// Client for the upstream verification API.
///
/// Holds one pooled HTTP client configured with the mutual-TLS identity.
/// Every public method returns a structured [`UpstreamResult`]; failures are
/// synthesised into results at this boundary and never propagate as errors.
pub struct UpstreamClient {
    http: Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// Builds the client from an explicit configuration.
    ///
    /// When both certificate and key paths are configured, they are loaded
    /// as a combined PEM identity for mutual TLS.
    ///
    /// # Errors
    ///
    /// Returns an error if the client identity cannot be read or the
    /// transport cannot be constructed.
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut builder = Client::builder()
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS_PER_HOST)
            .user_agent(format!("identity-relay/{}", env!("CARGO_PKG_VERSION")))
            // The upstream uses 303 as an application-level "still
            // processing" status; it must never be followed as a redirect.
            .redirect(reqwest::redirect::Policy::none());

        if config.accept_invalid_upstream_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let (Some(cert_path), Some(key_path)) =
            (&config.client_cert_path, &config.client_key_path)
        {
            let mut pem = std::fs::read(cert_path)
                .map_err(|e| UpstreamError::Identity(format!("{}: {e}", cert_path.display())))?;
            pem.push(b'\n');
            pem.extend(
                std::fs::read(key_path).map_err(|e| {
                    UpstreamError::Identity(format!("{}: {e}", key_path.display()))
                })?,
            );
            let identity = reqwest::Identity::from_pem(&pem)
                .map_err(|e| UpstreamError::Identity(e.to_string()))?;
            builder = builder.identity(identity);
        }

        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    /// Submits a verification/trace request to the endpoint for `kind`.
    ///
    /// A transport failure or non-JSON response body yields a synthetic 500
    /// result carrying the error description.
    pub async fn submit(
        &self,
        kind: EndpointKind,
        request: &VerificationRequest,
    ) -> UpstreamResult {
        let url = self.config.submit_url(kind);
        tracing::debug!(%url, ?kind, "submitting upstream request");

        let attempt = self
            .execute(
                self.http
                    .post(&url)
                    .timeout(kind.submit_timeout())
                    .json(&request.submit_payload()),
            )
            .await;

        match attempt {
            Ok(result) => {
                tracing::debug!(status = result.status, ?kind, "upstream submission answered");
                result
            }
            Err(err) => {
                tracing::warn!(%url, ?kind, "upstream submission failed: {err}");
                UpstreamResult::internal_error(&err.to_string())
            }
        }
    }

    /// Polls the status of a deferred job up to `max_attempts` times.
    ///
    /// Per attempt: 200/227 is terminal success, 303 sleeps the configured
    /// interval and retries (returned as-is when the budget runs out on a
    /// still-pending job), any other status is terminal. Transport and parse
    /// failures are retried on the same interval and synthesised into a 500
    /// result once the budget is exhausted.
    pub async fn poll(
        &self,
        kind: EndpointKind,
        request_id: &str,
        max_attempts: u32,
    ) -> UpstreamResult {
        let url = self.config.poll_url(kind, request_id);

        for attempt in 1..=max_attempts {
            let last_attempt = attempt == max_attempts;
            tracing::debug!(%url, attempt, max_attempts, "polling upstream job status");

            match self
                .execute(self.http.get(&url).timeout(kind.submit_timeout()))
                .await
            {
                Ok(result) if result.is_pending() => {
                    if last_attempt {
                        // The ceiling was reached while still pending; the
                        // caller sees the 303, not a fabricated timeout.
                        return result;
                    }
                    wait(self.config.poll_interval).await;
                }
                Ok(result) => return result,
                Err(err) => {
                    if last_attempt {
                        tracing::warn!(%url, attempt, "upstream poll failed: {err}");
                        return UpstreamResult::internal_error(&err.to_string());
                    }
                    tracing::debug!(%url, attempt, "upstream poll failed, retrying: {err}");
                    wait(self.config.poll_interval).await;
                }
            }
        }

        // Only reachable with a zero-attempt budget
        UpstreamResult::timed_out()
    }

    /// Runs the full submit-and-wait sequence for `kind`.
    ///
    /// A `200` submission is already final. A `303` submission carrying a
    /// correlation id enters the poll loop after the configured grace
    /// period. Anything else short-circuits: a deferred job without a
    /// correlation id cannot be polled and is a hard failure.
    pub async fn verify_and_wait(
        &self,
        kind: EndpointKind,
        request: &VerificationRequest,
    ) -> UpstreamResult {
        let submitted = self.submit(kind, request).await;

        if submitted.status == 200 {
            return submitted;
        }
        if !submitted.is_pending() {
            return submitted;
        }

        let Some(request_id) = submitted.request_id().map(ToOwned::to_owned) else {
            tracing::warn!(?kind, "upstream deferred the request without a request_id");
            return UpstreamResult::internal_error(
                "upstream deferred the request without a request_id",
            );
        };

        // Grace period before the first poll; the job has only just started
        wait(self.config.submit_grace).await;
        self.poll(kind, &request_id, self.config.max_poll_attempts)
            .await
    }

    async fn execute(&self, request: RequestBuilder) -> Result<UpstreamResult, UpstreamError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let body = serde_json::from_str(&text).map_err(|_| {
            let preview: String = text.chars().take(MALFORMED_BODY_PREVIEW_LEN).collect();
            UpstreamError::MalformedBody(preview)
        })?;

        Ok(UpstreamResult { status, body })
    }
}

async fn wait(interval: Duration) {
    if !interval.is_zero() {
        tokio::time::sleep(interval).await;
    }
}

use thiserror::Error;

/// Errors raised inside the upstream client.
///
/// None of these cross the client boundary as errors: the public submit/poll
/// surface converts them into synthetic failure results so callers always
/// receive a structured outcome.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, TLS or timeout failure while talking to the upstream
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream responded with a body that is not valid JSON
    #[error("upstream returned a non-JSON body: {0}")]
    MalformedBody(String),

    /// The mutual-TLS client identity could not be loaded
    #[error("failed to load client identity: {0}")]
    Identity(String),
}

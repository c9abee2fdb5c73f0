use std::sync::Arc;
use std::time::Duration;

use aide::openapi::OpenApi;
use axum::Extension;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::middleware::ApiKey;
use crate::routes;
use crate::types::Environment;
use crate::upstream::UpstreamClient;

/// Per-request ceiling for the whole inbound call. Must outlast the longest
/// submit + poll sequence (45s submit, then 10 polls at 3s intervals).
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(
    environment: Environment,
    api_key: ApiKey,
    upstream: Arc<UpstreamClient>,
) -> anyhow::Result<()> {
    let mut openapi = OpenApi::default();

    let router = routes::handler()
        .finish_api(&mut openapi)
        .layer(Extension(openapi))
        .layer(Extension(environment))
        .layer(Extension(api_key))
        .layer(Extension(upstream))
        .layer(TraceLayer::new_for_http())
        .layer(tower_http::timeout::TimeoutLayer::new(REQUEST_TIMEOUT));

    let addr = std::net::SocketAddr::from((
        [0, 0, 0, 0],
        std::env::var("PORT").map_or(Ok(8080), |p| p.parse())?,
    ));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 Identity verification relay started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install shutdown signal handler: {err}");
    }
}

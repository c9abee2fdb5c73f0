use std::sync::Arc;

use relay::{middleware::ApiKey, server, types::Environment, upstream::UpstreamClient};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    // JSON logs for staging/production, regular format for development
    match environment {
        Environment::Production | Environment::Staging => {
            fmt()
                .json()
                .with_env_filter(EnvFilter::from_default_env())
                .init();
        }
        Environment::Development => {
            fmt().with_env_filter(EnvFilter::from_default_env()).init();
        }
    }

    let api_key = ApiKey::new(environment.api_key());
    let upstream = Arc::new(UpstreamClient::new(environment.upstream_config())?);

    server::start(environment, api_key, upstream).await
}

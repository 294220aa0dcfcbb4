mod error;
mod handlers;
mod middleware;
mod services;
mod setup;
mod state;
mod views;

use pixwall_core::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    let (state, router) = setup::initialize_app(config).await?;

    setup::server::start_server(&state.config, router).await?;

    Ok(())
}

mod config;
mod page;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use dataset::fetch_dataset;
use presenter::{DataContext, Presenter};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::DashboardConfig;
use crate::routes::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = DashboardConfig::from_env().context("invalid configuration")?;

    let mut http = reqwest::Client::builder();
    if let Some(timeout) = config.fetch_timeout {
        http = http.timeout(timeout);
    }
    let http = http.build().context("failed to build http client")?;

    // The dashboard is useless without data, so a failed load ends the process.
    let table = match fetch_dataset(&http, &config.source).await {
        Ok(table) => table,
        Err(err) => {
            error!("failed to load dataset from {}: {err}", config.source.url);
            return Err(err).context("dataset load failed");
        }
    };
    let context = DataContext::new(table).context("dataset unusable")?;
    let bounds = context.bounds();
    info!(
        start = %bounds.start,
        end = %bounds.end,
        picker = ?config.presenter.picker,
        "presenter ready"
    );

    let presenter = Arc::new(Presenter::new(Arc::new(context), config.presenter));
    let state = AppState::new(presenter, &config.source);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    info!("dashboard listening on http://{}", config.addr);
    axum::serve(listener, router(state))
        .await
        .context("server error")?;
    Ok(())
}

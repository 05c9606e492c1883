use std::sync::Arc;
use std::time::Duration;

use axum::routing::any;
use axum::Router;
use reqwest::Client;

use crate::app::handlers;
use crate::config::{Config, HandlerMode};
use crate::core::feed::FeedSource;
use crate::core::store::{LogStore, MovieStore};
use crate::utils::Error;

/// Shared, read-only request context.
#[derive(Clone)]
pub struct AppState {
    pub client: Client,
    pub hdchina: FeedSource,
    pub putao: FeedSource,
    pub store: Arc<dyn MovieStore>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.feeds.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            hdchina: config.feeds.hdchina_source(),
            putao: config.feeds.putao_source(),
            store: Arc::new(LogStore),
        })
    }
}

/// A single route on `/`, any method, served by the handler for `mode`.
pub fn build_router(state: AppState, mode: HandlerMode) -> Router {
    let handler = match mode {
        HandlerMode::Aggregate => any(handlers::aggregate),
        HandlerMode::Sync => any(handlers::sync),
    };

    Router::new().route("/", handler).with_state(state)
}

pub async fn run_server(config: &Config) -> Result<(), Error> {
    let addr = config.server.socket_addr()?;
    let state = AppState::from_config(config)?;
    let app = build_router(state, config.server.mode);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {} ({:?} mode)", addr, config.server.mode);
    axum::serve(listener, app).await?;

    Ok(())
}

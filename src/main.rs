// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity Finder web server
//!
//! Serves the activity search page and proxies searches to the activities
//! backend.

use activity_finder::{
    config::Config,
    services::{ActivitiesClient, SearchService, SessionStore},
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How often idle sessions are swept.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        backend = %config.activities_api_url,
        "Starting Activity Finder"
    );

    let client = ActivitiesClient::new(config.activities_api_url.clone(), config.fetch_timeout())?;

    // Sessions are shared by all requests and swept in the background
    let sessions = Arc::new(SessionStore::new(config.session_idle_ttl()));
    spawn_session_sweeper(sessions.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        search: SearchService::new(client, sessions),
    });

    // Build router
    let app = activity_finder::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodically drop sessions nobody has touched within the idle TTL.
fn spawn_session_sweeper(sessions: Arc<SessionStore>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = sessions.purge_idle();
            if purged > 0 {
                tracing::info!(purged, remaining = sessions.len(), "Purged idle sessions");
            }
        }
    });
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("activity_finder=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}

mod api;
mod middleware;

use std::sync::Arc;

use revhub_places::{PlacesClient, RetryPolicy};
use revhub_reply::ReplyDispatcher;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = revhub_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let places = build_places_client(&config)?;
    let replies = ReplyDispatcher::from_config(&config)?;

    let app = build_app(AppState {
        places: places.map(Arc::new),
        replies: Arc::new(replies),
    });

    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting revhub-server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// `None` when no provider key is configured; review routes then answer
/// with an error instead of the whole server refusing to start.
fn build_places_client(config: &revhub_core::AppConfig) -> anyhow::Result<Option<PlacesClient>> {
    let Some(api_key) = config.places_api_key.as_deref() else {
        tracing::info!("GOOGLE_PLACES_API_KEY not set, review routes disabled");
        return Ok(None);
    };

    let client = PlacesClient::with_base_url(
        api_key,
        config.http_timeout_secs,
        &config.user_agent,
        &config.places_base_url,
    )?
    .with_retry_policy(RetryPolicy::new(
        config.places_max_retries,
        config.places_retry_backoff_base_ms,
    ));
    Ok(Some(client))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}

mod reply;
mod resolve;
mod reviews;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "revhub-cli")]
#[command(about = "Review aggregation command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve place identifiers from raw ids, shared links or free text
    Resolve {
        /// One or more inputs; each is resolved independently
        #[arg(required = true)]
        inputs: Vec<String>,
        /// Text searched when a link carries no identifier
        #[arg(long)]
        business_name: Option<String>,
    },
    /// Fetch, filter and sort reviews for a place
    Reviews(reviews::ReviewsArgs),
    /// Submit a reply to a review
    Reply(reply::ReplyArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = revhub_core::load_app_config_from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve {
            inputs,
            business_name,
        } => resolve::run_resolve(&config, &inputs, business_name.as_deref()).await?,
        Commands::Reviews(args) => reviews::run_reviews(&config, &args).await?,
        Commands::Reply(args) => reply::run_reply(&config, args).await?,
    }

    Ok(())
}

/// Builds the provider client from configuration.
///
/// # Errors
///
/// Returns an error if the API key is missing or the client cannot be built.
pub(crate) fn places_client(
    config: &revhub_core::AppConfig,
) -> anyhow::Result<revhub_places::PlacesClient> {
    let client = revhub_places::PlacesClient::with_base_url(
        config.require_places_api_key()?,
        config.http_timeout_secs,
        &config.user_agent,
        &config.places_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build places client: {e}"))?
    .with_retry_policy(revhub_places::RetryPolicy::new(
        config.places_max_retries,
        config.places_retry_backoff_base_ms,
    ));
    Ok(client)
}

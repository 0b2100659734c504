//! `reply` command handler.

use clap::Args;
use revhub_core::Platform;
use revhub_reply::{ReplyDispatcher, ReplyRequest};

#[derive(Debug, Args)]
pub(crate) struct ReplyArgs {
    #[arg(long)]
    pub review_id: String,
    /// google or facebook
    #[arg(long)]
    pub platform: Platform,
    #[arg(long)]
    pub message: String,
    /// Business (location or page) id used for the manual-reply link
    #[arg(long)]
    pub business_id: Option<String>,
}

impl From<ReplyArgs> for ReplyRequest {
    fn from(args: ReplyArgs) -> Self {
        ReplyRequest {
            review_id: args.review_id,
            platform: args.platform,
            message: args.message,
            business_id: args.business_id,
        }
    }
}

/// Submits the reply and prints the outcome as JSON.
///
/// An unsuccessful outcome is still printed; the command only fails when it
/// was not delivered and no manual link exists.
///
/// # Errors
///
/// Returns an error if the dispatcher cannot be built or the platform is not
/// supported.
pub(crate) async fn run_reply(
    config: &revhub_core::AppConfig,
    args: ReplyArgs,
) -> anyhow::Result<()> {
    let dispatcher = ReplyDispatcher::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build reply dispatcher: {e}"))?;

    let request = ReplyRequest::from(args);
    let outcome = dispatcher.submit_reply(&request).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if !outcome.success && !outcome.is_fallback() {
        anyhow::bail!(
            "{}",
            outcome.error.as_deref().unwrap_or("reply was not delivered")
        );
    }
    Ok(())
}

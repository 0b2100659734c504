//! `reviews` command handler.

use chrono::NaiveDate;
use clap::Args;
use revhub_places::filter::{parse_platform_filter, parse_rating_filter};
use revhub_places::{FetchMode, ResponseFilter, ReviewFilters, ReviewQuery, SortOrder};

#[derive(Debug, Args)]
pub(crate) struct ReviewsArgs {
    /// Place identifier (see `resolve`)
    pub place_id: String,
    /// Only fetch the business summary
    #[arg(long)]
    pub preview: bool,
    /// Platform filter; `all` disables it
    #[arg(long)]
    pub platform: Option<String>,
    /// Exact star rating (1-5)
    #[arg(long, value_parser = parse_rating_filter)]
    pub rating: Option<u8>,
    /// Earliest review date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Latest review date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Reply presence: any, has_reply, no_reply
    #[arg(long, default_value = "any")]
    pub response: ResponseFilter,
    /// Sort order: date_desc, date_asc, rating_desc, rating_asc
    #[arg(long, default_value = "date_desc")]
    pub sort: SortOrder,
}

impl ReviewsArgs {
    pub(crate) fn mode(&self) -> FetchMode {
        if self.preview {
            FetchMode::Preview
        } else {
            FetchMode::Full
        }
    }

    pub(crate) fn query(&self) -> ReviewQuery {
        ReviewQuery {
            filters: ReviewFilters {
                platform: self.platform.as_deref().and_then(parse_platform_filter),
                rating: self.rating,
                date_from: self.from,
                date_to: self.to,
                response: self.response,
            },
            sort: self.sort,
        }
    }
}

/// Fetches reviews and prints the page as pretty JSON.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the provider call fails.
/// Stale identifiers get a hint to re-resolve.
pub(crate) async fn run_reviews(
    config: &revhub_core::AppConfig,
    args: &ReviewsArgs,
) -> anyhow::Result<()> {
    let client = crate::places_client(config)?;

    let page = match client
        .fetch_reviews(&args.place_id, args.mode(), &args.query())
        .await
    {
        Ok(page) => page,
        Err(e) => {
            if e.is_stale_identifier() {
                eprintln!(
                    "hint: '{}' may be outdated; run `revhub-cli resolve` again",
                    args.place_id
                );
            }
            return Err(anyhow::anyhow!("{}: {e}", e.user_message()));
        }
    };

    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

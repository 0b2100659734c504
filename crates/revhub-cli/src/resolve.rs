//! `resolve` command handler.

use futures::stream::{self, StreamExt};
use revhub_places::{resolve, PlacesClient, Resolution, ResolutionSource};

/// Inputs resolved at once; keeps text searches from piling up.
const RESOLVE_CONCURRENCY: usize = 4;

/// Resolves each input and prints one JSON object per input, in order.
///
/// Inputs that validate locally never touch the network. The provider client
/// is only built when at least one input needs a search.
///
/// # Errors
///
/// Returns an error if a search is needed but the client cannot be built.
pub(crate) async fn run_resolve(
    config: &revhub_core::AppConfig,
    inputs: &[String],
    business_name: Option<&str>,
) -> anyhow::Result<()> {
    let locals: Vec<_> = inputs.iter().map(|input| resolve(input)).collect();
    if locals.iter().all(|local| local.valid) {
        for (input, local) in inputs.iter().zip(locals) {
            let resolution = Resolution {
                identifier: local.cleaned,
                source: ResolutionSource::Direct,
            };
            print_result(input, Some(&resolution))?;
        }
        return Ok(());
    }

    let client = crate::places_client(config)?;
    let results: Vec<Option<Resolution>> = stream::iter(inputs)
        .map(|input| resolve_one(&client, input, business_name))
        .buffered(RESOLVE_CONCURRENCY)
        .collect()
        .await;

    for (input, resolution) in inputs.iter().zip(&results) {
        print_result(input, resolution.as_ref())?;
    }

    let unresolved = results.iter().filter(|r| r.is_none()).count();
    if unresolved > 0 {
        tracing::info!(unresolved, total = inputs.len(), "some inputs could not be resolved");
    }
    Ok(())
}

async fn resolve_one(
    client: &PlacesClient,
    input: &str,
    business_name: Option<&str>,
) -> Option<Resolution> {
    client.resolve_input(input, business_name).await
}

fn print_result(input: &str, resolution: Option<&Resolution>) -> anyhow::Result<()> {
    let line = serde_json::json!({
        "input": input,
        "resolution": resolution,
    });
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}

//! Composite identifier resolution.
//!
//! Combines local cleaning, shared-link extraction and the provider's text
//! search into the single call callers make before caching the identifier.

use serde::Serialize;

use crate::client::PlacesClient;
use crate::identifier::resolve;
use crate::links::{extract_from_shared_link, is_short_link};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// The input already was a usable identifier.
    Direct,
    /// Pulled out of a shared map link.
    SharedLink,
    /// Returned by the provider's text search.
    TextSearch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub identifier: String,
    pub source: ResolutionSource,
}

/// Scheme-prefixed input, or a pasted map link whose scheme was dropped.
fn looks_like_url(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.contains("google.")
        || lower.contains("goo.gl/")
}

impl PlacesClient {
    /// Resolves free-form business input into an identifier.
    ///
    /// `fallback_query` (typically the business name) is searched when the
    /// input is a link that cannot be parsed locally. Plain text that does
    /// not validate is searched as-is. `None` means nothing could be derived.
    pub async fn resolve_input(
        &self,
        input: &str,
        fallback_query: Option<&str>,
    ) -> Option<Resolution> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if looks_like_url(input) {
            if !is_short_link(input) {
                if let Some(identifier) = extract_from_shared_link(input) {
                    return Some(Resolution {
                        identifier,
                        source: ResolutionSource::SharedLink,
                    });
                }
            }

            let Some(query) = fallback_query.map(str::trim).filter(|q| !q.is_empty()) else {
                tracing::info!(
                    short_link = is_short_link(input),
                    "link carries no identifier and no search text was given"
                );
                return None;
            };
            return self.search(query).await;
        }

        let local = resolve(input);
        if local.valid {
            return Some(Resolution {
                identifier: local.cleaned,
                source: ResolutionSource::Direct,
            });
        }

        tracing::debug!(reason = %local.message, "input is not an identifier, searching by text");
        self.search(input).await
    }

    async fn search(&self, query: &str) -> Option<Resolution> {
        self.find_place_from_text(query)
            .await
            .map(|identifier| Resolution {
                identifier,
                source: ResolutionSource::TextSearch,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_urls() {
        assert!(looks_like_url("https://maps.app.goo.gl/x"));
        assert!(looks_like_url("HTTP://example.com"));
        assert!(!looks_like_url("ChIJLU7jZClu5kcR4PcOOO6p3I0"));
        assert!(!looks_like_url("Boulangerie Paul, Lyon"));
    }

    #[test]
    fn detects_links_pasted_without_scheme() {
        assert!(looks_like_url("maps.app.goo.gl/AbCdEf"));
        assert!(looks_like_url(
            "www.google.com/maps/place/X/data=!1s0x47e66e2964e34e2d:0x8ddca9ee380ef7e0"
        ));
    }

    #[tokio::test]
    async fn schemeless_link_is_extracted_locally() {
        let client = PlacesClient::with_base_url("k", 1, "ua", "http://127.0.0.1:9").unwrap();
        let resolution = client
            .resolve_input(
                "www.google.com/maps/place/Tour/data=!4m6!3m5!1s0x47e66e2964e34e2d:0x8ddca9ee380ef7e0!8m2",
                None,
            )
            .await
            .expect("should resolve from link");
        assert_eq!(resolution.identifier, "0x47e66e2964e34e2d:0x8ddca9ee380ef7e0");
        assert_eq!(resolution.source, ResolutionSource::SharedLink);
    }

    #[tokio::test]
    async fn schemeless_short_link_without_fallback_is_not_found() {
        let client = PlacesClient::with_base_url("k", 1, "ua", "http://127.0.0.1:9").unwrap();
        assert!(client
            .resolve_input("maps.app.goo.gl/AbCdEf", None)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn valid_identifier_resolves_without_network() {
        // Unroutable base URL: any request would fail and yield None.
        let client = PlacesClient::with_base_url("k", 1, "ua", "http://127.0.0.1:9").unwrap();
        let resolution = client
            .resolve_input("  ChIJLU7jZClu5kcR4PcOOO6p3I0 ", None)
            .await
            .expect("should resolve locally");
        assert_eq!(resolution.identifier, "ChIJLU7jZClu5kcR4PcOOO6p3I0");
        assert_eq!(resolution.source, ResolutionSource::Direct);
    }

    #[tokio::test]
    async fn link_resolves_without_network() {
        let client = PlacesClient::with_base_url("k", 1, "ua", "http://127.0.0.1:9").unwrap();
        let resolution = client
            .resolve_input(
                "https://www.google.com/maps?ftid=0x47e66e2964e34e2d:0x8ddca9ee380ef7e0",
                None,
            )
            .await
            .expect("should resolve from link");
        assert_eq!(resolution.identifier, "0x47e66e2964e34e2d:0x8ddca9ee380ef7e0");
        assert_eq!(resolution.source, ResolutionSource::SharedLink);
    }

    #[tokio::test]
    async fn short_link_without_fallback_is_not_found() {
        let client = PlacesClient::with_base_url("k", 1, "ua", "http://127.0.0.1:9").unwrap();
        assert!(client
            .resolve_input("https://maps.app.goo.gl/AbCdEf", None)
            .await
            .is_none());
    }
}

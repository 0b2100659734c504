//! Identifier extraction from shared map links.
//!
//! Shared links encode the place in several ways depending on where the link
//! was copied from. Each encoding has its own matcher; [`LINK_MATCHERS`] is
//! tried in order and the first hit wins.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::identifier::resolve;

type Matcher = fn(&str) -> Option<String>;

/// Ordered matchers, highest priority first.
pub const LINK_MATCHERS: &[(&str, Matcher)] = &[
    ("bang_feature_id", match_bang_feature_id),
    ("ftid_param", match_ftid_param),
    ("bare_feature_id", match_bare_feature_id),
    ("bang_place_token", match_bang_place_token),
    ("place_id_param", match_place_id_param),
];

static BANG_FEATURE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!1s(0x[0-9a-fA-F]+:0x[0-9a-fA-F]+)").expect("valid bang feature-id regex")
});

static FTID_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[?&]ftid=(0x[0-9a-fA-F]+:0x[0-9a-fA-F]+)").expect("valid ftid regex")
});

static BARE_FEATURE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(0x[0-9a-fA-F]+:0x[0-9a-fA-F]+)").expect("valid feature-id regex")
});

static BANG_PLACE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\d+s(ChI[A-Za-z0-9_-]+)").expect("valid bang place-token regex")
});

static PLACE_ID_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[?&](?:query_)?place_id=|place_id:)([A-Za-z0-9_:-]+)")
        .expect("valid place_id regex")
});

fn first_capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}

/// `data=!4m2!3m1!1s0x...:0x...` on full place URLs.
fn match_bang_feature_id(url: &str) -> Option<String> {
    first_capture(&BANG_FEATURE_ID, url)
}

/// `?ftid=0x...:0x...` on search-result links.
fn match_ftid_param(url: &str) -> Option<String> {
    first_capture(&FTID_PARAM, url)
}

/// A feature id anywhere in the string.
fn match_bare_feature_id(url: &str) -> Option<String> {
    first_capture(&BARE_FEATURE_ID, url)
}

/// `!19sChIJ...` on links that carry the long token instead of a feature id.
fn match_bang_place_token(url: &str) -> Option<String> {
    first_capture(&BANG_PLACE_TOKEN, url)
}

/// `?query_place_id=ChIJ...`, `?place_id=...` or `q=place_id:...`.
fn match_place_id_param(url: &str) -> Option<String> {
    first_capture(&PLACE_ID_PARAM, url)
}

/// Returns `true` for shortened share links, which hide the place behind a
/// redirect and cannot be parsed locally.
#[must_use]
pub fn is_short_link(url: &str) -> bool {
    let trimmed = url.trim();
    let parsed = if trimmed.contains("://") {
        reqwest::Url::parse(trimmed)
    } else {
        reqwest::Url::parse(&format!("https://{trimmed}"))
    };
    let Ok(parsed) = parsed else {
        return false;
    };
    match parsed.host_str() {
        Some("maps.app.goo.gl") => true,
        Some("goo.gl") => parsed.path().starts_with("/maps"),
        _ => false,
    }
}

/// Extracts a valid identifier from a shared map link.
///
/// The link is percent-decoded first. The first matcher that fires decides
/// the candidate, which is then cleaned and classified like any other input;
/// `None` when nothing matched or the match did not validate.
#[must_use]
pub fn extract_from_shared_link(url: &str) -> Option<String> {
    let decoded = percent_decode_str(url.trim()).decode_utf8_lossy();

    let (matcher, candidate) = LINK_MATCHERS
        .iter()
        .find_map(|(name, matcher)| matcher(&decoded).map(|hit| (*name, hit)))?;

    let identifier = resolve(&candidate);
    if identifier.valid {
        tracing::debug!(matcher, identifier = %identifier.cleaned, "extracted identifier from shared link");
        Some(identifier.cleaned)
    } else {
        tracing::debug!(
            matcher,
            candidate = %candidate,
            reason = %identifier.message,
            "shared-link match did not validate"
        );
        None
    }
}

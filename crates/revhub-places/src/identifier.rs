//! Cleaning and classification of place identifiers.
//!
//! [`resolve`] never fails: malformed input produces a [`CanonicalIdentifier`]
//! with `valid == false` and a best-effort `cleaned` value the UI can offer as
//! a correction.

use serde::Serialize;

/// Prefix carried by legacy long-token identifiers (`ChIJ...`).
pub const LEGACY_PREFIX: &str = "ChI";

/// Shortest identifier length accepted for the long-token and unrecognized
/// formats.
pub const MIN_IDENTIFIER_LEN: usize = 20;

const STRIPPED_CHARS: [char; 4] = ['"', '\'', '`', '\\'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierFormat {
    /// `ChI...` long token.
    LegacyPrefixed,
    /// `0x<hex>:0x<hex>` feature id.
    PairedHex,
    /// Plausible length but no known shape; accepted with a warning.
    Unrecognized,
}

/// Outcome of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalIdentifier {
    pub raw: String,
    pub cleaned: String,
    pub valid: bool,
    pub message: String,
    /// `None` when the input failed the character check or was empty.
    pub format: Option<IdentifierFormat>,
}

/// `0x` followed by one or more hex digits.
fn is_hex_segment(segment: &str) -> bool {
    segment
        .strip_prefix("0x")
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()))
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':')
}

/// Cleans and classifies `input`.
#[must_use]
pub fn resolve(input: &str) -> CanonicalIdentifier {
    let raw = input.to_owned();

    let unquoted: String = input
        .trim()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();
    let unquoted = unquoted.trim();
    let truncated = unquoted
        .find(['?', '#'])
        .map_or(unquoted, |idx| &unquoted[..idx]);

    if truncated.is_empty() {
        return CanonicalIdentifier {
            raw,
            cleaned: String::new(),
            valid: false,
            message: "Identifier is empty.".to_string(),
            format: None,
        };
    }

    if !truncated.chars().all(is_allowed) {
        let cleaned: String = truncated.chars().filter(|c| is_allowed(*c)).collect();
        return CanonicalIdentifier {
            raw,
            cleaned,
            valid: false,
            message: "Identifier contains invalid characters; only letters, digits, '_', '-' and ':' are allowed."
                .to_string(),
            format: None,
        };
    }

    let cleaned = truncated.to_owned();
    let (valid, format, message) = classify(&cleaned);
    CanonicalIdentifier {
        raw,
        cleaned,
        valid,
        message,
        format: Some(format),
    }
}

fn classify(cleaned: &str) -> (bool, IdentifierFormat, String) {
    if cleaned.starts_with(LEGACY_PREFIX) {
        if cleaned.len() < MIN_IDENTIFIER_LEN {
            return (
                false,
                IdentifierFormat::LegacyPrefixed,
                format!(
                    "Identifier is too short: {} characters, expected at least {MIN_IDENTIFIER_LEN}.",
                    cleaned.len()
                ),
            );
        }
        return (
            true,
            IdentifierFormat::LegacyPrefixed,
            "Valid place identifier.".to_string(),
        );
    }

    if cleaned.starts_with("0x") {
        let well_formed = cleaned
            .split_once(':')
            .is_some_and(|(first, second)| is_hex_segment(first) && is_hex_segment(second));
        if !well_formed {
            return (
                false,
                IdentifierFormat::PairedHex,
                "Feature identifier must have the form 0x...:0x...".to_string(),
            );
        }
        return (
            true,
            IdentifierFormat::PairedHex,
            "Valid feature identifier.".to_string(),
        );
    }

    if cleaned.len() >= MIN_IDENTIFIER_LEN {
        return (
            true,
            IdentifierFormat::Unrecognized,
            "Unrecognized identifier format; accepted with warning.".to_string(),
        );
    }

    (
        false,
        IdentifierFormat::Unrecognized,
        format!("Identifier is too short and does not match a known format ({} characters).", cleaned.len()),
    )
}

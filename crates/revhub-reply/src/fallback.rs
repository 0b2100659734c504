//! Manual-reply deep links handed back when automated reply is unavailable.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

const GOOGLE_REVIEWS_PAGE: &str = "https://business.google.com/reviews";
const FACEBOOK_HOME: &str = "https://www.facebook.com";

/// Characters escaped inside a single path segment. `:` is left alone so
/// feature ids stay readable in the link.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn business_segment(business_id: Option<&str>) -> Option<String> {
    business_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| utf8_percent_encode(id, PATH_SEGMENT).to_string())
}

/// Google Business Profile review page for the business, or the generic
/// reviews page when the business is unknown.
#[must_use]
pub fn google_manual_reply_url(business_id: Option<&str>) -> String {
    match business_segment(business_id) {
        Some(id) => format!("{GOOGLE_REVIEWS_PAGE}/l/{id}"),
        None => GOOGLE_REVIEWS_PAGE.to_owned(),
    }
}

/// Facebook page reviews tab for the business.
#[must_use]
pub fn facebook_manual_reply_url(business_id: Option<&str>) -> String {
    match business_segment(business_id) {
        Some(id) => format!("{FACEBOOK_HOME}/{id}/reviews"),
        None => format!("{FACEBOOK_HOME}/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_link_contains_business_id() {
        assert_eq!(
            google_manual_reply_url(Some("ChIJLU7jZClu5kcR4PcOOO6p3I0")),
            "https://business.google.com/reviews/l/ChIJLU7jZClu5kcR4PcOOO6p3I0"
        );
    }

    #[test]
    fn google_link_without_business_is_still_usable() {
        assert_eq!(google_manual_reply_url(None), "https://business.google.com/reviews");
        assert_eq!(google_manual_reply_url(Some("  ")), "https://business.google.com/reviews");
    }

    #[test]
    fn facebook_link_shapes() {
        assert_eq!(
            facebook_manual_reply_url(Some("104523987654321")),
            "https://www.facebook.com/104523987654321/reviews"
        );
        assert_eq!(facebook_manual_reply_url(None), "https://www.facebook.com/");
    }

    #[test]
    fn business_id_is_escaped_for_the_path() {
        assert_eq!(
            google_manual_reply_url(Some("0x1:0x2")),
            "https://business.google.com/reviews/l/0x1:0x2"
        );
        assert_eq!(
            facebook_manual_reply_url(Some("my page/1")),
            "https://www.facebook.com/my%20page%2F1/reviews"
        );
    }
}

//! Filter and sort pipeline applied to normalized reviews.
//!
//! Filters are conjunctive and run in a fixed order: platform, rating,
//! date-from, date-to, response presence. Every filter is an explicit
//! `Option` (or [`ResponseFilter::Any`]); an unset filter keeps everything.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use revhub_core::{Platform, Review};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A query value that does not name a known option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field} value \"{value}\"")]
pub struct InvalidQueryValue {
    pub field: &'static str,
    pub value: String,
}

impl InvalidQueryValue {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFilter {
    #[default]
    Any,
    HasReply,
    NoReply,
}

impl FromStr for ResponseFilter {
    type Err = InvalidQueryValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "any" | "all" | "" => Ok(ResponseFilter::Any),
            "has_reply" | "replied" => Ok(ResponseFilter::HasReply),
            "no_reply" | "unreplied" => Ok(ResponseFilter::NoReply),
            other => Err(InvalidQueryValue::new("response", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    DateAsc,
    #[default]
    DateDesc,
    RatingAsc,
    RatingDesc,
}

impl FromStr for SortOrder {
    type Err = InvalidQueryValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "date_asc" => Ok(SortOrder::DateAsc),
            "date_desc" => Ok(SortOrder::DateDesc),
            "rating_asc" => Ok(SortOrder::RatingAsc),
            "rating_desc" => Ok(SortOrder::RatingDesc),
            other => Err(InvalidQueryValue::new("sort", other)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::DateAsc => "date_asc",
            SortOrder::DateDesc => "date_desc",
            SortOrder::RatingAsc => "rating_asc",
            SortOrder::RatingDesc => "rating_desc",
        })
    }
}

/// Parses a platform filter; `"all"` (or blank) means no platform filter.
#[must_use]
pub fn parse_platform_filter(s: &str) -> Option<Platform> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        return None;
    }
    Some(Platform::from(trimmed.to_owned()))
}

/// Parses a rating filter value in `1..=5`.
///
/// # Errors
///
/// Returns [`InvalidQueryValue`] for anything that is not an integer in range.
pub fn parse_rating_filter(s: &str) -> Result<u8, InvalidQueryValue> {
    s.trim()
        .parse::<u8>()
        .ok()
        .filter(|r| (1..=5).contains(r))
        .ok_or_else(|| InvalidQueryValue::new("rating", s))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewFilters {
    pub platform: Option<Platform>,
    pub rating: Option<u8>,
    /// Inclusive, compared against the review's UTC calendar date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive, compared against the review's UTC calendar date.
    pub date_to: Option<NaiveDate>,
    #[serde(default)]
    pub response: ResponseFilter,
}

impl ReviewFilters {
    /// Applies the filters in pipeline order.
    #[must_use]
    pub fn apply(&self, mut reviews: Vec<Review>) -> Vec<Review> {
        if let Some(platform) = &self.platform {
            reviews.retain(|r| &r.platform == platform);
        }
        if let Some(rating) = self.rating {
            reviews.retain(|r| r.rating == rating);
        }
        if let Some(from) = self.date_from {
            reviews.retain(|r| r.date.date_naive() >= from);
        }
        if let Some(to) = self.date_to {
            reviews.retain(|r| r.date.date_naive() <= to);
        }
        match self.response {
            ResponseFilter::Any => {}
            ResponseFilter::HasReply => reviews.retain(Review::has_response),
            ResponseFilter::NoReply => reviews.retain(|r| !r.has_response()),
        }
        reviews
    }
}

/// Sorts by the selected key. Order among equal keys is unspecified.
pub fn sort_reviews(reviews: &mut [Review], order: SortOrder) {
    match order {
        SortOrder::DateAsc => reviews.sort_unstable_by_key(|r| r.date),
        SortOrder::DateDesc => reviews.sort_unstable_by(|a, b| b.date.cmp(&a.date)),
        SortOrder::RatingAsc => reviews.sort_unstable_by_key(|r| r.rating),
        SortOrder::RatingDesc => reviews.sort_unstable_by(|a, b| b.rating.cmp(&a.rating)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use revhub_core::ReviewResponse;

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap() + Duration::days(n - 1)
    }

    fn review(id: &str, platform: Platform, rating: u8, day_n: i64, replied: bool) -> Review {
        Review {
            id: id.to_owned(),
            author: "A".to_owned(),
            content: String::new(),
            rating,
            date: day(day_n),
            platform,
            business_id: "biz".to_owned(),
            profile_photo: None,
            language: "fr".to_owned(),
            relative_time_description: None,
            response: replied.then(|| ReviewResponse {
                content: "Merci".to_owned(),
                date: day(day_n),
            }),
        }
    }

    /// Two platforms, three ratings, ten-day spread.
    fn fixture() -> Vec<Review> {
        vec![
            review("r1", Platform::Google, 5, 1, true),
            review("r2", Platform::Facebook, 3, 3, false),
            review("r3", Platform::Google, 1, 5, false),
            review("r4", Platform::Facebook, 5, 8, true),
            review("r5", Platform::Google, 3, 10, false),
        ]
    }

    fn ids(reviews: &[Review]) -> Vec<&str> {
        reviews.iter().map(|r| r.id.as_str()).collect()
    }

    fn date(n: i64) -> NaiveDate {
        day(n).date_naive()
    }

    #[test]
    fn empty_filters_keep_everything() {
        let out = ReviewFilters::default().apply(fixture());
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn conjunction_matches_brute_force() {
        let platforms = [None, Some(Platform::Google), Some(Platform::Facebook)];
        let ratings = [None, Some(1), Some(3), Some(5)];
        let bounds = [None, Some(1), Some(3), Some(5), Some(8), Some(10)];

        for platform in &platforms {
            for rating in ratings {
                for from in bounds {
                    for to in bounds {
                        let filters = ReviewFilters {
                            platform: platform.clone(),
                            rating,
                            date_from: from.map(date),
                            date_to: to.map(date),
                            response: ResponseFilter::Any,
                        };
                        let got = filters.apply(fixture());
                        let expected: Vec<Review> = fixture()
                            .into_iter()
                            .filter(|r| platform.as_ref().is_none_or(|p| &r.platform == p))
                            .filter(|r| rating.is_none_or(|x| r.rating == x))
                            .filter(|r| from.is_none_or(|f| r.date >= day(f) - Duration::hours(12)))
                            .filter(|r| to.is_none_or(|t| r.date <= day(t) + Duration::hours(11)))
                            .collect();
                        assert_eq!(ids(&got), ids(&expected), "{filters:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn platform_rating_and_range_together() {
        let filters = ReviewFilters {
            platform: Some(Platform::Google),
            rating: Some(3),
            date_from: Some(date(2)),
            date_to: Some(date(10)),
            response: ResponseFilter::Any,
        };
        assert_eq!(ids(&filters.apply(fixture())), vec!["r5"]);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let filters = ReviewFilters {
            date_from: Some(date(3)),
            date_to: Some(date(8)),
            ..ReviewFilters::default()
        };
        assert_eq!(ids(&filters.apply(fixture())), vec!["r2", "r3", "r4"]);
    }

    #[test]
    fn response_presence_filter() {
        let replied = ReviewFilters {
            response: ResponseFilter::HasReply,
            ..ReviewFilters::default()
        };
        assert_eq!(ids(&replied.apply(fixture())), vec!["r1", "r4"]);

        let unreplied = ReviewFilters {
            response: ResponseFilter::NoReply,
            ..ReviewFilters::default()
        };
        assert_eq!(ids(&unreplied.apply(fixture())), vec!["r2", "r3", "r5"]);
    }

    #[test]
    fn sort_date_desc() {
        let mut reviews = vec![
            review("d1", Platform::Google, 4, 1, false),
            review("d3", Platform::Google, 4, 3, false),
            review("d2", Platform::Google, 4, 2, false),
        ];
        sort_reviews(&mut reviews, SortOrder::DateDesc);
        assert_eq!(ids(&reviews), vec!["d3", "d2", "d1"]);
        sort_reviews(&mut reviews, SortOrder::DateAsc);
        assert_eq!(ids(&reviews), vec!["d1", "d2", "d3"]);
    }

    #[test]
    fn sort_by_rating() {
        let mut reviews = vec![
            review("five", Platform::Google, 5, 1, false),
            review("one", Platform::Google, 1, 2, false),
            review("three", Platform::Google, 3, 3, false),
        ];
        sort_reviews(&mut reviews, SortOrder::RatingAsc);
        assert_eq!(ids(&reviews), vec!["one", "three", "five"]);
        sort_reviews(&mut reviews, SortOrder::RatingDesc);
        assert_eq!(ids(&reviews), vec!["five", "three", "one"]);
    }

    #[test]
    fn default_sort_is_date_desc() {
        assert_eq!(SortOrder::default(), SortOrder::DateDesc);
    }

    #[test]
    fn parses_query_values() {
        assert_eq!("rating_asc".parse::<SortOrder>().unwrap(), SortOrder::RatingAsc);
        assert!("newest".parse::<SortOrder>().is_err());
        assert_eq!(
            "has_reply".parse::<ResponseFilter>().unwrap(),
            ResponseFilter::HasReply
        );
        assert_eq!(parse_platform_filter("all"), None);
        assert_eq!(parse_platform_filter("Google"), Some(Platform::Google));
        assert_eq!(parse_rating_filter("4").unwrap(), 4);
        let err = parse_rating_filter("0").unwrap_err();
        assert_eq!(err.field, "rating");
        assert!(parse_rating_filter("six").is_err());
    }
}

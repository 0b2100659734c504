pub mod client;
pub mod error;
pub mod filter;
pub mod identifier;
pub mod links;
pub mod normalize;
pub mod resolver;
pub mod retry;
pub mod types;

pub use client::{FetchMode, PlacesClient, ReviewQuery, ReviewsPage, PREFERRED_REVIEW_LANGUAGE};
pub use error::PlacesError;
pub use filter::{InvalidQueryValue, ResponseFilter, ReviewFilters, SortOrder};
pub use identifier::{resolve, CanonicalIdentifier, IdentifierFormat};
pub use links::{extract_from_shared_link, is_short_link};
pub use resolver::{Resolution, ResolutionSource};
pub use retry::RetryPolicy;

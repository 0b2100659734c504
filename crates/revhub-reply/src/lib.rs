pub mod dispatcher;
pub mod error;
pub mod fallback;
mod facebook;
mod google;
pub mod types;

pub use dispatcher::{ReplyDispatcher, DEFAULT_FACEBOOK_BASE_URL, DEFAULT_GOOGLE_BASE_URL};
pub use error::ReplyError;
pub use types::{ReplyOutcome, ReplyRequest};

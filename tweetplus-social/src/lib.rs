//! Social network clients used by tweetplus.
//!
//! [`StatusPoster`] is the seam the dispatcher talks to: a text-only post and
//! a post with one attached [`Media`] payload. Only the Twitter/X client is
//! implemented.
pub mod poster;
pub mod twitter;

pub use poster::{ApiErrorDetail, Media, PostedStatus, SocialError, StatusPoster};

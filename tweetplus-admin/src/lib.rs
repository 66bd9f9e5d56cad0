//! "Tweet on publish" for content admin interfaces.
//!
//! - [`text`]: Unicode and punctuation normalization for tweet text
//! - [`content`]: the [`ContentItem`] abstraction and field accessors
//! - [`media`]: image field resolution into attachable payloads
//! - [`dispatch`]: the batch dispatcher and its per-item outcomes
//! - [`notify`]: admin notices
//! - [`admin`]: form, save and bulk-action hooks composed from the above
pub mod admin;
pub mod content;
pub mod dispatch;
pub mod media;
pub mod notify;
pub mod text;

pub use admin::{TweetAdmin, TweetFlags};
pub use content::{ContentItem, ImageField, ImageRef, TextField};
pub use dispatch::{DispatchReport, FailureReason, OutcomeStatus, TweetDispatcher, TweetOutcome};
pub use media::{MediaError, MediaResolver};
pub use notify::{CollectingNotifier, Notification, Notifier, TracingNotifier};

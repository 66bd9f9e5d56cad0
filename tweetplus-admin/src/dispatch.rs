//! Best-effort batch tweeting with per-item bookkeeping.
//!
//! Items are handled strictly one after another. A failing item never stops
//! the batch; every failure ends up as a [`FailureReason`] on its
//! [`TweetOutcome`] and, once the batch is done, as an admin warning.
use std::fmt;
use std::sync::Arc;
use tweetplus_common::NoticeLevel;
use tweetplus_config::DispatchSettings;
use tweetplus_social::{Media, StatusPoster};

use crate::content::{ContentItem, ImageField, ImageRef, TextField};
use crate::media::MediaResolver;
use crate::notify::Notifier;
use crate::text::{normalize, truncate_chars};

pub const ALL_SENT: &str = "All tweets were sent";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    NotPublished,
    /// An image is attached and the text exceeds the image text limit.
    MessageTooLong,
    ImageUnavailable(String),
    /// Error returned by the social network client.
    Api(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NotPublished => f.write_str("Item not published"),
            FailureReason::MessageTooLong => f.write_str("Message is too long"),
            FailureReason::ImageUnavailable(why) => write!(f, "Image unavailable: {why}"),
            FailureReason::Api(why) => f.write_str(why),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Sent { tweet_id: String, with_image: bool },
    Failed(FailureReason),
}

/// Result of one tweet attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetOutcome {
    /// Position of the item in the dispatched slice.
    pub item: usize,
    /// Normalized item title, used in reports.
    pub title: String,
    /// Normalized, truncated text (without the short URL).
    pub message: String,
    pub status: OutcomeStatus,
}

impl TweetOutcome {
    fn failed(item: usize, title: String, message: String, reason: FailureReason) -> Self {
        Self {
            item,
            title,
            message,
            status: OutcomeStatus::Failed(reason),
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.status, OutcomeStatus::Sent { .. })
    }

    pub fn reason(&self) -> Option<&FailureReason> {
        match &self.status {
            OutcomeStatus::Failed(reason) => Some(reason),
            OutcomeStatus::Sent { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub outcomes: Vec<TweetOutcome>,
}

impl DispatchReport {
    pub fn all_sent(&self) -> bool {
        self.outcomes.iter().all(TweetOutcome::succeeded)
    }

    pub fn sent_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TweetOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    /// One success notice when everything went out, otherwise one warning
    /// per failed item.
    pub fn emit(&self, notifier: &dyn Notifier) {
        if self.all_sent() {
            notifier.notify(NoticeLevel::Success, ALL_SENT);
            return;
        }
        for outcome in self.failures() {
            if let Some(reason) = outcome.reason() {
                notifier.notify(
                    NoticeLevel::Warning,
                    &format!("Tweet Error for '{}': {}", outcome.title, reason),
                );
            }
        }
    }
}

pub struct TweetDispatcher<T> {
    poster: Arc<dyn StatusPoster>,
    media: MediaResolver,
    text: TextField<T>,
    image: Option<ImageField<T>>,
    settings: DispatchSettings,
}

impl<T: ContentItem> TweetDispatcher<T> {
    pub fn new(poster: Arc<dyn StatusPoster>) -> Self {
        Self {
            poster,
            media: MediaResolver::default(),
            text: TextField::Display,
            image: None,
            settings: DispatchSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: DispatchSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_media(mut self, media: MediaResolver) -> Self {
        self.media = media;
        self
    }

    pub fn with_text_field(mut self, text: TextField<T>) -> Self {
        self.text = text;
        self
    }

    pub fn with_image_field(
        mut self,
        image: impl Fn(&T) -> Option<ImageRef> + Send + Sync + 'static,
    ) -> Self {
        self.image = Some(Arc::new(image));
        self
    }

    pub fn has_image_field(&self) -> bool {
        self.image.is_some()
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    pub fn is_eligible(&self, item: &T) -> bool {
        item.status() == self.settings.publish_status
    }

    /// Tweet every item, attaching images when an image field is set.
    pub async fn dispatch(&self, items: &mut [T]) -> DispatchReport {
        let mut outcomes = Vec::with_capacity(items.len());
        for (index, item) in items.iter_mut().enumerate() {
            outcomes.push(self.tweet_one(index, item, true).await);
        }
        let report = DispatchReport { outcomes };
        tracing::info!(
            total = report.outcomes.len(),
            sent = report.sent_count(),
            "tweet.batch.done"
        );
        report
    }

    /// Tweet a single item; `attach_image` is ignored without an image field.
    pub async fn tweet_one(&self, index: usize, item: &mut T, attach_image: bool) -> TweetOutcome {
        let form = self.settings.normal_form;
        let title = normalize(item.title(), form, true);

        if !self.is_eligible(item) {
            tracing::info!(item = index, %title, status = %item.status(), "tweet.skipped.unpublished");
            return TweetOutcome::failed(index, title, String::new(), FailureReason::NotPublished);
        }

        item.set_short_url();
        let raw = self.text.extract(item);
        let message = normalize(&truncate_chars(&raw, self.settings.text_limit), form, true);

        let mut media: Option<Media> = match (&self.image, attach_image) {
            (Some(field), true) => match self.media.resolve(field(item)).await {
                Ok(media) => media,
                Err(err) => {
                    tracing::warn!(item = index, %title, error = %err, "tweet.image.unavailable");
                    return TweetOutcome::failed(
                        index,
                        title,
                        message,
                        FailureReason::ImageUnavailable(err.to_string()),
                    );
                }
            },
            _ => None,
        };

        if media.is_some() && message.chars().count() > self.settings.image_text_limit {
            tracing::info!(
                item = index,
                %title,
                length = message.chars().count(),
                limit = self.settings.image_text_limit,
                "tweet.skipped.too_long"
            );
            return TweetOutcome::failed(index, title, message, FailureReason::MessageTooLong);
        }

        let status = format!("{message} {}", item.short_url());
        let with_image = media.is_some();
        let result = match media.as_mut() {
            Some(payload) => self.poster.post_media(&status, payload).await,
            None => self.poster.post_update(&status).await,
        };
        if let Some(payload) = media.take() {
            tracing::debug!(item = index, media = %payload.describe(), "tweet.image.released");
            drop(payload);
        }

        match result {
            Ok(posted) => {
                tracing::info!(item = index, %title, tweet_id = %posted.id, with_image, "tweet.sent");
                TweetOutcome {
                    item: index,
                    title,
                    message,
                    status: OutcomeStatus::Sent {
                        tweet_id: posted.id,
                        with_image,
                    },
                }
            }
            // TODO: retry once with text only when an external image is refused (403).
            Err(err) => {
                let reason = err.reason();
                tracing::warn!(item = index, %title, error = %err, "tweet.failed");
                TweetOutcome::failed(index, title, message, FailureReason::Api(reason))
            }
        }
    }
}

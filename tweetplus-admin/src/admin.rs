//! Hooks for an admin interface: checkbox markup on the status field, a
//! tweet-after-save hook, and the "Tweet selected items" bulk action.
//!
//! Without API credentials the whole feature switches itself off: no
//! checkboxes are rendered, no action is offered, and saves never tweet.
use tweetplus_common::NoticeLevel;

use crate::content::ContentItem;
use crate::dispatch::{DispatchReport, TweetDispatcher, TweetOutcome};
use crate::notify::Notifier;

pub const STATUS_FIELD: &str = "status";
pub const SEND_TWEET_FIELD: &str = "send_tweet";
pub const TWEET_IMAGE_FIELD: &str = "tweet_image";

pub const SEND_TWEET_LABEL: &str = "Send Tweet";
pub const TWEET_IMAGE_LABEL: &str = "Tweet with Image";

pub const ACTION_NAME: &str = "tweet_item";
pub const ACTION_DESCRIPTION: &str = "Tweet selected items";

pub const TWEET_SENT: &str = "Tweet has been sent";

fn checkbox(name: &str, label: &str) -> String {
    format!(
        "\n    <input id='id_{name}' name='{name}' type='checkbox'>\n    \
         <label class='vCheckboxLabel' for='id_{name}'>{label}</label>\n"
    )
}

/// Checkbox state submitted with the edit form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TweetFlags {
    pub send_tweet: bool,
    pub tweet_image: bool,
}

impl TweetFlags {
    /// Read flags from submitted form pairs; a checkbox counts as ticked
    /// when present with a non-empty value.
    ///
    /// ```
    /// use tweetplus_admin::TweetFlags;
    ///
    /// let flags = TweetFlags::from_form([("title", "x"), ("send_tweet", "on")]);
    /// assert!(flags.send_tweet);
    /// assert!(!flags.tweet_image);
    /// ```
    pub fn from_form<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut flags = Self::default();
        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            match key {
                SEND_TWEET_FIELD => flags.send_tweet = true,
                TWEET_IMAGE_FIELD => flags.tweet_image = true,
                _ => {}
            }
        }
        flags
    }
}

pub struct TweetAdmin<T> {
    dispatcher: Option<TweetDispatcher<T>>,
    text_or_image: bool,
}

impl<T: ContentItem> TweetAdmin<T> {
    /// `None` disables the feature (missing credentials).
    pub fn new(dispatcher: Option<TweetDispatcher<T>>) -> Self {
        Self {
            dispatcher,
            text_or_image: true,
        }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// `true` offers "Send Tweet" plus "Tweet with Image"; `false` offers
    /// only "Tweet with Image", which then triggers the tweet by itself.
    pub fn with_text_or_image(mut self, text_or_image: bool) -> Self {
        self.text_or_image = text_or_image;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.dispatcher.is_some()
    }

    pub fn dispatcher(&self) -> Option<&TweetDispatcher<T>> {
        self.dispatcher.as_ref()
    }

    /// Decorate a rendered form field; only the status field gains the
    /// tweet checkboxes.
    pub fn formfield_for_dbfield(&self, field_name: &str, rendered: String) -> String {
        if !self.is_enabled() || field_name != STATUS_FIELD {
            return rendered;
        }
        let tweet_html = if self.text_or_image {
            checkbox(SEND_TWEET_FIELD, SEND_TWEET_LABEL)
        } else {
            String::new()
        };
        let image_html = checkbox(TWEET_IMAGE_FIELD, TWEET_IMAGE_LABEL);
        format!("{rendered}\n<div class='send_tweet_container'>{tweet_html}{image_html}</div>\n")
    }

    fn wants_tweet(&self, flags: TweetFlags) -> bool {
        if self.text_or_image {
            flags.send_tweet
        } else {
            flags.tweet_image
        }
    }

    /// Run after the item has been persisted.
    ///
    /// Returns the outcome when a tweet was attempted.
    pub async fn save_model(
        &self,
        item: &mut T,
        flags: TweetFlags,
        notifier: &dyn Notifier,
    ) -> Option<TweetOutcome> {
        let dispatcher = self.dispatcher.as_ref()?;
        if !dispatcher.is_eligible(item) || !self.wants_tweet(flags) {
            return None;
        }

        let outcome = dispatcher.tweet_one(0, item, flags.tweet_image).await;
        match outcome.reason() {
            None => notifier.notify(NoticeLevel::Success, TWEET_SENT),
            Some(reason) => notifier.notify(
                NoticeLevel::Error,
                &format!("There was an error: {reason}"),
            ),
        }
        Some(outcome)
    }

    /// Admin actions with `tweet_item` prepended when the feature is on.
    pub fn actions(&self, base: impl IntoIterator<Item = String>) -> Vec<String> {
        let mut actions = Vec::new();
        if self.is_enabled() {
            actions.push(ACTION_NAME.to_string());
        }
        actions.extend(base.into_iter().filter(|a| a != ACTION_NAME));
        actions
    }

    /// The bulk action: tweet every selected item and report.
    pub async fn tweet_item(&self, items: &mut [T], notifier: &dyn Notifier) -> Option<DispatchReport> {
        let Some(dispatcher) = self.dispatcher.as_ref() else {
            tracing::warn!(selected = items.len(), "tweet action invoked without credentials");
            return None;
        };
        let report = dispatcher.dispatch(items).await;
        report.emit(notifier);
        Some(report)
    }
}

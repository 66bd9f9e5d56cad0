#![allow(dead_code)]

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, OnceLock};

use async_trait::async_trait;
use tweetplus_admin::ContentItem;
use tweetplus_common::ContentStatus;
use tweetplus_common::observability::{LogConfig, LogFormat};
use tweetplus_social::{Media, PostedStatus, SocialError, StatusPoster};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "tweetplus-tests",
            log_dir: Some(std::env::temp_dir().join("tweetplus-tests")),
            emit_stderr: true,
            format: LogFormat::Text,
            default_filter: "debug".to_string(),
        };
        tweetplus_common::observability::init_logging(config).unwrap_or_default()
    });
}

/// A call received by [`ScriptedPoster`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub status: String,
    /// `Media::describe()` of the attachment, if any.
    pub media: Option<String>,
}

/// Records every post and answers from a script; once the script runs out
/// every post succeeds.
#[derive(Default)]
pub struct ScriptedPoster {
    calls: Mutex<Vec<Call>>,
    script: Mutex<VecDeque<Result<(), SocialError>>>,
}

impl ScriptedPoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_fail(self, err: SocialError) -> Self {
        self.script.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn then_succeed(self) -> Self {
        self.script.lock().unwrap().push_back(Ok(()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, status: &str, media: Option<String>) -> Result<PostedStatus, SocialError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(Call {
            status: status.to_string(),
            media,
        });
        let id = calls.len().to_string();
        drop(calls);

        match self.script.lock().unwrap().pop_front() {
            Some(Err(err)) => Err(err),
            Some(Ok(())) | None => Ok(PostedStatus {
                id,
                text: status.to_string(),
            }),
        }
    }
}

#[async_trait]
impl StatusPoster for ScriptedPoster {
    async fn post_update(&self, status: &str) -> Result<PostedStatus, SocialError> {
        self.record(status, None)
    }

    async fn post_media(&self, status: &str, media: &mut Media) -> Result<PostedStatus, SocialError> {
        self.record(status, Some(media.describe()))
    }
}

/// Minimal blog-style content item.
#[derive(Debug, Clone)]
pub struct Article {
    pub title: String,
    pub status: ContentStatus,
    pub body: String,
    pub image: String,
    pub slug: String,
    pub short_url: Option<String>,
    pub short_url_calls: usize,
}

impl Article {
    pub fn published(title: &str) -> Self {
        Self {
            title: title.to_string(),
            status: ContentStatus::Published,
            body: String::new(),
            image: String::new(),
            slug: title.to_lowercase().replace(' ', "-"),
            short_url: None,
            short_url_calls: 0,
        }
    }

    pub fn draft(title: &str) -> Self {
        Self {
            status: ContentStatus::Draft,
            ..Self::published(title)
        }
    }

    pub fn with_image(mut self, image: &str) -> Self {
        self.image = image.to_string();
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }
}

impl fmt::Display for Article {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

impl ContentItem for Article {
    fn status(&self) -> ContentStatus {
        self.status
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_short_url(&mut self) {
        self.short_url_calls += 1;
        if self.short_url.is_none() {
            self.short_url = Some(format!("https://sho.rt/{}", self.slug));
        }
    }

    fn short_url(&self) -> &str {
        self.short_url.as_deref().unwrap_or("")
    }
}

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tweetplus_http::HttpError;
use url::Url;

/// A status update accepted by the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedStatus {
    pub id: String,
    pub text: String,
}

/// One entry of a structured API error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
}

impl ApiErrorDetail {
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// The message field, falling back to `detail` then `title`.
    pub fn text(&self) -> &str {
        [&self.message, &self.detail, &self.title]
            .into_iter()
            .map(String::as_str)
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}

#[derive(Debug, Error)]
pub enum SocialError {
    /// The API answered with an error document.
    #[error("api error {status}: {}", .errors.first().map(ApiErrorDetail::text).unwrap_or("unknown"))]
    Api {
        status: u16,
        errors: Vec<ApiErrorDetail>,
    },
    #[error(transparent)]
    Http(HttpError),
    #[error("media read failed: {0}")]
    Media(#[from] std::io::Error),
    #[error("unexpected response: {0}")]
    Unexpected(String),
}

impl SocialError {
    /// Text suitable for an admin notice: the first nested message of a
    /// structured error, otherwise the error's display form.
    pub fn reason(&self) -> String {
        match self {
            SocialError::Api { errors, .. } => errors
                .first()
                .map(ApiErrorDetail::text)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| self.to_string()),
            other => other.to_string(),
        }
    }
}

/// An image ready to be attached to a post.
///
/// File handles are closed when the value is dropped.
#[derive(Debug)]
pub enum Media {
    File {
        name: String,
        file: tokio::fs::File,
    },
    Url(Url),
}

impl Media {
    /// Open a local image.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Media::File { name, file })
    }

    /// Short label for logs: file name or URL.
    pub fn describe(&self) -> String {
        match self {
            Media::File { name, .. } => name.clone(),
            Media::Url(url) => url.to_string(),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Media::File { .. })
    }

    pub(crate) async fn read_file(file: &mut tokio::fs::File) -> std::io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).await?;
        Ok(bytes)
    }
}

/// Posting operations offered by a social network client.
#[async_trait]
pub trait StatusPoster: Send + Sync {
    /// Publish a text-only status.
    async fn post_update(&self, status: &str) -> Result<PostedStatus, SocialError>;

    /// Publish a status with one attached image.
    ///
    /// The caller keeps ownership of `media` and releases it afterwards.
    async fn post_media(&self, status: &str, media: &mut Media) -> Result<PostedStatus, SocialError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_prefers_first_nested_message() {
        let err = SocialError::Api {
            status: 403,
            errors: vec![
                ApiErrorDetail::from_message("Status is a duplicate."),
                ApiErrorDetail::from_message("ignored"),
            ],
        };
        assert_eq!(err.reason(), "Status is a duplicate.");
    }

    #[test]
    fn reason_falls_back_to_detail_then_display() {
        let err = SocialError::Api {
            status: 401,
            errors: vec![ApiErrorDetail {
                title: "Unauthorized".into(),
                ..Default::default()
            }],
        };
        assert_eq!(err.reason(), "Unauthorized");

        let err = SocialError::Api {
            status: 500,
            errors: vec![],
        };
        assert_eq!(err.reason(), "api error 500: unknown");
    }

    #[test]
    fn generic_errors_use_display() {
        let err = SocialError::Unexpected("missing media id".into());
        assert_eq!(err.reason(), "unexpected response: missing media id");
    }
}

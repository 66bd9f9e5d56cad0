use serde::{Deserialize, Serialize};

use crate::poster::ApiErrorDetail;

/// Body of `POST 2/tweets`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTweetRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<TweetMedia>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TweetMedia {
    pub media_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTweetResponse {
    pub data: Option<CreatedTweet>,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTweet {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

/// Response of the media upload endpoint.
///
/// The v2 endpoint nests the id under `data`; the legacy v1.1 shape uses a
/// top-level `media_id_string`. Both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaUploadResponse {
    #[serde(default)]
    pub data: Option<UploadedMedia>,
    #[serde(default)]
    pub media_id_string: Option<String>,
}

impl MediaUploadResponse {
    pub fn media_id(&self) -> Option<&str> {
        self.data
            .as_ref()
            .map(|d| d.id.as_str())
            .or(self.media_id_string.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedMedia {
    pub id: String,
    #[serde(default)]
    pub media_key: Option<String>,
}

/// Error document: `{"errors":[...]}` or an RFC 7807 problem.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
}

impl ErrorBody {
    /// Flatten into a detail list, promoting a top-level problem document.
    pub fn into_details(self) -> Vec<ApiErrorDetail> {
        if !self.errors.is_empty() {
            return self.errors;
        }
        if self.title.is_empty() && self.detail.is_empty() {
            return Vec::new();
        }
        vec![ApiErrorDetail {
            message: self.detail.clone(),
            title: self.title,
            detail: self.detail,
            code: None,
        }]
    }
}

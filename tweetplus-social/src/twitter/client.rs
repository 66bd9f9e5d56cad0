//! Thin wrapper around the Twitter/X v2 write endpoints.
//!
//! Posts are sent with zero retries: a failed tweet is reported to the
//! admin user instead of being silently re-sent.
use crate::poster::{ApiErrorDetail, Media, PostedStatus, SocialError, StatusPoster};
use crate::twitter::types::{
    CreateTweetRequest, CreateTweetResponse, ErrorBody, MediaUploadResponse, TweetMedia,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tweetplus_http::{Auth, HttpClient, HttpError, RequestOpts};

pub const DEFAULT_API_BASE: &str = "https://api.x.com/";

const TWEETS_PATH: &str = "2/tweets";
const MEDIA_UPLOAD_PATH: &str = "2/media/upload";

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    token: String,
}

impl TwitterApi {
    pub fn new(access_token: String) -> Result<Self, SocialError> {
        Self::with_base(access_token, DEFAULT_API_BASE)
    }

    /// Point the client at another API root (tests, proxies).
    pub fn with_base(access_token: String, base: &str) -> Result<Self, SocialError> {
        let http = HttpClient::new(base).map_err(SocialError::Http)?;
        Ok(Self {
            http,
            token: access_token,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    fn opts(&self) -> RequestOpts<'_> {
        RequestOpts {
            auth: Some(Auth::Bearer(&self.token)),
            retries: Some(0),
            ..Default::default()
        }
    }

    /// `POST 2/tweets`, optionally referencing uploaded media.
    pub async fn create_tweet(
        &self,
        text: &str,
        media_ids: Vec<String>,
    ) -> Result<PostedStatus, SocialError> {
        let body = CreateTweetRequest {
            text,
            media: (!media_ids.is_empty()).then_some(TweetMedia { media_ids }),
        };
        let resp: CreateTweetResponse = self
            .http
            .post_json(TWEETS_PATH, &body, self.opts())
            .await
            .map_err(map_http_error)?;

        match resp.data {
            Some(tweet) => {
                tracing::info!(tweet_id = %tweet.id, "twitter.tweet.created");
                Ok(PostedStatus {
                    id: tweet.id,
                    text: tweet.text,
                })
            }
            None if !resp.errors.is_empty() => Err(SocialError::Api {
                status: 200,
                errors: resp.errors,
            }),
            None => Err(SocialError::Unexpected("tweet response without data".into())),
        }
    }

    /// Upload one image and return its media id.
    pub async fn upload_media(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        mime: &str,
    ) -> Result<String, SocialError> {
        let size = bytes.len();
        let make_form = || -> Result<Form, HttpError> {
            let part = Part::bytes(bytes.clone())
                .file_name(file_name.to_string())
                .mime_str(mime)
                .map_err(|e| HttpError::Build(e.to_string()))?;
            Ok(Form::new()
                .text("media_category", "tweet_image")
                .part("media", part))
        };
        let resp: MediaUploadResponse = self
            .http
            .post_multipart(MEDIA_UPLOAD_PATH, make_form, self.opts())
            .await
            .map_err(map_http_error)?;

        let id = resp
            .media_id()
            .ok_or_else(|| SocialError::Unexpected("upload response without media id".into()))?
            .to_string();
        tracing::debug!(media_id = %id, size, file_name, "twitter.media.uploaded");
        Ok(id)
    }

    /// Read the payload into memory: local files directly, URLs by download.
    async fn media_bytes(&self, media: &mut Media) -> Result<(Vec<u8>, String, String), SocialError> {
        match media {
            Media::File { name, file } => {
                let bytes = Media::read_file(file).await?;
                let mime = mime_for_name(name).to_string();
                Ok((bytes, name.clone(), mime))
            }
            Media::Url(url) => {
                let resp = self
                    .http
                    .get_bytes(
                        url.as_str(),
                        RequestOpts {
                            allow_absolute: true,
                            retries: Some(0),
                            ..Default::default()
                        },
                    )
                    .await
                    .map_err(SocialError::Http)?;
                let name = url
                    .path_segments()
                    .and_then(|mut segs| segs.next_back())
                    .filter(|s| !s.is_empty())
                    .unwrap_or("image")
                    .to_string();
                let mime = resp
                    .content_type()
                    .filter(|ct| ct.starts_with("image/"))
                    .map(str::to_string)
                    .unwrap_or_else(|| mime_for_name(&name).to_string());
                Ok((resp.body, name, mime))
            }
        }
    }
}

#[async_trait]
impl StatusPoster for TwitterApi {
    async fn post_update(&self, status: &str) -> Result<PostedStatus, SocialError> {
        self.create_tweet(status, Vec::new()).await
    }

    async fn post_media(&self, status: &str, media: &mut Media) -> Result<PostedStatus, SocialError> {
        let (bytes, name, mime) = self.media_bytes(media).await?;
        let media_id = self.upload_media(bytes, &name, &mime).await?;
        self.create_tweet(status, vec![media_id]).await
    }
}

/// Decode structured API errors; everything else stays an HTTP error.
fn map_http_error(err: HttpError) -> SocialError {
    match err {
        HttpError::Api {
            status,
            message,
            body,
            ..
        } => {
            let mut errors = serde_json::from_str::<ErrorBody>(&body)
                .map(ErrorBody::into_details)
                .unwrap_or_default();
            if errors.is_empty() {
                errors.push(ApiErrorDetail::from_message(message));
            }
            SocialError::Api {
                status: status.as_u16(),
                errors,
            }
        }
        other => SocialError::Http(other),
    }
}

fn mime_for_name(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

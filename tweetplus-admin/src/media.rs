//! Resolution of an item's image field into an attachable payload.
//!
//! One winner per case:
//!
//! | field value            | payload                               |
//! |------------------------|---------------------------------------|
//! | missing or empty       | the default image, if configured      |
//! | `ImageRef::File`       | that file, opened directly            |
//! | `ImageRef::MediaPath`  | `media_root/<path>`, opened           |
//! | `ImageRef::Url`        | the parsed URL, fetched at post time  |
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tweetplus_config::MediaSettings;
use tweetplus_social::Media;
use url::Url;

use crate::content::ImageRef;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("cannot open image {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid image URL {url}: {source}")]
    BadUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, Default)]
pub struct MediaResolver {
    media_root: PathBuf,
    default_image: Option<ImageRef>,
}

impl MediaResolver {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
            default_image: None,
        }
    }

    pub fn from_settings(settings: &MediaSettings) -> Self {
        Self {
            media_root: settings.root.clone(),
            default_image: settings.default_image.as_deref().and_then(ImageRef::parse),
        }
    }

    pub fn with_default_image(mut self, image: Option<ImageRef>) -> Self {
        self.default_image = image.filter(|i| !i.is_empty());
        self
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Turn a field value into an opened payload; `Ok(None)` means the
    /// post goes out as text only.
    pub async fn resolve(&self, found: Option<ImageRef>) -> Result<Option<Media>, MediaError> {
        let chosen = match found.filter(|i| !i.is_empty()) {
            Some(image) => image,
            None => match &self.default_image {
                Some(image) => image.clone(),
                None => return Ok(None),
            },
        };

        match chosen {
            ImageRef::File(path) => open(path).await.map(Some),
            ImageRef::MediaPath(rel) => open(self.under_root(&rel)).await.map(Some),
            ImageRef::Url(raw) => Url::parse(raw.trim())
                .map(|url| Some(Media::Url(url)))
                .map_err(|source| MediaError::BadUrl { url: raw, source }),
        }
    }

    /// Join without letting the path escape the media root.
    fn under_root(&self, rel: &Path) -> PathBuf {
        let relative: PathBuf = rel
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect();
        self.media_root.join(relative)
    }
}

async fn open(path: PathBuf) -> Result<Media, MediaError> {
    match Media::open(&path).await {
        Ok(media) => {
            tracing::debug!(path = %path.display(), "tweet.image.opened");
            Ok(media)
        }
        Err(source) => Err(MediaError::Open { path, source }),
    }
}

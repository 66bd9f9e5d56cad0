//! What the dispatcher needs to know about a content item.
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tweetplus_common::ContentStatus;

/// A content item owned by the surrounding content repository.
///
/// `Display` is the item's default string representation and is what gets
/// tweeted unless a [`TextField`] accessor says otherwise.
pub trait ContentItem: fmt::Display {
    fn status(&self) -> ContentStatus;

    fn title(&self) -> &str;

    /// Assign the short URL if the item does not have one yet.
    ///
    /// Must be idempotent: the dispatcher calls it before every post.
    fn set_short_url(&mut self);

    /// The short URL, or the full absolute URL when no shortener is in use.
    fn short_url(&self) -> &str;
}

/// Where an item's image lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// A file the item already points at directly; opened as-is.
    File(PathBuf),
    /// A path relative to the configured media root.
    MediaPath(PathBuf),
    /// A remote image, downloaded by the client when posting.
    Url(String),
}

impl ImageRef {
    /// Classify a raw field value. Empty values mean "no image".
    ///
    /// ```
    /// use tweetplus_admin::ImageRef;
    ///
    /// assert_eq!(ImageRef::parse("  "), None);
    /// assert_eq!(
    ///     ImageRef::parse("https://example.com/a.png"),
    ///     Some(ImageRef::Url("https://example.com/a.png".into()))
    /// );
    /// assert_eq!(
    ///     ImageRef::parse("uploads/a.png"),
    ///     Some(ImageRef::MediaPath("uploads/a.png".into()))
    /// );
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Some(ImageRef::Url(raw.to_string()))
        } else {
            Some(ImageRef::MediaPath(PathBuf::from(raw)))
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ImageRef::File(p) | ImageRef::MediaPath(p) => p.as_os_str().is_empty(),
            ImageRef::Url(u) => u.trim().is_empty(),
        }
    }
}

/// Which text of an item gets tweeted.
pub enum TextField<T> {
    /// The item's `Display` form.
    Display,
    Accessor(Arc<dyn Fn(&T) -> String + Send + Sync>),
}

impl<T> TextField<T> {
    pub fn accessor(f: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        TextField::Accessor(Arc::new(f))
    }
}

impl<T: ContentItem> TextField<T> {
    pub fn extract(&self, item: &T) -> String {
        match self {
            TextField::Display => item.to_string(),
            TextField::Accessor(f) => f(item),
        }
    }
}

impl<T> Default for TextField<T> {
    fn default() -> Self {
        TextField::Display
    }
}

impl<T> Clone for TextField<T> {
    fn clone(&self) -> Self {
        match self {
            TextField::Display => TextField::Display,
            TextField::Accessor(f) => TextField::Accessor(Arc::clone(f)),
        }
    }
}

/// Accessor for an item's image field.
pub type ImageField<T> = Arc<dyn Fn(&T) -> Option<ImageRef> + Send + Sync>;

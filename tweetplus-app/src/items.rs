//! Content items read from a JSON file.
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tweetplus_admin::{ContentItem, ImageRef};
use tweetplus_common::ContentStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct JsonItem {
    pub title: String,
    #[serde(default)]
    pub status: ContentStatus,
    /// Absolute URL of the item; tweeted when no short URL is set.
    pub url: String,
    #[serde(default)]
    pub short_url: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl JsonItem {
    /// Text of a named field. `title` and `url` name the item's own
    /// attributes; anything else is looked up in `fields`.
    pub fn field_text(&self, name: &str) -> String {
        match name {
            "title" => self.title.clone(),
            "url" => self.url.clone(),
            _ => match self.fields.get(name) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            },
        }
    }

    pub fn field_image(&self, name: &str) -> Option<ImageRef> {
        match self.fields.get(name)? {
            Value::String(raw) => ImageRef::parse(raw),
            _ => None,
        }
    }
}

impl fmt::Display for JsonItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

impl ContentItem for JsonItem {
    fn status(&self) -> ContentStatus {
        self.status
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_short_url(&mut self) {
        if self.short_url.as_deref().is_none_or(str::is_empty) {
            self.short_url = Some(self.url.clone());
        }
    }

    fn short_url(&self) -> &str {
        self.short_url.as_deref().unwrap_or(&self.url)
    }
}

pub fn load_items(path: &Path) -> Result<Vec<JsonItem>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read items file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid items file {}", path.display()))
}

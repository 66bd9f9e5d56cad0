//! Loader for tweetplus configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are added; `TWEETPLUS__`-prefixed
//! environment variables (double underscore between path segments, e.g.
//! `TWEETPLUS__TWITTER__ACCESS_TOKEN`) override everything. String values
//! may reference other variables as `${VAR}` or `$VAR`.
//!
//! ```yaml
//! twitter:
//!   access_token: "${TWITTER_ACCESS_TOKEN}"
//! media:
//!   root: /srv/media
//!   default_image: https://example.com/card.png
//! dispatch:
//!   text_limit: 116
//!   image_text_limit: 96
//!   normal_form: NFKC
//!   publish_status: published
//! admin:
//!   text_or_image: true
//! logging:
//!   format: text
//!   filter: info
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tweetplus_common::observability::LogFormat;
use tweetplus_common::{ContentStatus, NormalForm};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "TWEETPLUS";

#[derive(Debug, Default, Deserialize)]
pub struct TweetplusConfig {
    /// API credentials; absent (or blank) disables tweeting altogether.
    #[serde(default)]
    pub twitter: Option<TwitterSettings>,
    #[serde(default)]
    pub media: MediaSettings,
    #[serde(default)]
    pub dispatch: DispatchSettings,
    #[serde(default)]
    pub admin: AdminSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl TweetplusConfig {
    /// Credentials usable for posting, if any.
    ///
    /// A blank token, or one still holding an unexpanded `${VAR}`
    /// placeholder, counts as missing.
    pub fn twitter_credentials(&self) -> Option<&TwitterSettings> {
        self.twitter.as_ref().filter(|t| {
            let token = t.access_token.trim();
            !token.is_empty() && !token.contains("${")
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwitterSettings {
    /// OAuth 2.0 user-context token with `tweet.write` and `media.write`.
    pub access_token: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaSettings {
    /// Directory that relative image paths are resolved against.
    #[serde(default = "default_media_root")]
    pub root: PathBuf,
    /// Image (URL or media-relative path) used when an item has none.
    #[serde(default)]
    pub default_image: Option<String>,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            root: default_media_root(),
            default_image: None,
        }
    }
}

/// Limits and vocabulary handed to the tweet dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DispatchSettings {
    /// Base message length; leaves room for the appended short URL.
    #[serde(default = "default_text_limit")]
    pub text_limit: usize,
    /// Maximum message length when an image is attached.
    #[serde(default = "default_image_text_limit")]
    pub image_text_limit: usize,
    #[serde(default)]
    pub normal_form: NormalForm,
    #[serde(default = "default_publish_status")]
    pub publish_status: ContentStatus,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            text_limit: default_text_limit(),
            image_text_limit: default_image_text_limit(),
            normal_form: NormalForm::default(),
            publish_status: default_publish_status(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AdminSettings {
    /// Offer both "Send Tweet" and "Tweet with Image" checkboxes; when
    /// false only the image checkbox is rendered.
    #[serde(default = "default_true")]
    pub text_or_image: bool,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            text_or_image: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default = "default_true")]
    pub stderr: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::default(),
            filter: default_log_filter(),
            stderr: true,
        }
    }
}

fn default_api_base() -> String {
    "https://api.x.com/".into()
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_media_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_text_limit() -> usize {
    116
}
fn default_image_text_limit() -> usize {
    96
}
fn default_publish_status() -> ContentStatus {
    ContentStatus::Published
}
fn default_log_filter() -> String {
    "info".into()
}
fn default_true() -> bool {
    true
}

/// `~/.config/tweetplus/tweetplus.yaml` (platform equivalent), if a config
/// directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tweetplus").join("tweetplus.yaml"))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (files, inline YAML, env).
pub struct TweetplusConfigLoader {
    files: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for TweetplusConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TweetplusConfigLoader {
    /// Start with no sources; environment overrides are layered on in
    /// [`TweetplusConfigLoader::load`].
    ///
    /// ```
    /// use tweetplus_config::TweetplusConfigLoader;
    ///
    /// let config = TweetplusConfigLoader::new()
    ///     .with_yaml_str("dispatch:\n  text_limit: 100")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.dispatch.text_limit, 100);
    /// assert_eq!(config.dispatch.image_text_limit, 96);
    /// assert!(config.twitter_credentials().is_none());
    /// ```
    pub fn new() -> Self {
        Self {
            files: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files = self
            .files
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be missing, so headless deployments can rely
    /// on environment variables alone.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files = self
            .files
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use tweetplus_config::TweetplusConfigLoader;
    ///
    /// let cfg = TweetplusConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// twitter:
    ///   access_token: "example"
    /// admin:
    ///   text_or_image: false
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// let creds = cfg.twitter_credentials().unwrap();
    /// assert_eq!(creds.api_base, "https://api.x.com/");
    /// assert!(!cfg.admin.text_or_image);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.files = self
            .files
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `${VAR}` placeholders are expanded before the strongly typed structs
    /// are materialised.
    pub fn load(self) -> Result<TweetplusConfig, ConfigError> {
        let cfg = self
            .files
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

//! Common types and utilities shared across tweetplus crates.
//!
//! This crate defines the small vocabulary every other crate speaks: the
//! publish status of a content item, the Unicode normal form used when
//! cleaning tweet text, and the severity of admin notices. It also hosts the
//! shared error type and the `tracing` initialiser used by binaries and tests.
//!
//! # Overview
//!
//! - [`ContentStatus`]: publish state of a content item
//! - [`NormalForm`]: Unicode normalization form selector
//! - [`NoticeLevel`]: severity of a message surfaced to the admin user
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`TweetplusError`] and [`Result`]: shared error handling
//!
//! # Examples
//!
//! ```rust
//! use tweetplus_common::{ContentStatus, NormalForm};
//!
//! assert_eq!(NormalForm::default(), NormalForm::Nfkc);
//! assert_eq!("published".parse::<ContentStatus>().unwrap(), ContentStatus::Published);
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod observability;

/// Publish state of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => f.write_str("draft"),
            Self::Published => f.write_str("published"),
        }
    }
}

impl FromStr for ContentStatus {
    type Err = TweetplusError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" | "1" => Ok(Self::Draft),
            "published" | "2" => Ok(Self::Published),
            other => Err(TweetplusError::Config(format!(
                "unknown content status: {other}"
            ))),
        }
    }
}

/// Unicode normalization form.
///
/// Compatibility composition (NFKC) is the default: equivalent characters
/// are unified and then canonically composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NormalForm {
    #[serde(rename = "NFC", alias = "nfc")]
    Nfc,
    #[serde(rename = "NFD", alias = "nfd")]
    Nfd,
    #[default]
    #[serde(rename = "NFKC", alias = "nfkc")]
    Nfkc,
    #[serde(rename = "NFKD", alias = "nfkd")]
    Nfkd,
}

impl fmt::Display for NormalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Nfc => "NFC",
            Self::Nfd => "NFD",
            Self::Nfkc => "NFKC",
            Self::Nfkd => "NFKD",
        };
        f.write_str(name)
    }
}

impl FromStr for NormalForm {
    type Err = TweetplusError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NFC" => Ok(Self::Nfc),
            "NFD" => Ok(Self::Nfd),
            "NFKC" => Ok(Self::Nfkc),
            "NFKD" => Ok(Self::Nfkd),
            other => Err(TweetplusError::Config(format!(
                "unknown normal form: {other}"
            ))),
        }
    }
}

/// Severity of a notice shown to the admin user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Error types used across the tweetplus crates.
#[derive(thiserror::Error, Debug)]
pub enum TweetplusError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`TweetplusError`].
pub type Result<T> = std::result::Result<T, TweetplusError>;

//! Twitter/X posting client.
//!
//! `client` wraps the shared HTTP client with bearer auth and implements
//! [`crate::StatusPoster`]; `types` holds the request/response models.
pub mod client;
pub mod types;

pub use client::{DEFAULT_API_BASE, TwitterApi};

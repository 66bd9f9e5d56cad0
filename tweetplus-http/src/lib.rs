//! Minimal HTTP client with safe logging, optional retries, and bearer auth.
//!
//! - JSON requests, multipart uploads, and raw byte downloads share one send path
//! - Never logs secret values; only the auth kind (bearer/none) is recorded
//! - Retries 429/5xx with exponential backoff and `Retry-After` support when
//!   a retry budget is configured
//! - Optional raw response logging via `TWEETPLUS_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), tweetplus_http::HttpError> {
//! let client = tweetplus_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .post_json("v1/items", &serde_json::json!({"a": 1}), tweetplus_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Failed responses keep the full body in [`HttpError::Api`] so that API
//! specific crates can decode their own structured error payloads.

use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

const RAW_ENV: &str = "TWEETPLUS_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
        /// Full response body, for callers that decode structured errors.
        body: String,
    },
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the client.
///
/// ```
/// use tweetplus_http::Auth;
///
/// let bearer = Auth::Bearer("token");
/// assert_eq!(bearer.kind(), "bearer");
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Authorization: Bearer <token>
    Bearer(&'a str),
    None,
}

impl Auth<'_> {
    /// Label safe to log.
    pub fn kind(&self) -> &'static str {
        match self {
            Auth::Bearer(_) => "bearer",
            Auth::None => "none",
        }
    }
}

/// Per-request tuning knobs.
///
/// ```
/// use tweetplus_http::{Auth, RequestOpts};
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     retries: Some(0),
///     auth: Some(Auth::Bearer("t")),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(!opts.allow_absolute);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

/// Successful response as raw bytes.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use tweetplus_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// assert_eq!(client.max_retries, 2);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
            max_retries: 2,
        })
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = serde_json::to_vec(body).map_err(|e| HttpError::Build(e.to_string()))?;
        let resp = self
            .send(Method::POST, path, &opts, |rb| {
                rb.header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(bytes.clone())
            })
            .await?;
        decode_json(&resp.body)
    }

    /// POST a multipart form and decode a JSON response.
    ///
    /// `make_form` is called once per attempt since forms cannot be cloned.
    pub async fn post_multipart<F, T>(
        &self,
        path: &str,
        make_form: F,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        F: Fn() -> Result<Form, HttpError>,
        T: DeserializeOwned,
    {
        let resp = self
            .send_with(Method::POST, path, &opts, |rb| Ok(rb.multipart(make_form()?)))
            .await?;
        decode_json(&resp.body)
    }

    /// GET a resource as raw bytes (e.g. an image to re-upload).
    pub async fn get_bytes(&self, path: &str, opts: RequestOpts<'_>) -> Result<RawResponse, HttpError> {
        self.send(Method::GET, path, &opts, |rb| rb).await
    }

    fn resolve(&self, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
        if allow_absolute {
            if let Ok(abs) = Url::parse(path) {
                return Ok(abs);
            }
        }
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    async fn send<F>(
        &self,
        method: Method,
        path: &str,
        opts: &RequestOpts<'_>,
        decorate: F,
    ) -> Result<RawResponse, HttpError>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        self.send_with(method, path, opts, |rb| Ok(decorate(rb))).await
    }

    // Core request loop: build, send, classify, maybe retry.
    async fn send_with<F>(
        &self,
        method: Method,
        path: &str,
        opts: &RequestOpts<'_>,
        decorate: F,
    ) -> Result<RawResponse, HttpError>
    where
        F: Fn(RequestBuilder) -> Result<RequestBuilder, HttpError>,
    {
        let url = self.resolve(path, opts.allow_absolute)?;
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let auth_kind = opts.auth.as_ref().map(Auth::kind).unwrap_or("none");
        let mut attempt = 0usize;

        loop {
            let mut rb = self
                .inner
                .request(method.clone(), url.clone())
                .timeout(timeout);
            if let Some(hdrs) = &opts.headers {
                rb = rb.headers(hdrs.clone());
            }
            if let Some(Auth::Bearer(tok)) = &opts.auth {
                rb = rb.bearer_auth(sanitize_token(tok)?);
            }
            let rb = decorate(rb)?;

            let req_id = format!(
                "r{:x}",
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_nanos()
            );
            tracing::debug!(
                req_id=%req_id,
                attempt=attempt + 1,
                max_retries,
                method=%method,
                host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
                timeout_ms=timeout.as_millis() as u64,
                auth_kind,
                "http.request.start"
            );

            let t0 = std::time::Instant::now();
            let outcome = match rb.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    let headers = resp.headers().clone();
                    resp.bytes().await.map(|b| (status, headers, b.to_vec()))
                }
                Err(err) => Err(err),
            };

            let (status, headers, body) = match outcome {
                Ok(parts) => parts,
                Err(err) => {
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff(attempt);
                        tracing::warn!(
                            req_id=%req_id,
                            attempt,
                            max_retries,
                            backoff_ms=delay.as_millis() as u64,
                            message=%message,
                            "http.retrying.network"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    tracing::warn!(req_id=%req_id, attempt, message=%message, "http.network_error");
                    return Err(HttpError::Network(message));
                }
            };

            let request_id = headers
                .get("x-request-id")
                .or_else(|| headers.get("x-transaction-id"))
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_string();
            let remaining = headers
                .get("x-rate-limit-remaining")
                .and_then(|v| v.to_str().ok());
            tracing::debug!(
                req_id=%req_id,
                %status,
                duration_ms=t0.elapsed().as_millis() as u64,
                body_len=body.len(),
                x_request_id=%request_id,
                rate_limit.remaining=?remaining,
                "http.response"
            );
            if raw_enabled() {
                let cut = body.len().min(RAW_MAX_BODY);
                tracing::info!(
                    target: "http.raw",
                    %req_id,
                    %status,
                    body=%String::from_utf8_lossy(&body[..cut]),
                    truncated=body.len() > RAW_MAX_BODY
                );
            }

            if status.is_success() {
                return Ok(RawResponse { headers, body });
            }

            let message = extract_error_message(&body);
            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if retryable && attempt < max_retries {
                attempt += 1;
                let delay = retry_after_delay_secs(&headers)
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| backoff(attempt));
                tracing::warn!(
                    req_id=%req_id,
                    %status,
                    attempt,
                    max_retries,
                    backoff_ms=delay.as_millis() as u64,
                    message=%message,
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            tracing::warn!(
                req_id=%req_id,
                %status,
                message=%message,
                x_request_id=%request_id,
                body_snippet=%snip_body(&body),
                "http.error"
            );
            return Err(HttpError::Api {
                status,
                message,
                request_id,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
    }
}

// ==============================
// Helpers
// ==============================

fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, HttpError> {
    serde_json::from_slice::<T>(body).map_err(|e| {
        let snippet = snip_body(body);
        tracing::warn!(serde_err=%e, body_snippet=%snippet, "http.response.decode_error");
        HttpError::Decode(e.to_string(), snippet)
    })
}

fn backoff(attempt: usize) -> Duration {
    Duration::from_millis(200u64.saturating_mul(1 << (attempt.saturating_sub(1)).min(16)))
}

/// Best-effort human readable message from an error body.
///
/// Understands `{"errors":[{"message":..}]}`, RFC 7807 problem documents
/// (`title` / `detail`) and flat `{"message":..}` / `{"error":..}` shapes.
pub fn extract_error_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct Detail {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        title: String,
    }

    #[derive(Deserialize)]
    struct Envelope {
        #[serde(default)]
        errors: Vec<Detail>,
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        title: String,
        #[serde(default)]
        error: Option<serde_json::Value>,
    }

    fn first_non_empty(candidates: [&str; 3]) -> Option<String> {
        candidates
            .into_iter()
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }

    if let Ok(env) = serde_json::from_slice::<Envelope>(body) {
        if let Some(first) = env.errors.first() {
            if let Some(m) = first_non_empty([
                first.message.as_str(),
                first.detail.as_str(),
                first.title.as_str(),
            ]) {
                return m;
            }
        }
        if let Some(m) = first_non_empty([env.message.as_str(), env.detail.as_str(), env.title.as_str()]) {
            return m;
        }
        match env.error {
            Some(serde_json::Value::String(s)) if !s.is_empty() => return s,
            Some(serde_json::Value::Object(obj)) => {
                if let Some(s) = obj.get("message").and_then(|v| v.as_str()) {
                    return s.to_string();
                }
            }
            _ => {}
        }
    }
    snip_body(body)
}

fn retry_after_delay_secs(h: &HeaderMap) -> Option<u64> {
    h.get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .trim()
        .parse()
        .ok()
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).into_owned();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

fn sanitize_token(raw: &str) -> Result<String, HttpError> {
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    s.retain(|ch| !ch.is_ascii_whitespace());

    if s.is_empty() {
        return Err(HttpError::Build("empty bearer token".into()));
    }
    if !s.is_ascii() {
        return Err(HttpError::Build("token contains non-ASCII bytes".into()));
    }
    if s.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(HttpError::Build("token contains control characters".into()));
    }
    HeaderValue::from_str(&format!("Bearer {s}"))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
    Ok(s)
}

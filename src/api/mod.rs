pub mod assistant;
pub mod auth;
pub mod client;
pub mod messages;
pub mod projects;
pub mod reviews;


use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused connection,
    /// unreachable host).
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("HTTP {status}: {}", http_message(.detail, .body))]
    Http {
        status: u16,
        detail: Option<String>,
        body: String,
    },
    #[error("Parse error: {message}. Response body: {preview}")]
    ParseError { message: String, preview: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// True when no HTTP response was received at all. This is the only
    /// class of failure read endpoints may answer from fallback data.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::NetworkError(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn parse(message: impl Into<String>, body: &str) -> Self {
        ApiError::ParseError {
            message: message.into(),
            preview: preview(body),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Timeout(error.to_string())
        } else if error.is_decode() {
            ApiError::ParseError {
                message: error.to_string(),
                preview: String::new(),
            }
        } else if error.is_builder() {
            ApiError::InvalidInput(error.to_string())
        } else {
            ApiError::NetworkError(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::ParseError {
            message: error.to_string(),
            preview: String::new(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

fn http_message<'a>(detail: &'a Option<String>, body: &'a str) -> &'a str {
    detail.as_deref().unwrap_or(body)
}

/// Accepts `value` only if it stays a single URL path segment.
pub(crate) fn path_segment<'a>(what: &str, value: &'a str) -> ApiResult<&'a str> {
    let unsafe_char = |c: char| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace();
    if value.is_empty() || value.contains("..") || value.contains(unsafe_char) {
        return Err(ApiError::InvalidInput(format!("Invalid {}: {:?}", what, value)));
    }
    Ok(value)
}

const PREVIEW_LEN: usize = 200;

/// First characters of a response body, for error messages.
pub(crate) fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= PREVIEW_LEN {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(PREVIEW_LEN).collect();
        format!("{}...", head)
    }
}

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_ASSISTANT_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_PORT: u16 = 8000;
const ASSISTANT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// The assistant runs as a separate service.
    pub assistant_url: String,
    /// Serve read endpoints from bundled sample data when the backend is
    /// unreachable.
    pub offline_fallback: bool,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            assistant_url: DEFAULT_ASSISTANT_URL.to_string(),
            offline_fallback: true,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration from a key lookup.
    ///
    /// Base URL order: `API_BASE_URL`, then `API_HOST` (a LAN address, scheme
    /// and port added when missing), then `http://localhost:8000`. The
    /// assistant URL is `ASSISTANT_API_URL`, else the `API_HOST` host on port
    /// 8080, else `http://localhost:8080`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base_url = get("API_BASE_URL")
            .or_else(|| get("API_HOST").map(|host| host_url(&host)))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let assistant_url = get("ASSISTANT_API_URL")
            .or_else(|| get("API_HOST").map(|host| host_on_port(&host, ASSISTANT_PORT)))
            .unwrap_or_else(|| DEFAULT_ASSISTANT_URL.to_string());

        let timeout = match get("API_TIMEOUT_SECS").map(|v| v.parse::<u64>()) {
            Some(Ok(secs)) if secs > 0 => Duration::from_secs(secs),
            Some(_) => {
                tracing::warn!("Ignoring invalid API_TIMEOUT_SECS, using {:?}", DEFAULT_TIMEOUT);
                DEFAULT_TIMEOUT
            }
            None => DEFAULT_TIMEOUT,
        };

        let offline_fallback = get("OFFLINE_FALLBACK")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "off" | "no"))
            .unwrap_or(true);

        Self {
            assistant_url: assistant_url.trim_end_matches('/').to_string(),
            offline_fallback,
            ..Self::new(base_url).with_timeout(timeout)
        }
    }

    /// Same settings, pointed at the assistant service.
    pub fn assistant(&self) -> Self {
        Self {
            base_url: self.assistant_url.clone(),
            ..self.clone()
        }
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn host_url(host: &str) -> String {
    let with_scheme = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    };

    let authority = with_scheme
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or_default();
    if authority.contains(':') {
        with_scheme
    } else {
        format!("{}:{}", with_scheme, DEFAULT_PORT)
    }
}

/// `host` with any explicit port replaced by `port`.
fn host_on_port(host: &str, port: u16) -> String {
    let (scheme, rest) = host.split_once("://").unwrap_or(("http", host));
    let authority = rest.split('/').next().unwrap_or_default();
    let name = authority
        .rsplit_once(':')
        .map(|(name, _)| name)
        .unwrap_or(authority);
    format!("{}://{}:{}", scheme, name, port)
}

pub use assistant::AssistantApi;
pub use auth::AuthApi;
pub use client::{ApiClient, ApiRequest, HttpTransport, Method, MultipartForm, RequestBody, Transport};
pub use projects::ProjectsApi;
pub use reviews::ReviewsApi;

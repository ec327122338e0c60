//! Client configuration

/// Default object storage bucket for images
pub const DEFAULT_BUCKET: &str = "images";

/// Client configuration for connecting to the hosted backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Project base URL (e.g., "https://xyz.backend.io")
    pub base_url: String,

    /// Public API key, sent as `apikey` on every request
    pub api_key: String,

    /// Session token for admin writes; falls back to the API key
    pub token: Option<String>,

    /// Storage bucket for uploaded images
    pub bucket: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            token: None,
            bucket: DEFAULT_BUCKET.to_string(),
            timeout: 30,
        }
    }

    /// Set session token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set storage bucket
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout = timeout_secs;
        self
    }

    /// Base URL without trailing slash
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn bearer(&self) -> &str {
        self.token.as_deref().unwrap_or(&self.api_key)
    }
}

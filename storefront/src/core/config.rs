/// Storefront configuration
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | BACKEND_URL | (none) | Hosted backend base URL |
/// | BACKEND_API_KEY | (none) | Public API key |
/// | BACKEND_TOKEN | (none) | Admin session token for writes |
/// | STORAGE_BUCKET | images | Image bucket |
/// | WHATSAPP_PHONE | (none) | Order destination number |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | Log level |
/// | LOG_DIR | (none) | Daily rolling log directory |
/// | REQUEST_TIMEOUT_SECS | 30 | Backend request timeout |
///
/// # 示例
///
/// ```ignore
/// BACKEND_URL=https://xyz.backend.io BACKEND_API_KEY=anon cargo run -p storefront
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Hosted backend base URL
    pub backend_url: Option<String>,
    /// Public API key
    pub backend_api_key: Option<String>,
    /// Admin session token
    pub backend_token: Option<String>,
    /// Storage bucket for images
    pub storage_bucket: String,
    /// Destination number for checkout messages, any formatting
    pub whatsapp_phone: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// 请求超时时间 (秒)
    pub request_timeout_secs: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            backend_url: non_empty_var("BACKEND_URL"),
            backend_api_key: non_empty_var("BACKEND_API_KEY"),
            backend_token: non_empty_var("BACKEND_TOKEN"),
            storage_bucket: std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "images".into()),
            whatsapp_phone: std::env::var("WHATSAPP_PHONE").unwrap_or_else(|_| "1234567890".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: non_empty_var("LOG_DIR"),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Backend client settings, `None` when URL or key is missing
    pub fn client_config(&self) -> Option<storefront_client::ClientConfig> {
        let url = self.backend_url.as_ref()?;
        let key = self.backend_api_key.as_ref()?;
        let mut config = storefront_client::ClientConfig::new(url, key)
            .with_bucket(&self.storage_bucket)
            .with_timeout(self.request_timeout_secs);
        if let Some(token) = &self.backend_token {
            config = config.with_token(token);
        }
        Some(config)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

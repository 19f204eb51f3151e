//! Proxy configuration

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_BODY_LIMIT: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Automation webhook address; may be empty, which fails at request time
    pub webhook_url: String,
    /// Listen address for the HTTP server
    pub bind_addr: String,
    /// Maximum inbound body size in bytes
    pub body_limit: usize,
}

impl ProxyConfig {
    pub fn new(webhook_url: &str) -> Self {
        Self {
            webhook_url: normalize_webhook_url(webhook_url),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Read `N8N_WEBHOOK_URL` and `RAVE_BIND_ADDR` once.
    pub fn from_env() -> Self {
        let webhook_url = std::env::var("N8N_WEBHOOK_URL").unwrap_or_default();
        let mut config = Self::new(&webhook_url);
        if let Ok(addr) = std::env::var("RAVE_BIND_ADDR") {
            if !addr.trim().is_empty() {
                config.bind_addr = addr;
            }
        }
        config
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Prepend `https://` to scheme-less addresses; empty stays empty.
pub fn normalize_webhook_url(raw: &str) -> String {
    let url = raw.trim();
    if url.is_empty() {
        return String::new();
    }
    if url.starts_with("http") {
        return url.to_string();
    }
    format!("https://{}", url)
}

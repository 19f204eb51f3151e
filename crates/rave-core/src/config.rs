//! Client configuration

use std::path::PathBuf;
use url::Url;

use crate::Result;

pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_GREETING: &str =
    "Hello! I am the RaveIntelligence Assistant. How can I help you today?";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the transport proxy
    pub proxy_url: Url,
    /// Greeting seeded into a fresh conversation
    pub greeting: Option<String>,
    /// SQLite file holding the session slot; in-memory when unset
    pub session_db: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(proxy_url: &str) -> Result<Self> {
        Ok(Self {
            proxy_url: Url::parse(proxy_url)?,
            greeting: Some(DEFAULT_GREETING.to_string()),
            session_db: None,
        })
    }

    /// Read `RAVE_PROXY_URL` and `RAVE_SESSION_DB`.
    pub fn from_env() -> Result<Self> {
        let proxy_url =
            std::env::var("RAVE_PROXY_URL").unwrap_or_else(|_| DEFAULT_PROXY_URL.to_string());
        let mut config = Self::new(&proxy_url)?;
        config.session_db = std::env::var("RAVE_SESSION_DB")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        Ok(config)
    }

    pub fn without_greeting(mut self) -> Self {
        self.greeting = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let config = ClientConfig::new("http://localhost:3000").unwrap();
        assert_eq!(config.proxy_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.greeting.as_deref(), Some(DEFAULT_GREETING));
        assert!(config.session_db.is_none());
        assert!(config.without_greeting().greeting.is_none());
    }

    #[test]
    fn test_invalid_url() {
        assert!(ClientConfig::new("not a url").is_err());
    }
}

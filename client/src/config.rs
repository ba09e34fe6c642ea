use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// API root, e.g. `https://api.example.org`
    pub api_url: String,
    /// OAuth bearer token; requests go out unauthenticated when absent.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Page size used when list options leave `per_page` unset.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token: None,
            timeout_seconds: default_timeout(),
            per_page: default_per_page(),
            user_agent: default_user_agent(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: ClientConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            bail!(
                "api_url must start with http:// or https://, got '{}'",
                self.api_url
            );
        }
        if self.per_page == 0 || self.per_page > 5000 {
            bail!("per_page must be between 1 and 5000, got {}", self.per_page);
        }
        Ok(())
    }

    /// `api_url` without a trailing slash.
    pub fn endpoint(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

// Default functions
fn default_timeout() -> u64 {
    30
}

fn default_per_page() -> u32 {
    50
}

fn default_user_agent() -> String {
    format!("cf-client/{}", env!("CARGO_PKG_VERSION"))
}

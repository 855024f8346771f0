use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub site: SiteConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub content: ContentConfig,
    pub media: MediaConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentConfig {
    #[serde(default = "default_articles_per_page")]
    pub articles_per_page: usize,
    #[serde(default = "default_related_limit")]
    pub related_limit: usize,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            articles_per_page: default_articles_per_page(),
            related_limit: default_related_limit(),
            recent_limit: default_recent_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    pub upload_dir: String,
}

/// Per-client throttling of the anonymous write surfaces (story intake and
/// contact form).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IntakeConfig {
    #[serde(default = "default_intake_max_requests")]
    pub max_requests: usize,
    #[serde(default = "default_intake_window_secs")]
    pub window_secs: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_requests: default_intake_max_requests(),
            window_secs: default_intake_window_secs(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_pool_size() -> u32 {
    10
}

fn default_articles_per_page() -> usize {
    10
}

fn default_related_limit() -> usize {
    3
}

fn default_recent_limit() -> usize {
    3
}

fn default_intake_max_requests() -> usize {
    5
}

fn default_intake_window_secs() -> u64 {
    300
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!(
                "Could not read config file '{}': {}. Are you in a BreachPress site directory?",
                path.display(),
                e
            )
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.content.articles_per_page == 0 {
            anyhow::bail!("content.articles_per_page must be greater than 0");
        }
        if self.content.articles_per_page > 100 {
            anyhow::bail!("content.articles_per_page must be 100 or less");
        }
        if self.intake.max_requests == 0 {
            anyhow::bail!("intake.max_requests must be greater than 0");
        }
        Ok(())
    }
}

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Refresh interval in milliseconds
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    /// Per-feed request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the frontend documents
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedConfig>,
}

fn default_refresh_interval_ms() -> u64 {
    60_000
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_port() -> u16 {
    2000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("frontend")
}

const DEFAULT_FEED_URLS: &[&str] = &[
    "https://news.google.com/rss?hl=en-US&gl=US&ceid=US:en",
    "https://news.google.com/rss?hl=en-GB&gl=GB&ceid=GB:en",
    "https://feeds.bbci.co.uk/news/rss.xml",
    "https://www.aljazeera.com/xml/rss/all.xml",
    "https://www.theguardian.com/world/rss",
    "https://rss.nytimes.com/services/xml/rss/nyt/HomePage.xml",
    "https://feeds.a.dj.com/rss/RSSWorldNews.xml",
];

fn default_feeds() -> Vec<FeedConfig> {
    DEFAULT_FEED_URLS
        .iter()
        .map(|url| FeedConfig {
            url: url.to_string(),
        })
        .collect()
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            port: default_port(),
            static_dir: default_static_dir(),
            feeds: default_feeds(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.refresh_interval_ms > 0, "refresh_interval_ms must be positive");
        anyhow::ensure!(self.request_timeout_secs > 0, "request_timeout_secs must be positive");
        Ok(())
    }

    /// Load `path` if it exists, otherwise fall back to the built-in feed list.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `PORT` / `POLL_INTERVAL_MS` style overrides. Values that are not
    /// positive numbers leave the configured setting untouched.
    pub fn with_overrides(mut self, port: Option<&str>, poll_interval_ms: Option<&str>) -> Self {
        if let Some(port) = port.and_then(|p| p.trim().parse::<u16>().ok()) {
            if port > 0 {
                self.port = port;
            }
        }
        if let Some(ms) = poll_interval_ms.and_then(|p| p.trim().parse::<u64>().ok()) {
            if ms > 0 {
                self.refresh_interval_ms = ms;
            }
        }
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

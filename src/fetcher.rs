use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use feed_rs::model::Feed;
use feed_rs::parser;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::article::{normalize, Article, RawEntry};
use crate::cache::ArticleCache;
use crate::config::FeedConfig;
use crate::error::FetchError;
use crate::merge::merge;

/// A feed that contributed nothing to a cycle, and why.
#[derive(Debug)]
pub struct FeedFailure {
    pub url: String,
    pub error: FetchError,
}

/// Articles and failures accumulated over one pass of the feed list.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub articles: Vec<Article>,
    pub failures: Vec<FeedFailure>,
}

impl FetchOutcome {
    /// Fold one feed's result into the outcome.
    pub fn record(&mut self, url: &str, result: Result<Feed, FetchError>, ingested_at: DateTime<Utc>) {
        match result {
            Ok(feed) => {
                let source = feed_source_name(&feed, url);
                let before = self.articles.len();
                self.articles.extend(feed.entries.iter().map(|entry| {
                    normalize(
                        &RawEntry::from_feed_entry(entry, &feed.feed_type),
                        &source,
                        ingested_at,
                    )
                }));
                debug!(
                    "Collected {} entries from '{}'",
                    self.articles.len() - before,
                    source
                );
            }
            Err(error) => {
                warn!("Failed to fetch feed {}: {}", url, error);
                self.failures.push(FeedFailure {
                    url: url.to_string(),
                    error,
                });
            }
        }
    }
}

/// The feed's own title when it has one, otherwise the configured URL. A
/// whitespace-only title counts as missing.
pub fn feed_source_name(feed: &Feed, url: &str) -> String {
    feed.title
        .as_ref()
        .map(|t| t.content.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| url.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Articles collected before deduplication
    pub collected: usize,
    /// Articles installed in the cache
    pub cached: usize,
    pub failed_feeds: usize,
    pub completed_at: DateTime<Utc>,
}

/// Holds the refresh flag for one cycle; dropping it (on return, panic or
/// cancellation) releases the flag.
struct RefreshGuard<'a>(&'a AtomicBool);

impl<'a> RefreshGuard<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Fetcher {
    client: Client,
    feeds: Vec<FeedConfig>,
    cache: ArticleCache,
    refreshing: Arc<AtomicBool>,
}

impl Fetcher {
    pub fn new(
        feeds: Vec<FeedConfig>,
        cache: ArticleCache,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Newswire/0.1 (RSS Aggregator)")
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            feeds,
            cache,
            refreshing: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn cache(&self) -> &ArticleCache {
        &self.cache
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    /// Run one fetch-merge-install cycle.
    ///
    /// Returns `None` without touching the cache when another cycle is
    /// already running.
    pub async fn refresh_all_feeds(&self) -> Option<RefreshSummary> {
        let Some(_guard) = RefreshGuard::claim(&self.refreshing) else {
            info!("Refresh already in progress, skipping");
            return None;
        };

        let summary = self.do_refresh_all().await;

        Some(summary)
    }

    async fn do_refresh_all(&self) -> RefreshSummary {
        info!("Refreshing {} feeds", self.feeds.len());

        let outcome = self.collect().await;
        let collected = outcome.articles.len();
        let failed_feeds = outcome.failures.len();

        let merged = merge(outcome.articles);
        let cached = merged.len();
        let completed_at = Utc::now();
        self.cache.replace(merged, completed_at).await;

        info!(
            "Feeds polled: articles={} collected={} failed_feeds={} at {}",
            cached,
            collected,
            failed_feeds,
            completed_at.to_rfc3339()
        );

        RefreshSummary {
            collected,
            cached,
            failed_feeds,
            completed_at,
        }
    }

    /// Fetch every configured feed in order. A failing feed is recorded and
    /// skipped.
    pub async fn collect(&self) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();
        for feed in &self.feeds {
            let result = self.fetch_feed(&feed.url).await;
            outcome.record(&feed.url, result, Utc::now());
        }
        outcome
    }

    pub async fn fetch_feed(&self, url: &str) -> Result<Feed, FetchError> {
        debug!("Fetching feed: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let bytes = response.bytes().await?;
        Ok(parser::parse(&bytes[..])?)
    }
}

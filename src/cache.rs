use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::article::Article;

/// One generation of merged articles and the time its refresh completed.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub articles: Vec<Article>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Shared holder of the current [`Snapshot`].
///
/// Readers get an `Arc` to a whole generation; `replace` swaps the pointer, so
/// a reader never sees a list from one refresh paired with the timestamp of
/// another.
#[derive(Debug, Clone, Default)]
pub struct ArticleCache {
    current: Arc<RwLock<Arc<Snapshot>>>,
}

impl ArticleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> Arc<Snapshot> {
        self.current.read().await.clone()
    }

    pub async fn replace(&self, articles: Vec<Article>, last_updated: DateTime<Utc>) {
        let next = Arc::new(Snapshot {
            articles,
            last_updated: Some(last_updated),
        });
        *self.current.write().await = next;
    }
}

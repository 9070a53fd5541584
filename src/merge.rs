use std::collections::HashMap;

use crate::article::Article;

/// The merge key for an article URL: everything before the first `#`.
pub fn canonical_url(url: &str) -> &str {
    url.split_once('#').map_or(url, |(base, _)| base)
}

/// Collapse articles that share a canonical URL and sort newest first.
///
/// A later `published_at` replaces the held article in place; on equal
/// timestamps the first one seen is kept. Articles with an empty URL are
/// dropped.
pub fn merge(articles: Vec<Article>) -> Vec<Article> {
    let mut merged: Vec<Article> = Vec::with_capacity(articles.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for article in articles {
        if article.url.is_empty() {
            continue;
        }
        let key = canonical_url(&article.url).to_string();
        match positions.get(&key) {
            Some(&idx) => {
                if article.published_at > merged[idx].published_at {
                    merged[idx] = article;
                }
            }
            None => {
                positions.insert(key, merged.len());
                merged.push(article);
            }
        }
    }

    // Stable, so equal timestamps stay in insertion order
    merged.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    merged
}

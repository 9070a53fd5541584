//! Canonical article records and the mapping from raw feed entries.

use chrono::{DateTime, Utc};
use feed_rs::model::{Entry, FeedType};
use serde::{Deserialize, Serialize};

/// One normalized article as cached and served by the read API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub image: Option<String>,
}

/// A feed entry before normalization.
///
/// Every field is optional because RSS, Atom and JSON Feed each populate a
/// different subset of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    /// Explicit identifier (Atom `<id>`, JSON Feed `id`)
    pub id: Option<String>,
    /// RSS `<guid>`
    pub guid: Option<String>,
    pub link: Option<String>,
    pub title: Option<String>,
    /// Plain-text rendering of the content
    pub content_snippet: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub enclosure_url: Option<String>,
}

impl RawEntry {
    pub fn from_feed_entry(entry: &Entry, feed_type: &FeedType) -> Self {
        let identifier = non_empty(Some(entry.id.clone()));
        let (id, guid) = match feed_type {
            FeedType::RSS0 | FeedType::RSS1 | FeedType::RSS2 => (None, identifier),
            _ => (identifier, None),
        };

        let content = entry.content.as_ref().and_then(|c| c.body.clone());
        let description = entry.summary.as_ref().map(|s| s.content.clone());
        let content_snippet = content
            .as_deref()
            .or(description.as_deref())
            .map(strip_markup);

        let enclosure_url = entry
            .media
            .iter()
            .flat_map(|m| m.content.iter())
            .find_map(|c| c.url.as_ref())
            .map(|u| u.to_string());

        Self {
            id,
            guid,
            link: entry.links.first().map(|l| l.href.clone()),
            title: entry.title.as_ref().map(|t| t.content.clone()),
            content_snippet,
            content,
            description,
            published: entry.published.or(entry.updated),
            enclosure_url,
        }
    }
}

/// Map a raw entry to an [`Article`]. Never fails: missing fields fall back to
/// empty strings, `ingested_at`, or no image.
pub fn normalize(entry: &RawEntry, source: &str, ingested_at: DateTime<Utc>) -> Article {
    let title = entry.title.clone().unwrap_or_default();

    let id = first_non_empty([&entry.id, &entry.guid, &entry.link]).unwrap_or_else(|| {
        let date = entry.published.map(|p| p.to_rfc3339()).unwrap_or_default();
        format!("{}|{}", title, date)
    });

    let description = first_non_empty([&entry.content_snippet, &entry.content, &entry.description])
        .unwrap_or_default();

    Article {
        id,
        title,
        description,
        url: entry.link.clone().unwrap_or_default(),
        source: source.to_string(),
        published_at: entry.published.unwrap_or(ingested_at),
        image: non_empty(entry.enclosure_url.clone()),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn first_non_empty<const N: usize>(candidates: [&Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .find_map(|c| c.as_deref().filter(|v| !v.is_empty()))
        .map(str::to_string)
}

/// Drop markup tags, decode HTML entities and collapse whitespace.
pub fn strip_markup(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    let decoded = html_escape::decode_html_entities(&text);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

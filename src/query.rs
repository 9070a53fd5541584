use crate::article::Article;

pub const DEFAULT_MAX_RESULTS: usize = 20;
pub const MAX_RESULTS_CEILING: usize = 200;

/// Filters applied to the cached article list by `/api/news`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    /// Lowercased, trimmed free-text search; empty means no filter
    pub search: String,
    /// Lowercased, trimmed source filter; empty means no filter
    pub source: String,
    pub max_results: usize,
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            source: String::new(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl NewsQuery {
    pub fn from_params(search: Option<&str>, source: Option<&str>, max: Option<&str>) -> Self {
        Self {
            search: fold(search),
            source: fold(source),
            max_results: parse_max(max),
        }
    }
}

fn fold(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_lowercase()).unwrap_or_default()
}

/// Parse the `max` parameter.
///
/// Missing, non-numeric and zero values give the default; anything else is
/// clamped into `1..=200` and truncated.
pub fn parse_max(raw: Option<&str>) -> usize {
    let value = match raw.map(str::trim) {
        Some("") | None => return DEFAULT_MAX_RESULTS,
        Some(text) => match text.parse::<f64>() {
            Ok(v) if !v.is_nan() && v != 0.0 => v,
            _ => return DEFAULT_MAX_RESULTS,
        },
    };
    value.clamp(1.0, MAX_RESULTS_CEILING as f64) as usize
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Number of matches before the result cap was applied
    pub total: usize,
    pub articles: Vec<Article>,
}

pub fn query(articles: &[Article], params: &NewsQuery) -> QueryResult {
    let matches: Vec<&Article> = articles
        .iter()
        .filter(|a| params.search.is_empty() || matches_search(a, &params.search))
        .filter(|a| params.source.is_empty() || a.source.to_lowercase().contains(&params.source))
        .collect();

    QueryResult {
        total: matches.len(),
        articles: matches
            .into_iter()
            .take(params.max_results)
            .cloned()
            .collect(),
    }
}

fn matches_search(article: &Article, needle: &str) -> bool {
    format!(
        "{} {} {}",
        article.title, article.description, article.source
    )
    .to_lowercase()
    .contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn article(title: &str, description: &str, source: &str, age_minutes: i64) -> Article {
        Article {
            id: title.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            url: format!("https://example.com/{}", title.replace(' ', "-")),
            source: source.to_string(),
            published_at: Utc::now() - Duration::minutes(age_minutes),
            image: None,
        }
    }

    fn sample() -> Vec<Article> {
        vec![
            article("Election results", "Votes counted overnight", "BBC News", 1),
            article("Markets rally", "Stocks climb", "CNN", 2),
            article("Storm warning", "Rain expected in the north", "BBC News", 3),
        ]
    }

    mod parse_max_tests {
        use super::*;

        #[test]
        fn test_missing_uses_default() {
            assert_eq!(parse_max(None), 20);
            assert_eq!(parse_max(Some("")), 20);
            assert_eq!(parse_max(Some("   ")), 20);
        }

        #[test]
        fn test_non_numeric_uses_default() {
            assert_eq!(parse_max(Some("abc")), 20);
            assert_eq!(parse_max(Some("NaN")), 20);
        }

        #[test]
        fn test_zero_uses_default() {
            assert_eq!(parse_max(Some("0")), 20);
        }

        #[test]
        fn test_clamped() {
            assert_eq!(parse_max(Some("500")), 200);
            assert_eq!(parse_max(Some("-5")), 1);
            assert_eq!(parse_max(Some("inf")), 200);
        }

        #[test]
        fn test_in_range() {
            assert_eq!(parse_max(Some("5")), 5);
            assert_eq!(parse_max(Some(" 7 ")), 7);
            assert_eq!(parse_max(Some("2.9")), 2);
        }
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn test_no_filters_returns_everything() {
            let result = query(&sample(), &NewsQuery::default());
            assert_eq!(result.total, 3);
            assert_eq!(result.articles.len(), 3);
        }

        #[test]
        fn test_search_matches_source() {
            let articles = vec![
                article("One", "", "BBC News", 1),
                article("Two", "", "CNN", 2),
            ];
            let params = NewsQuery::from_params(Some("bbc"), None, None);

            let result = query(&articles, &params);
            assert_eq!(result.total, 1);
            assert_eq!(result.articles[0].source, "BBC News");
        }

        #[test]
        fn test_search_is_case_insensitive_and_trimmed() {
            let params = NewsQuery::from_params(Some("  RAIN "), None, None);
            let result = query(&sample(), &params);

            assert_eq!(result.total, 1);
            assert_eq!(result.articles[0].title, "Storm warning");
        }

        #[test]
        fn test_search_spans_title_and_description() {
            let params = NewsQuery::from_params(Some("results votes"), None, None);
            let result = query(&sample(), &params);

            assert_eq!(result.total, 0);

            let params = NewsQuery::from_params(Some("results"), None, None);
            assert_eq!(query(&sample(), &params).total, 1);

            let params = NewsQuery::from_params(Some("climb"), None, None);
            assert_eq!(query(&sample(), &params).total, 1);
        }

        #[test]
        fn test_source_filter() {
            let params = NewsQuery::from_params(None, Some("bbc"), None);
            let result = query(&sample(), &params);

            assert_eq!(result.total, 2);
            assert!(result.articles.iter().all(|a| a.source == "BBC News"));
        }

        #[test]
        fn test_filters_are_conjunctive() {
            let params = NewsQuery::from_params(Some("storm"), Some("cnn"), None);
            assert_eq!(query(&sample(), &params).total, 0);

            let params = NewsQuery::from_params(Some("storm"), Some("bbc"), None);
            assert_eq!(query(&sample(), &params).total, 1);
        }

        #[test]
        fn test_total_counts_before_cap() {
            let params = NewsQuery::from_params(None, None, Some("1"));
            let result = query(&sample(), &params);

            assert_eq!(result.total, 3);
            assert_eq!(result.articles.len(), 1);
            assert_eq!(result.articles[0].title, "Election results");
        }

        #[test]
        fn test_input_untouched() {
            let articles = sample();
            let params = NewsQuery::from_params(Some("storm"), None, Some("1"));
            let _ = query(&articles, &params);

            assert_eq!(articles.len(), 3);
        }
    }
}

//! Newswire - a polling news aggregator
//!
//! Fetches a fixed list of syndication feeds on an interval, merges their
//! entries into one deduplicated, newest-first article list, and serves it
//! through a small JSON API.

pub mod article;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod merge;
pub mod query;
pub mod routes;
pub mod scheduler;

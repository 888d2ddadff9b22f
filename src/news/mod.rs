//! Client for the upstream school news service.
//!
//! The upstream scrapes the school website and serves a JSON array of
//! [`NewsItem`]s. This side only fetches and relays it; caching and fallback
//! live in the HTTP handler.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::StatusCode;

use crate::models::news::NewsItem;

const MAX_NEWS_ITEMS: usize = 200;

pub enum NewsFetch {
    Fresh(Vec<NewsItem>),
    /// Upstream answered with a non-success status.
    Unavailable(StatusCode),
}

#[derive(Clone)]
pub struct NewsClient {
    inner: reqwest::Client,
    upstream_url: String,
    timeout: Duration,
}

impl NewsClient {
    pub fn new(upstream_url: &str, timeout: Duration) -> Result<Self> {
        assert!(!upstream_url.is_empty(), "News upstream must be provided");
        assert!(
            timeout >= Duration::from_millis(100),
            "Timeout below 100ms is unsafe"
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .with_context(|| format!("Failed to build news client for {upstream_url}"))?;

        Ok(Self {
            inner: client,
            upstream_url: upstream_url.to_string(),
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn fetch_latest(&self) -> Result<NewsFetch> {
        let response = self
            .inner
            .get(&self.upstream_url)
            .send()
            .await
            .with_context(|| format!("News request to {} failed", self.upstream_url))?;

        let status = response.status();
        if !status.is_success() {
            return Ok(NewsFetch::Unavailable(status));
        }

        let mut items: Vec<NewsItem> = response
            .json()
            .await
            .context("News upstream returned malformed JSON")?;
        items.truncate(MAX_NEWS_ITEMS);
        Ok(NewsFetch::Fresh(items))
    }
}

/// Placeholder items served while the upstream is reachable but unhealthy.
pub fn demo_news() -> Vec<NewsItem> {
    let today = Utc::now().to_rfc3339();
    vec![
        NewsItem {
            id: "news_1".to_string(),
            title: "Open day".to_string(),
            excerpt: "Everyone is welcome at the school open day".to_string(),
            content: "Full story coming soon.".to_string(),
            date: today.clone(),
            category: "Events".to_string(),
        },
        NewsItem {
            id: "news_2".to_string(),
            title: "New achievements".to_string(),
            excerpt: "Our students won the regional olympiad".to_string(),
            content: "Full story coming soon.".to_string(),
            date: today,
            category: "Achievements".to_string(),
        },
    ]
}

use std::sync::Arc;
use std::time::Instant;

use moka::future::Cache;
use sea_orm::DatabaseConnection;

use crate::config::NewsConfig;
use crate::models::news::NewsItem;
use crate::news::NewsClient;

/// Shared handles injected into every request. Built once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub database: DatabaseConnection,
    pub cache: Arc<ApiCache>,
    pub news: NewsClient,
    pub start_time: Instant,
    pub allow_reset: bool,
}

impl AppState {
    pub fn new(
        database: DatabaseConnection,
        cache: Arc<ApiCache>,
        news: NewsClient,
        allow_reset: bool,
    ) -> Self {
        Self {
            database,
            cache,
            news,
            start_time: Instant::now(),
            allow_reset,
        }
    }
}

pub struct ApiCache {
    pub news: Cache<&'static str, Arc<Vec<NewsItem>>>,
}

impl ApiCache {
    pub fn new(config: &NewsConfig) -> Self {
        let ttl = config.cache_ttl();
        assert!(ttl.as_secs() <= 86_400, "News cache TTL cannot exceed one day");

        let news = Cache::builder()
            .max_capacity(config.max_capacity())
            .time_to_live(ttl)
            .build();

        Self { news }
    }
}

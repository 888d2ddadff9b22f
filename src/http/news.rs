use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{debug, warn};

use crate::models::news::NewsItem;
use crate::news::{NewsFetch, demo_news};
use crate::state::AppState;

const NEWS_CACHE_KEY: &str = "latest";

pub fn router() -> Router<AppState> {
    Router::new().route("/news", get(get_news))
}

/// Never fails. Fresh upstream items are cached; demo items are served while
/// the upstream reports an error status, and an empty list when it cannot be
/// reached at all.
async fn get_news(State(state): State<AppState>) -> Json<Vec<NewsItem>> {
    if let Some(cached) = state.cache.news.get(&NEWS_CACHE_KEY).await {
        debug!(items = cached.len(), "Serving news from cache");
        return Json(cached.as_ref().clone());
    }

    let items = match state.news.fetch_latest().await {
        Ok(NewsFetch::Fresh(items)) => {
            state
                .cache
                .news
                .insert(NEWS_CACHE_KEY, Arc::new(items.clone()))
                .await;
            items
        }
        Ok(NewsFetch::Unavailable(status)) => {
            warn!(status = status.as_u16(), "News upstream unavailable, serving demo items");
            demo_news()
        }
        Err(err) => {
            warn!("News upstream unreachable: {err:#}");
            Vec::new()
        }
    };

    Json(items)
}

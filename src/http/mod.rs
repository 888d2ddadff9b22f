use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::StoreError;
use crate::state::AppState;

mod admin;
mod comments;
mod ideas;
mod news;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .merge(ideas::router())
        .merge(comments::router())
        .merge(news::router())
        .merge(admin::router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, HttpError> {
    state.database.ping().await.map_err(|err| {
        error!("Database ping failed: {err}");
        HttpError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Database unavailable".to_string(),
        )
    })?;

    let uptime = state.start_time.elapsed().as_secs();
    let news_timeout_ms = u64::try_from(state.news.timeout().as_millis()).unwrap_or(u64::MAX);

    let response = HealthResponse {
        status: "healthy",
        database: "connected",
        uptime_seconds: uptime,
        timestamp: Utc::now(),
        news_timeout_ms,
        cache_entries: CacheSummary {
            news: state.cache.news.entry_count(),
        },
    };
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    uptime_seconds: u64,
    timestamp: DateTime<Utc>,
    news_timeout_ms: u64,
    cache_entries: CacheSummary,
}

#[derive(Debug, Serialize)]
struct CacheSummary {
    news: u64,
}

/// Path ids that are not positive integers cannot name an idea.
fn parse_idea_id(raw: &str) -> Result<i32, HttpError> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(HttpError::new(
            StatusCode::NOT_FOUND,
            format!("Idea {raw} not found"),
        )),
    }
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: String) -> Self {
        assert!(status != StatusCode::OK, "Error status cannot be 200");
        assert!(!message.is_empty(), "Error message cannot be empty");
        Self { status, message }
    }
}

impl From<StoreError> for HttpError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(message) => Self::new(StatusCode::BAD_REQUEST, message),
            StoreError::DuplicateVote { .. } => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            StoreError::IdeaNotFound(_) => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            StoreError::Database(db_err) => {
                error!("Store failure: {db_err}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        info!(status = self.status.as_u16(), "HTTP error: {}", self.message);
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

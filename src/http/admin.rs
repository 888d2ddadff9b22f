use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::delete;
use axum::{Json, Router};
use serde::Serialize;

use crate::models::idea::StatsView;
use crate::state::AppState;
use crate::store;

use super::HttpError;

pub fn router() -> Router<AppState> {
    Router::new().route("/admin/clear", delete(clear_database))
}

#[derive(Debug, Serialize)]
struct ClearResponse {
    success: bool,
    removed: StatsView,
}

async fn clear_database(State(state): State<AppState>) -> Result<Json<ClearResponse>, HttpError> {
    if !state.allow_reset {
        return Err(HttpError::new(
            StatusCode::FORBIDDEN,
            "Reset is disabled".to_string(),
        ));
    }

    let removed = store::clear_all(&state.database).await?;
    Ok(Json(ClearResponse {
        success: true,
        removed,
    }))
}

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::warn;

use crate::models::comment::{CommentCreateRequest, CommentCreateResponse, CommentView};
use crate::state::AppState;
use crate::store::comments;

use super::{HttpError, parse_idea_id};

const MAX_THREAD_LEN: usize = 1_000;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/ideas/{idea_id}/comments",
        get(list_comments).post(add_comment),
    )
}

async fn add_comment(
    Path(idea_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<CommentCreateRequest>,
) -> Result<Json<CommentCreateResponse>, HttpError> {
    let idea_id = parse_idea_id(&idea_id)?;
    let id = comments::add_comment(
        &state.database,
        idea_id,
        payload.author.as_deref(),
        &payload.text,
    )
    .await?;

    Ok(Json(CommentCreateResponse {
        success: true,
        id,
        message: "Comment added".to_string(),
    }))
}

/// Unknown ideas have an empty thread rather than a 404.
async fn list_comments(
    Path(idea_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CommentView>>, HttpError> {
    let idea_id = parse_idea_id(&idea_id)?;
    let thread = comments::list_comments(&state.database, idea_id).await?;
    if thread.len() > MAX_THREAD_LEN {
        warn!(idea_id, len = thread.len(), "Unusually long comment thread");
    }

    Ok(Json(thread.into_iter().map(CommentView::from).collect()))
}

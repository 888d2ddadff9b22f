use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;

use crate::entities::comment;
use crate::entities::prelude::*;
use crate::error::StoreResult;
use crate::validation::{canonicalize_author, canonicalize_comment_text};

use super::{fixed_now, ideas, reference_error};

/// Validates the comment before touching the store, then appends it to the
/// idea's thread.
pub async fn add_comment<C: ConnectionTrait>(
    conn: &C,
    idea_id: i32,
    author: Option<&str>,
    text: &str,
) -> StoreResult<i32> {
    let text = canonicalize_comment_text(text)?;
    let author = canonicalize_author(author)?;
    ideas::ensure_exists(conn, idea_id).await?;

    let model = comment::ActiveModel {
        id: NotSet,
        idea_id: Set(idea_id),
        author: Set(author),
        text: Set(text),
        created_at: Set(fixed_now()),
    };

    let inserted = Comment::insert(model)
        .exec(conn)
        .await
        .map_err(|err| reference_error(err, idea_id))?;
    info!(idea_id, comment_id = inserted.last_insert_id, "Comment added");
    Ok(inserted.last_insert_id)
}

/// Chronological thread for an idea, oldest first.
pub async fn list_comments<C: ConnectionTrait>(
    conn: &C,
    idea_id: i32,
) -> StoreResult<Vec<comment::Model>> {
    let thread = Comment::find()
        .filter(comment::Column::IdeaId.eq(idea_id))
        .order_by_asc(comment::Column::CreatedAt)
        .order_by_asc(comment::Column::Id)
        .all(conn)
        .await?;
    Ok(thread)
}

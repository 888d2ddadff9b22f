use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};
use tracing::info;

use crate::entities::idea;
use crate::entities::prelude::*;
use crate::entities::sea_orm_active_enums::IdeaStatus;
use crate::error::{StoreError, StoreResult};
use crate::models::idea::IdeaView;
use crate::validation::{canonicalize_author, canonicalize_description, canonicalize_title};

use super::{aggregation, fixed_now};

/// Validates and persists a new idea in the `pending` state with a zero tally.
pub async fn create_idea<C: ConnectionTrait>(
    conn: &C,
    title: &str,
    description: &str,
    author: Option<&str>,
) -> StoreResult<i32> {
    let title = canonicalize_title(title)?;
    let description = canonicalize_description(description)?;
    let author = canonicalize_author(author)?;

    let model = idea::ActiveModel {
        id: NotSet,
        title: Set(title),
        description: Set(description),
        author: Set(author),
        votes: Set(0),
        status: Set(IdeaStatus::Pending),
        created_at: Set(fixed_now()),
    };

    let inserted = Idea::insert(model).exec(conn).await?;
    info!(idea_id = inserted.last_insert_id, "Idea submitted");
    Ok(inserted.last_insert_id)
}

pub async fn get_idea<C: ConnectionTrait>(conn: &C, idea_id: i32) -> StoreResult<idea::Model> {
    Idea::find_by_id(idea_id)
        .one(conn)
        .await?
        .ok_or(StoreError::IdeaNotFound(idea_id))
}

pub async fn list_ideas_with_counts<C: ConnectionTrait>(conn: &C) -> StoreResult<Vec<IdeaView>> {
    aggregation::list_ideas_with_counts(conn).await
}

pub(crate) async fn ensure_exists<C: ConnectionTrait>(conn: &C, idea_id: i32) -> StoreResult<()> {
    let found = Idea::find_by_id(idea_id)
        .select_only()
        .column(idea::Column::Id)
        .into_tuple::<i32>()
        .one(conn)
        .await?;
    match found {
        Some(_) => Ok(()),
        None => Err(StoreError::IdeaNotFound(idea_id)),
    }
}

/// `votes = votes + 1` in a single statement. Only the vote transaction calls
/// this.
pub(super) async fn increment_vote_counter<C: ConnectionTrait>(
    conn: &C,
    idea_id: i32,
) -> StoreResult<()> {
    let updated = Idea::update_many()
        .col_expr(idea::Column::Votes, Expr::col(idea::Column::Votes).add(1))
        .filter(idea::Column::Id.eq(idea_id))
        .exec(conn)
        .await?;

    assert!(
        updated.rows_affected <= 1,
        "Counter update touched more than one idea"
    );
    if updated.rows_affected == 0 {
        return Err(StoreError::IdeaNotFound(idea_id));
    }
    Ok(())
}

//! Read side: ideas joined with live ledger and comment counts.
//!
//! Counts come from correlated `COUNT(*)` subqueries in the same statement
//! as the idea rows. A double `LEFT JOIN` would multiply vote rows by
//! comment rows, and a single statement reads one snapshot.

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Asterisk, Expr, Func, Query, SimpleExpr, SubQueryStatement};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryOrder,
    QuerySelect,
};
use tracing::warn;

use crate::entities::prelude::*;
use crate::entities::sea_orm_active_enums::IdeaStatus;
use crate::entities::{comment, idea, vote};
use crate::error::StoreResult;
use crate::models::idea::{IdeaView, StatsView};

#[derive(Debug, FromQueryResult)]
struct IdeaCountsRow {
    id: i32,
    title: String,
    description: String,
    author: String,
    votes: i64,
    status: IdeaStatus,
    created_at: DateTimeWithTimeZone,
    vote_count: i64,
    comment_count: i64,
}

impl From<IdeaCountsRow> for IdeaView {
    fn from(row: IdeaCountsRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            author: row.author,
            votes: row.votes,
            status: row.status,
            created_at: row.created_at.with_timezone(&Utc),
            vote_count: row.vote_count,
            comment_count: row.comment_count,
        }
    }
}

/// Most-voted first, newest first among equal tallies.
pub async fn list_ideas_with_counts<C: ConnectionTrait>(conn: &C) -> StoreResult<Vec<IdeaView>> {
    let rows = Idea::find()
        .column_as(
            count_referencing(Vote, vote::Column::IdeaId),
            "vote_count",
        )
        .column_as(
            count_referencing(Comment, comment::Column::IdeaId),
            "comment_count",
        )
        .order_by_desc(idea::Column::Votes)
        .order_by_desc(idea::Column::CreatedAt)
        .order_by_desc(idea::Column::Id)
        .into_model::<IdeaCountsRow>()
        .all(conn)
        .await?;

    for row in rows.iter().filter(|row| row.votes != row.vote_count) {
        warn!(
            idea_id = row.id,
            counter = row.votes,
            ledger = row.vote_count,
            "Vote counter drifted from ledger"
        );
    }

    Ok(rows.into_iter().map(IdeaView::from).collect())
}

pub async fn stats<C: ConnectionTrait>(conn: &C) -> StoreResult<StatsView> {
    let ideas = Idea::find().count(conn).await?;
    let comments = Comment::find().count(conn).await?;
    let votes = Vote::find().count(conn).await?;
    Ok(StatsView {
        ideas,
        comments,
        votes,
    })
}

/// `(SELECT COUNT(*) FROM <entity> WHERE <entity>.<idea_column> = ideas.id)`
fn count_referencing<E, C>(entity: E, idea_column: C) -> SimpleExpr
where
    E: EntityTrait,
    C: ColumnTrait,
{
    let subquery = Query::select()
        .expr(Func::count(Expr::col(Asterisk)))
        .from(entity)
        .and_where(Expr::col((entity, idea_column)).equals((Idea, idea::Column::Id)))
        .to_owned();
    SimpleExpr::SubQuery(None, Box::new(SubQueryStatement::SelectStatement(subquery)))
}

//! Vote ledger: one row per (idea, voter).
//!
//! Duplicate detection is delegated to the unique index on
//! `(idea_id, voter_ip)`. [`has_voted`] is informational only and must not
//! gate an insert, since two requests can both observe "not voted" before
//! either commits.

use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, SqlErr};
use tracing::debug;

use crate::entities::prelude::*;
use crate::entities::vote;
use crate::error::{StoreError, StoreResult};
use crate::identity::VoterIdentity;

use super::{fixed_now, reference_error};

pub async fn has_voted<C: ConnectionTrait>(
    conn: &C,
    idea_id: i32,
    voter: &VoterIdentity,
) -> StoreResult<bool> {
    let matches = Vote::find()
        .filter(vote::Column::IdeaId.eq(idea_id))
        .filter(vote::Column::VoterIp.eq(voter.as_str()))
        .count(conn)
        .await?;
    assert!(matches <= 1, "Unique index allows at most one vote per pair");
    Ok(matches == 1)
}

/// Appends a ledger row and returns its id.
///
/// Fails with [`StoreError::DuplicateVote`] when the unique index rejects the
/// row and [`StoreError::IdeaNotFound`] when the foreign key does.
pub async fn record_vote<C: ConnectionTrait>(
    conn: &C,
    idea_id: i32,
    voter: &VoterIdentity,
) -> StoreResult<i32> {
    let model = vote::ActiveModel {
        id: NotSet,
        idea_id: Set(idea_id),
        voter_ip: Set(voter.as_str().to_owned()),
        created_at: Set(fixed_now()),
    };

    match Vote::insert(model).exec(conn).await {
        Ok(inserted) => Ok(inserted.last_insert_id),
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                debug!(idea_id, voter = %voter, detail = %detail, "Duplicate vote rejected by ledger");
                Err(StoreError::DuplicateVote { idea_id })
            }
            _ => Err(reference_error(err, idea_id)),
        },
    }
}

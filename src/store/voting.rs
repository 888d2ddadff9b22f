//! Casting a vote as one atomic unit.
//!
//! The ledger insert and the counter increment share a transaction. The
//! transaction handle rolls back when dropped uncommitted, so every early
//! return below (missing idea, duplicate vote, database failure, or a caller
//! that stops polling) leaves both the ledger and the counter untouched.
//!
//! The ledger insert is the first statement so the transaction takes the write
//! lock up front. On SQLite a deferred transaction that reads first and writes
//! later fails with `SQLITE_BUSY` instead of waiting when another writer is
//! active. Idea existence is checked by the insert's foreign key.

use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::info;

use crate::error::StoreResult;
use crate::identity::VoterIdentity;
use crate::models::idea::VoteReceipt;

use super::{ideas, ledger};

/// The only path that increments an idea's vote counter.
pub async fn cast_vote(
    db: &DatabaseConnection,
    idea_id: i32,
    voter: &VoterIdentity,
) -> StoreResult<VoteReceipt> {
    let txn = db.begin().await?;

    let vote_id = ledger::record_vote(&txn, idea_id, voter).await?;
    ideas::increment_vote_counter(&txn, idea_id).await?;

    txn.commit().await?;
    info!(idea_id, vote_id, voter = %voter, "Vote accepted");
    Ok(VoteReceipt { accepted: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::prelude::*;
    use crate::error::StoreError;
    use crate::store::ideas::{create_idea, get_idea};
    use crate::store::testing::{file_database, memory_database};
    use sea_orm::{EntityTrait, PaginatorTrait};
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Arc;
    use tokio::sync::Barrier;

    fn voter(last: u8) -> VoterIdentity {
        VoterIdentity::from_ip(IpAddr::V4(Ipv4Addr::new(203, 0, 113, last)))
    }

    #[tokio::test]
    async fn accepted_vote_bumps_counter_and_ledger() {
        let db = memory_database().await;
        let idea_id = create_idea(&db, "Chess club", "Weekly chess club on Fridays", None)
            .await
            .unwrap();

        let receipt = cast_vote(&db, idea_id, &voter(1)).await.unwrap();
        assert!(receipt.accepted);
        assert_eq!(get_idea(&db, idea_id).await.unwrap().votes, 1);
        assert!(ledger::has_voted(&db, idea_id, &voter(1)).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_vote_leaves_counter_unchanged() {
        let db = memory_database().await;
        let idea_id = create_idea(&db, "Chess club", "Weekly chess club on Fridays", None)
            .await
            .unwrap();

        cast_vote(&db, idea_id, &voter(1)).await.unwrap();
        let second = cast_vote(&db, idea_id, &voter(1)).await;
        assert!(matches!(second, Err(StoreError::DuplicateVote { .. })));

        assert_eq!(get_idea(&db, idea_id).await.unwrap().votes, 1);
        assert_eq!(Vote::find().count(&db).await.unwrap(), 1);

        // The connection is usable again after the rolled back attempt
        cast_vote(&db, idea_id, &voter(2)).await.unwrap();
        assert_eq!(get_idea(&db, idea_id).await.unwrap().votes, 2);
    }

    #[tokio::test]
    async fn vote_for_missing_idea_writes_nothing() {
        let db = memory_database().await;
        let outcome = cast_vote(&db, 9_999, &voter(1)).await;
        assert!(matches!(outcome, Err(StoreError::IdeaNotFound(9_999))));
        assert_eq!(Vote::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn uncommitted_ledger_insert_is_rolled_back_on_drop() {
        let db = memory_database().await;
        let idea_id = create_idea(&db, "Chess club", "Weekly chess club on Fridays", None)
            .await
            .unwrap();

        {
            let txn = db.begin().await.unwrap();
            ledger::record_vote(&txn, idea_id, &voter(1)).await.unwrap();
        }

        assert!(!ledger::has_voted(&db, idea_id, &voter(1)).await.unwrap());
        assert_eq!(get_idea(&db, idea_id).await.unwrap().votes, 0);
    }

    /// Runs one `cast_vote` per voter on its own task, all released together.
    async fn cast_concurrently(
        db: &DatabaseConnection,
        idea_id: i32,
        voters: Vec<VoterIdentity>,
    ) -> Vec<StoreResult<VoteReceipt>> {
        let start = Arc::new(Barrier::new(voters.len()));
        let handles = voters
            .into_iter()
            .map(|voter| {
                let db = db.clone();
                let start = Arc::clone(&start);
                tokio::spawn(async move {
                    start.wait().await;
                    cast_vote(&db, idea_id, &voter).await
                })
            })
            .collect::<Vec<_>>();

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            outcomes.push(handle.await.expect("vote task completes"));
        }
        outcomes
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_votes_from_one_voter_accept_exactly_once() {
        const ATTEMPTS: usize = 8;

        let file = file_database(ATTEMPTS as u32).await;
        let db = &file.db;
        let idea_id = create_idea(db, "Chess club", "Weekly chess club on Fridays", None)
            .await
            .unwrap();

        let outcomes = cast_concurrently(db, idea_id, vec![voter(7); ATTEMPTS]).await;

        let mut accepted = 0;
        let mut duplicates = 0;
        for outcome in outcomes {
            match outcome {
                Ok(receipt) => {
                    assert!(receipt.accepted);
                    accepted += 1;
                }
                Err(StoreError::DuplicateVote { idea_id: id }) => {
                    assert_eq!(id, idea_id);
                    duplicates += 1;
                }
                Err(other) => panic!("unexpected vote failure: {other}"),
            }
        }

        assert_eq!(accepted, 1);
        assert_eq!(duplicates, ATTEMPTS - 1);
        assert_eq!(get_idea(db, idea_id).await.unwrap().votes, 1);
        assert_eq!(Vote::find().count(db).await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_votes_from_distinct_voters_all_count() {
        const VOTERS: u8 = 8;

        let file = file_database(u32::from(VOTERS)).await;
        let db = &file.db;
        let idea_id = create_idea(db, "Chess club", "Weekly chess club on Fridays", None)
            .await
            .unwrap();

        let outcomes = cast_concurrently(db, idea_id, (1..=VOTERS).map(voter).collect()).await;
        for outcome in outcomes {
            assert!(outcome.unwrap().accepted);
        }

        assert_eq!(get_idea(db, idea_id).await.unwrap().votes, i64::from(VOTERS));
        assert_eq!(Vote::find().count(db).await.unwrap(), u64::from(VOTERS));
    }
}

//! Persistence for ideas, the vote ledger and comments.
//!
//! Every operation takes a sea-orm connection (`DatabaseConnection` or a
//! `DatabaseTransaction`), so the same code runs against PostgreSQL in
//! production and SQLite in tests.

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, SqlErr, TransactionTrait};
use tracing::warn;

use crate::entities::prelude::*;
use crate::error::{StoreError, StoreResult};
use crate::models::idea::StatsView;

pub mod aggregation;
pub mod comments;
pub mod ideas;
pub mod ledger;
pub mod voting;

/// Deletes every vote, comment and idea in one transaction. Returns the number
/// of rows removed per table.
pub async fn clear_all(db: &DatabaseConnection) -> StoreResult<StatsView> {
    let txn = db.begin().await?;
    let votes = Vote::delete_many().exec(&txn).await?.rows_affected;
    let comments = Comment::delete_many().exec(&txn).await?.rows_affected;
    let ideas = Idea::delete_many().exec(&txn).await?.rows_affected;
    txn.commit().await?;

    warn!(ideas, comments, votes, "Idea store cleared");
    Ok(StatsView {
        ideas,
        comments,
        votes,
    })
}

pub(crate) fn fixed_now() -> DateTimeWithTimeZone {
    Utc::now().fixed_offset()
}

/// A foreign key failure on a row that references an idea means the idea does
/// not exist. Anything else stays a database error.
pub(crate) fn reference_error(err: DbErr, idea_id: i32) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => StoreError::IdeaNotFound(idea_id),
        _ => StoreError::Database(err),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database, DatabaseConnection};

    /// Fresh in-memory SQLite database with migrations applied. A single
    /// pooled connection keeps every caller on the same in-memory instance.
    pub(crate) async fn memory_database() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let database = Database::connect(options)
            .await
            .expect("in-memory sqlite connects");
        Migrator::up(&database, None)
            .await
            .expect("migrations apply");
        database
    }

    /// SQLite database in a temporary file, shared by a pool of several
    /// connections so transactions genuinely overlap. The file is removed on
    /// drop.
    pub(crate) struct FileDatabase {
        pub(crate) db: DatabaseConnection,
        path: PathBuf,
    }

    impl Drop for FileDatabase {
        fn drop(&mut self) {
            remove_database_files(&self.path);
        }
    }

    pub(crate) async fn file_database(max_connections: u32) -> FileDatabase {
        static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

        let path = std::env::temp_dir().join(format!(
            "idea-hub-test-{}-{}.db",
            std::process::id(),
            NEXT_ID.fetch_add(1, Ordering::Relaxed)
        ));
        remove_database_files(&path);

        let mut options = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
        options
            .max_connections(max_connections)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options)
            .await
            .expect("file sqlite connects");
        Migrator::up(&db, None).await.expect("migrations apply");
        FileDatabase { db, path }
    }

    fn remove_database_files(path: &PathBuf) {
        for suffix in ["", "-journal", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::memory_database;
    use super::*;
    use crate::identity::VoterIdentity;
    use std::net::{IpAddr, Ipv4Addr};

    #[tokio::test]
    async fn clear_all_removes_every_row() {
        let db = memory_database().await;
        let idea_id = ideas::create_idea(&db, "Solar panels", "Put panels on the gym roof", None)
            .await
            .unwrap();
        let voter = VoterIdentity::from_ip(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)));
        voting::cast_vote(&db, idea_id, &voter).await.unwrap();
        comments::add_comment(&db, idea_id, None, "Great idea")
            .await
            .unwrap();

        let removed = clear_all(&db).await.unwrap();
        assert_eq!(
            removed,
            StatsView {
                ideas: 1,
                comments: 1,
                votes: 1
            }
        );

        let stats = aggregation::stats(&db).await.unwrap();
        assert_eq!(
            stats,
            StatsView {
                ideas: 0,
                comments: 0,
                votes: 0
            }
        );
    }
}

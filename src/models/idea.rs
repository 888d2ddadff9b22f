use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::idea;
use crate::entities::sea_orm_active_enums::IdeaStatus;

/// Idea with live ledger and comment counts, as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub author: String,
    pub votes: i64,
    pub status: IdeaStatus,
    pub created_at: DateTime<Utc>,
    pub vote_count: i64,
    pub comment_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaRecord {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub author: String,
    pub votes: i64,
    pub status: IdeaStatus,
    pub created_at: DateTime<Utc>,
}

impl From<idea::Model> for IdeaRecord {
    fn from(model: idea::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            author: model.author,
            votes: model.votes,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsView {
    pub ideas: u64,
    pub comments: u64,
    pub votes: u64,
}

// Request/Response types for the ideas HTTP API

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdeaCreateRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaCreateResponse {
    pub success: bool,
    pub id: i32,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub accepted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSubmissionResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteStatusView {
    pub idea_id: i32,
    pub has_voted: bool,
}

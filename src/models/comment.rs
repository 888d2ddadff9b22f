use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::comment;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i32,
    pub idea_id: i32,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<comment::Model> for CommentView {
    fn from(model: comment::Model) -> Self {
        Self {
            id: model.id,
            idea_id: model.idea_id,
            author: model.author,
            text: model.text,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommentCreateRequest {
    pub author: Option<String>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentCreateResponse {
    pub success: bool,
    pub id: i32,
    pub message: String,
}

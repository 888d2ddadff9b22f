use serde::{Deserialize, Serialize};

/// News entry as published by the upstream school news service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    pub date: String,
    #[serde(default)]
    pub category: String,
}

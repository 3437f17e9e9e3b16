//! Feedback Model

use serde::{Deserialize, Serialize};

/// Free-form employee feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Feedback {
    pub id: i64,
    pub category: Option<String>,
    /// 1-5
    pub rating: Option<i64>,
    pub message: String,
    pub created_at: i64,
}

/// Submit feedback payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackCreate {
    pub category: Option<String>,
    pub rating: Option<i64>,
    #[serde(default)]
    pub message: String,
}

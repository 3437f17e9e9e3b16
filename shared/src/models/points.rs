//! Reward Points Models

use serde::{Deserialize, Serialize};

/// Materialized point balance of one employee
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserPoint {
    pub employee_id: String,
    pub points: i64,
    pub updated_at: i64,
}

/// Append-only ledger row, one per balance mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PointHistory {
    pub id: i64,
    pub employee_id: String,
    /// Signed change (positive = credit)
    pub change: i64,
    pub reason: String,
    pub created_at: i64,
}

/// Points lookup response
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointsBalance {
    pub points: i64,
}

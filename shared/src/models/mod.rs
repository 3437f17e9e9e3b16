//! Data models
//!
//! Shared between canteen-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! JSON bodies are camelCase.

pub mod admin;
pub mod feedback;
pub mod meal_entry;
pub mod payment;
pub mod points;
pub mod report;

// Re-exports
pub use admin::*;
pub use feedback::*;
pub use meal_entry::*;
pub use payment::*;
pub use points::*;
pub use report::*;

//! Booking rules engine
//!
//! Pure functions only: no database, no clock. Services feed in the stored
//! state and the current instant and persist whatever these rules produce.

pub mod plan;
pub mod pricing;
pub mod validation;
pub mod window;

pub use plan::{BatchPlan, PlannedEntry, clamp_points, entry_id, plan_batch};
pub use pricing::{PriceList, to_minor_units};
pub use validation::validate_drafts;
pub use window::BookingWindow;

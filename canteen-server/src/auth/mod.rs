//! Admin authentication and request guards

pub mod admin_auth;
pub mod rate_limit;

pub use admin_auth::{AdminAuthenticator, AdminIdentity, Credentials, Session};
pub use rate_limit::RateLimiter;

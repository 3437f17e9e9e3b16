//! Application state

use sqlx::SqlitePool;

use crate::auth::{AdminAuthenticator, RateLimiter};
use crate::booking::{BookingWindow, PriceList};
use crate::config::Config;
use crate::razorpay::RazorpayClient;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool (sole source of truth)
    pub pool: SqlitePool,
    pub prices: PriceList,
    pub window: BookingWindow,
    pub razorpay: RazorpayClient,
    pub admin_auth: AdminAuthenticator,
    /// Rate limiter for the admin login route
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Connect to the database, apply migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = crate::db::connect(&config.database_url).await?;
        Ok(Self::with_pool(config, pool))
    }

    /// Build the state around an existing pool
    pub fn with_pool(config: &Config, pool: SqlitePool) -> Self {
        Self {
            pool,
            prices: config.prices(),
            window: config.booking_window(),
            razorpay: RazorpayClient::new(
                &config.razorpay_api_base,
                &config.razorpay_key_id,
                &config.razorpay_key_secret,
            ),
            admin_auth: AdminAuthenticator::new(
                &config.admin_username,
                &config.admin_password_hash,
                &config.jwt_secret,
            ),
            rate_limiter: RateLimiter::new(config.trust_forwarded_for),
        }
    }
}

//! Server configuration

use chrono_tz::Tz;

use crate::booking::{BookingWindow, PriceList};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    /// HTTP listen port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Timezone in which dates and cutoffs are evaluated
    pub business_timezone: Tz,
    /// Same-day booking closes at this local hour
    pub booking_cutoff_hour: u32,
    /// Same-day cancellation closes at this local hour (unset = disabled)
    pub cancellation_cutoff_hour: Option<u32>,
    /// Veg meal price (price units)
    pub veg_price: i64,
    /// Non-veg meal price (price units)
    pub non_veg_price: i64,
    /// Razorpay key id (public, handed to the checkout widget)
    pub razorpay_key_id: String,
    /// Razorpay key secret (API auth + signature verification)
    pub razorpay_key_secret: String,
    /// Razorpay REST base URL
    pub razorpay_api_base: String,
    /// JWT secret for admin sessions
    pub jwt_secret: String,
    /// Admin login name
    pub admin_username: String,
    /// Argon2 PHC hash of the admin password
    pub admin_password_hash: String,
    /// Rate-limit by X-Forwarded-For instead of the peer address
    pub trust_forwarded_for: bool,
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let business_timezone = match std::env::var("BUSINESS_TIMEZONE") {
            Ok(name) => name
                .parse::<Tz>()
                .map_err(|e| format!("Invalid BUSINESS_TIMEZONE '{name}': {e}"))?,
            Err(_) => chrono_tz::Asia::Kolkata,
        };

        let booking_cutoff_hour = env_parse("BOOKING_CUTOFF_HOUR").unwrap_or(9);
        if booking_cutoff_hour > 24 {
            return Err("BOOKING_CUTOFF_HOUR must be between 0 and 24".into());
        }
        let cancellation_cutoff_hour: Option<u32> = env_parse("CANCELLATION_CUTOFF_HOUR");
        if cancellation_cutoff_hour.is_some_and(|h| h > 24) {
            return Err("CANCELLATION_CUTOFF_HOUR must be between 0 and 24".into());
        }

        let defaults = PriceList::default();
        let veg_price = env_parse("VEG_PRICE").unwrap_or(defaults.veg);
        let non_veg_price = env_parse("NON_VEG_PRICE").unwrap_or(defaults.non_veg);
        if veg_price <= 0 || non_veg_price <= 0 {
            return Err("VEG_PRICE and NON_VEG_PRICE must be positive".into());
        }

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:canteen.db".into()),
            http_port: env_parse("HTTP_PORT").unwrap_or(3000),
            environment: environment.clone(),
            business_timezone,
            booking_cutoff_hour,
            cancellation_cutoff_hour,
            veg_price,
            non_veg_price,
            razorpay_key_id: Self::require_secret("RAZORPAY_KEY_ID", &environment)?,
            razorpay_key_secret: Self::require_secret("RAZORPAY_KEY_SECRET", &environment)?,
            razorpay_api_base: std::env::var("RAZORPAY_API_BASE")
                .unwrap_or_else(|_| "https://api.razorpay.com/v1".into()),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password_hash: Self::require_secret("ADMIN_PASSWORD_HASH", &environment)?,
            trust_forwarded_for: env_parse("TRUST_FORWARDED_FOR").unwrap_or(false),
        })
    }

    pub fn prices(&self) -> PriceList {
        PriceList {
            veg: self.veg_price,
            non_veg: self.non_veg_price,
        }
    }

    pub fn booking_window(&self) -> BookingWindow {
        BookingWindow {
            tz: self.business_timezone,
            booking_cutoff_hour: self.booking_cutoff_hour,
            cancellation_cutoff_hour: self.cancellation_cutoff_hour,
        }
    }

    /// Development defaults with the given database, used by tests
    pub fn for_tests(database_url: &str) -> Self {
        Self {
            database_url: database_url.to_string(),
            http_port: 0,
            environment: "development".into(),
            business_timezone: chrono_tz::Asia::Kolkata,
            booking_cutoff_hour: 9,
            cancellation_cutoff_hour: None,
            veg_price: 45,
            non_veg_price: 70,
            razorpay_key_id: "rzp_test_key".into(),
            razorpay_key_secret: "test-razorpay-secret".into(),
            razorpay_api_base: "http://127.0.0.1:9/v1".into(),
            jwt_secret: "test-jwt-secret".into(),
            admin_username: "admin".into(),
            admin_password_hash: String::new(),
            trust_forwarded_for: false,
        }
    }
}

//! canteen-server: corporate meal booking service
//!
//! - Employees book weekday meals, pay by points or through Razorpay
//! - Cancellations refund the meal price as reward points
//! - Canteen staff redeem bookings by QR code from the admin console

pub mod api;
pub mod auth;
pub mod booking;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod razorpay;
pub mod services;
pub mod state;
pub mod util;

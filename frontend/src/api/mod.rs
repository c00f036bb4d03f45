mod auth;
pub mod client;
mod shipments;
pub mod types;

pub use auth::{RefreshError, FORGOT_PASSWORD_PATH, LOGIN_PATH, REGISTER_PATH};
pub use client::*;
pub use shipments::{mark_delivered_path, CARRIER_DASHBOARD_PATH};
pub use types::*;

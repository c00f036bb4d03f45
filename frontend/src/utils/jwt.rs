//! Unverified access-token inspection.
//!
//! The browser never holds the signing key, so claims are only read to decide
//! whether a token is still usable and which role it was issued for. The
//! backend remains the authority on validity.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;
use thiserror::Error;

use crate::api::Role;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccessClaims {
    /// NumericDate; may carry a fractional part.
    pub exp: f64,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("access token is not a three-part JWT")]
    Format,
    #[error("access token payload is not base64url")]
    Encoding,
    #[error("access token claims are unreadable: {0}")]
    Claims(String),
}

impl AccessClaims {
    /// A token expiring within `leeway_secs` counts as expired so it cannot
    /// lapse while the request is in flight.
    pub fn is_expired_at(&self, now: i64, leeway_secs: i64) -> bool {
        self.exp_secs() <= now.saturating_add(leeway_secs)
    }

    /// Whole seconds of `exp`, rounded down.
    pub fn exp_secs(&self) -> i64 {
        self.exp.floor() as i64
    }

    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }
}

pub fn decode_claims(token: &str) -> Result<AccessClaims, TokenError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Format);
    };
    let decoded = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| TokenError::Encoding)?;
    serde_json::from_slice(&decoded).map_err(|e| TokenError::Claims(e.to_string()))
}

use futures::future::{self, Either};
use log::{debug, info};
use reqwest::Client;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

use super::{
    client::{ensure_success, parse_json, ApiClient, RefreshOutcome},
    types::{
        ApiError, ForgotPasswordRequest, LoginRequest, LoginResponse, RefreshRequest,
        RefreshResponse, RegisterRequest,
    },
};
use crate::{
    config,
    state::session::{Session, SessionStore},
    utils::time,
};

pub const LOGIN_PATH: &str = "/auth/login/";
pub const REGISTER_PATH: &str = "/auth/register/";
pub const FORGOT_PASSWORD_PATH: &str = "/auth/forgot-password/";

/// A refresh cycle that could not produce a usable access token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("no refresh token stored")]
    MissingRefreshToken,
    #[error("refresh request failed: {0}")]
    Network(String),
    #[error("refresh rejected with status {0}")]
    Rejected(u16),
    #[error("refresh response unreadable: {0}")]
    Malformed(String),
    #[error("refresh timed out after {0:?}")]
    TimedOut(Duration),
    #[error("session was cleared during refresh")]
    SessionCleared,
    #[error("session was replaced during refresh")]
    Superseded,
    #[error("could not persist refreshed token: {0}")]
    Storage(String),
}

impl RefreshError {
    /// Whether the stored session is still the one the refresh started from
    /// and must be dropped. A cleared or replaced session belongs to someone
    /// else by now and is left alone.
    pub fn ends_session(&self) -> bool {
        !matches!(self, RefreshError::SessionCleared | RefreshError::Superseded)
    }
}

/// Exchanges the refresh token for a new access token and writes it into the
/// session started by `stale_token`. Owns its inputs so it can be shared
/// between waiting requests.
pub(crate) async fn exchange_refresh_token(
    http: Client,
    url: String,
    stale_token: String,
    refresh_token: Option<String>,
    store: Rc<dyn SessionStore>,
    timeout: Duration,
) -> RefreshOutcome {
    let refresh = refresh_token.ok_or(RefreshError::MissingRefreshToken)?;
    let call = request_refresh(&http, &url, refresh);
    let refreshed = match future::select(Box::pin(call), Box::pin(time::sleep(timeout))).await {
        Either::Left((result, _)) => result?,
        Either::Right(_) => return Err(RefreshError::TimedOut(timeout)),
    };

    let mut session = store.get().ok_or(RefreshError::SessionCleared)?;
    if session.access_token != stale_token {
        debug!("session changed while refreshing, discarding refreshed token");
        return Err(RefreshError::Superseded);
    }
    session.access_token = refreshed.access.clone();
    if let Some(rotated) = refreshed.refresh {
        debug!("refresh token rotated");
        session.refresh_token = Some(rotated);
    }
    store
        .set(&session)
        .map_err(|e| RefreshError::Storage(e.error))?;
    info!("access token refreshed");
    Ok(refreshed.access)
}

async fn request_refresh(
    http: &Client,
    url: &str,
    refresh: String,
) -> Result<RefreshResponse, RefreshError> {
    let response = http
        .post(url)
        .json(&RefreshRequest { refresh })
        .send()
        .await
        .map_err(|e| RefreshError::Network(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(RefreshError::Rejected(status.as_u16()));
    }
    let body: RefreshResponse = response
        .json()
        .await
        .map_err(|e| RefreshError::Malformed(e.to_string()))?;
    if body.access.trim().is_empty() {
        return Err(RefreshError::Malformed("empty access token".into()));
    }
    Ok(body)
}

impl ApiClient {
    /// Authenticates and stores the returned tokens and role. Sent without a
    /// bearer header regardless of any stale session.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        let base_url = self.resolved_base_url().await;
        let response = self
            .http_client()
            .post(config::join_url(&base_url, LOGIN_PATH))
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;

        let login_response: LoginResponse = parse_json(response).await?;
        let session = Session::from_login(&login_response);
        self.session_store().set(&session)?;
        info!(
            "logged in with role {}",
            session.role.map(|r| r.as_str()).unwrap_or("unknown")
        );
        Ok(login_response)
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<(), ApiError> {
        if request.password != request.password_confirm {
            return Err(ApiError::validation("Passwords do not match."));
        }
        let base_url = self.resolved_base_url().await;
        let response = self
            .http_client()
            .post(config::join_url(&base_url, REGISTER_PATH))
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;
        ensure_success(response).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ApiError::validation("Email is required."));
        }
        let base_url = self.resolved_base_url().await;
        let response = self
            .http_client()
            .post(config::join_url(&base_url, FORGOT_PASSWORD_PATH))
            .json(&ForgotPasswordRequest {
                email: email.to_string(),
            })
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;
        ensure_success(response).await
    }
}

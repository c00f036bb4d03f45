use futures::future::{FutureExt, LocalBoxFuture, Shared};
use log::{debug, warn};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

use super::auth::{exchange_refresh_token, RefreshError};
use crate::{
    api::types::ApiError,
    config::{self, AuthSettings},
    state::session::{self, Session, SessionStore},
    utils::{
        jwt::{self, TokenError},
        navigation::{self, Navigator},
        time,
    },
};

/// An outgoing call to the backend, relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Why a request was dropped instead of sent.
#[derive(Debug, Error)]
enum SessionFailure {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Refresh(#[from] RefreshError),
}

impl SessionFailure {
    fn ends_session(&self) -> bool {
        match self {
            SessionFailure::Token(_) => true,
            SessionFailure::Refresh(err) => err.ends_session(),
        }
    }
}

pub(crate) type RefreshOutcome = Result<String, RefreshError>;
type SharedRefresh = Shared<LocalBoxFuture<'static, RefreshOutcome>>;

/// The refresh currently running, keyed by the expired token that started it.
struct InFlightRefresh {
    stale_token: String,
    outcome: SharedRefresh,
}

struct ClientInner {
    http: Client,
    base_url: Option<String>,
    settings: AuthSettings,
    store: Rc<dyn SessionStore>,
    navigator: Rc<dyn Navigator>,
    in_flight: RefCell<Option<InFlightRefresh>>,
}

/// HTTP client that attaches the session's bearer token to every request and
/// swaps an expired access token for a fresh one before sending.
///
/// Clones share the session store and the in-flight refresh, so concurrent
/// requests that find the same expired token wait on a single refresh call.
#[derive(Clone)]
pub struct ApiClient {
    inner: Rc<ClientInner>,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::from_parts(
            None,
            session::default_store(),
            default_navigator(),
            AuthSettings::default(),
        )
    }

    pub fn new_with_base_url(base_url: impl Into<String>) -> Self {
        Self::from_parts(
            Some(base_url.into()),
            session::default_store(),
            default_navigator(),
            AuthSettings::default(),
        )
    }

    pub fn from_parts(
        base_url: Option<String>,
        store: Rc<dyn SessionStore>,
        navigator: Rc<dyn Navigator>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            inner: Rc::new(ClientInner {
                http: Client::new(),
                base_url,
                settings,
                store,
                navigator,
                in_flight: RefCell::new(None),
            }),
        }
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.inner.http
    }

    pub fn session_store(&self) -> &dyn SessionStore {
        self.inner.store.as_ref()
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.inner.navigator.as_ref()
    }

    pub fn settings(&self) -> AuthSettings {
        self.inner.settings
    }

    pub(crate) async fn resolved_base_url(&self) -> String {
        if let Some(base) = &self.inner.base_url {
            base.clone()
        } else {
            config::await_api_base_url().await
        }
    }

    /// Clears the session and redirects to the login view.
    pub fn logout_locally(&self) {
        session::logout(self.session_store(), self.navigator());
    }

    /// Sends `request` with the session's bearer token, refreshing an expired
    /// token first. Responses come back untouched whatever their status; only
    /// token problems are handled here, by returning `SESSION_EXPIRED` without
    /// sending anything. The session is logged out unless it was already
    /// cleared or replaced while the refresh ran.
    pub async fn send(&self, request: ApiRequest) -> Result<Response, ApiError> {
        let base_url = self.resolved_base_url().await;
        let token = match self.authorize(&base_url).await {
            Ok(token) => token,
            Err(err) if err.ends_session() => {
                warn!(
                    "dropping {} {} and logging out: {}",
                    request.method, request.path, err
                );
                self.logout_locally();
                return Err(ApiError::session_expired());
            }
            Err(err) => {
                debug!("dropping {} {}: {}", request.method, request.path, err);
                return Err(ApiError::session_expired());
            }
        };

        let mut builder = self
            .http_client()
            .request(request.method.clone(), config::join_url(&base_url, &request.path));
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        parse_json(response).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(ApiRequest::get(path)).await
    }

    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        let response = self.send(request).await?;
        ensure_success(response).await
    }

    /// Returns the token to attach, `None` for anonymous requests.
    async fn authorize(&self, base_url: &str) -> Result<Option<String>, SessionFailure> {
        let Some(session) = self.session_store().get() else {
            return Ok(None);
        };
        let claims = jwt::decode_claims(&session.access_token)?;
        if !claims.is_expired_at(time::now_unix(), self.inner.settings.expiry_leeway_secs) {
            return Ok(Some(session.access_token));
        }

        debug!("access token expired at {}, refreshing", claims.exp_secs());
        let outcome = self.join_refresh(&session, base_url).await;
        self.finish_refresh(&session.access_token);
        Ok(Some(outcome?))
    }

    /// Returns the pending refresh for this stale token, starting one if none
    /// is running. Nothing awaits between the lookup and the insert, so
    /// callers on the same event loop cannot both start a refresh.
    fn join_refresh(&self, session: &Session, base_url: &str) -> SharedRefresh {
        let mut slot = self.inner.in_flight.borrow_mut();
        if let Some(in_flight) = slot.as_ref() {
            if in_flight.stale_token == session.access_token {
                debug!("joining refresh already in flight");
                return in_flight.outcome.clone();
            }
        }

        let outcome = exchange_refresh_token(
            self.inner.http.clone(),
            config::join_url(base_url, REFRESH_PATH),
            session.access_token.clone(),
            session.refresh_token.clone(),
            Rc::clone(&self.inner.store),
            self.inner.settings.refresh_timeout,
        )
        .boxed_local()
        .shared();
        *slot = Some(InFlightRefresh {
            stale_token: session.access_token.clone(),
            outcome: outcome.clone(),
        });
        outcome
    }

    fn finish_refresh(&self, stale_token: &str) {
        let mut slot = self.inner.in_flight.borrow_mut();
        if slot
            .as_ref()
            .is_some_and(|in_flight| in_flight.stale_token == stale_token)
        {
            slot.take();
        }
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

pub const REFRESH_PATH: &str = "/auth/token/refresh/";

#[cfg(target_arch = "wasm32")]
fn default_navigator() -> Rc<dyn Navigator> {
    Rc::new(navigation::BrowserNavigator)
}

#[cfg(not(target_arch = "wasm32"))]
fn default_navigator() -> Rc<dyn Navigator> {
    Rc::new(navigation::DetachedNavigator)
}

pub(crate) async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| ApiError::unknown(format!("Failed to parse response: {}", e)))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_body(status.as_u16(), &body))
    }
}

pub(crate) async fn ensure_success(response: Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_body(status.as_u16(), &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_builders_set_method_body_and_headers() {
        let request = ApiRequest::post("/shipments")
            .json(json!({ "weight": 2 }))
            .header("X-Trace", "t1");
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/shipments");
        assert_eq!(request.body, Some(json!({ "weight": 2 })));
        assert_eq!(request.headers, vec![("X-Trace".into(), "t1".into())]);

        assert_eq!(ApiRequest::patch("/x").method, Method::PATCH);
        assert_eq!(ApiRequest::delete("/x").method, Method::DELETE);
        assert!(ApiRequest::get("/x").body.is_none());
    }
}

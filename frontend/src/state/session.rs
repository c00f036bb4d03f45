use log::{info, warn};
use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    api::{ApiError, LoginResponse, Role},
    utils::{
        jwt,
        navigation::{self, Navigator},
        storage as storage_utils,
    },
};

pub const TOKEN_KEY: &str = "token";
pub const REFRESH_KEY: &str = "refresh";
pub const ROLE_KEY: &str = "role";

/// Client-held credentials. Exists only while an access token is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub role: Option<Role>,
}

impl Session {
    pub fn from_login(response: &LoginResponse) -> Self {
        let role = response.user.role().or_else(|| {
            jwt::decode_claims(&response.tokens.access)
                .ok()
                .and_then(|claims| claims.role())
        });
        Self {
            access_token: response.tokens.access.clone(),
            refresh_token: Some(response.tokens.refresh.clone()),
            role,
        }
    }
}

/// Persistence seam for the session. The API client is the only writer of
/// the access token; views and guards only read.
pub trait SessionStore {
    fn get(&self) -> Option<Session>;
    fn set(&self, session: &Session) -> Result<(), ApiError>;
    fn clear(&self);
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RefCell<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RefCell::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    fn set(&self, session: &Session) -> Result<(), ApiError> {
        *self.session.borrow_mut() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) {
        self.session.borrow_mut().take();
    }
}

/// Session kept in `window.localStorage` so it survives reloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSessionStore;

impl SessionStore for LocalSessionStore {
    fn get(&self) -> Option<Session> {
        let storage = storage_utils::local_storage().ok()?;
        let access_token = storage
            .get_item(TOKEN_KEY)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())?;
        let refresh_token = storage.get_item(REFRESH_KEY).ok().flatten();
        let role = storage
            .get_item(ROLE_KEY)
            .ok()
            .flatten()
            .and_then(|raw| Role::parse(&raw));
        Some(Session {
            access_token,
            refresh_token,
            role,
        })
    }

    fn set(&self, session: &Session) -> Result<(), ApiError> {
        let storage = storage_utils::local_storage().map_err(ApiError::unknown)?;
        storage
            .set_item(TOKEN_KEY, &session.access_token)
            .map_err(|_| ApiError::unknown("Failed to store token"))?;
        match &session.refresh_token {
            Some(refresh) => storage
                .set_item(REFRESH_KEY, refresh)
                .map_err(|_| ApiError::unknown("Failed to store refresh token"))?,
            None => {
                let _ = storage.remove_item(REFRESH_KEY);
            }
        }
        match session.role {
            Some(role) => storage
                .set_item(ROLE_KEY, role.as_str())
                .map_err(|_| ApiError::unknown("Failed to store role"))?,
            None => {
                let _ = storage.remove_item(ROLE_KEY);
            }
        }
        Ok(())
    }

    fn clear(&self) {
        match storage_utils::local_storage() {
            Ok(storage) => {
                let _ = storage.remove_item(TOKEN_KEY);
                let _ = storage.remove_item(REFRESH_KEY);
                let _ = storage.remove_item(ROLE_KEY);
            }
            Err(err) => warn!("could not clear session: {}", err),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Rc<dyn SessionStore> {
    Rc::new(LocalSessionStore)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Rc<dyn SessionStore> {
    Rc::new(MemorySessionStore::new())
}

/// Drops every credential and sends the user to the login view. Safe to
/// call when nobody is logged in.
pub fn logout(store: &dyn SessionStore, navigator: &dyn Navigator) {
    if store.get().is_some() {
        info!("clearing session");
    }
    store.clear();
    navigation::redirect_to_login(navigator);
}

#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod ssr;

#[cfg(test)]
pub mod helpers {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::api::{ApiClient, Role};
    use crate::config::AuthSettings;
    use crate::state::session::{MemorySessionStore, Session};
    use crate::utils::{navigation::Navigator, time};

    /// Unsigned JWT carrying `claims`; the client never checks signatures.
    pub fn token_with(claims: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.signature", header, payload)
    }

    pub fn token_expiring_in(secs: i64, role: Role) -> String {
        token_with(json!({ "exp": time::now_unix() + secs, "role": role.as_str() }))
    }

    pub fn fresh_token(role: Role) -> String {
        token_expiring_in(3600, role)
    }

    pub fn expired_token(role: Role) -> String {
        token_expiring_in(-10, role)
    }

    pub fn session(access: String, refresh: Option<&str>, role: Option<Role>) -> Session {
        Session {
            access_token: access,
            refresh_token: refresh.map(str::to_string),
            role,
        }
    }

    #[derive(Debug, Default)]
    pub struct RecordingNavigator {
        current: RefCell<Option<String>>,
        visits: RefCell<Vec<String>>,
    }

    impl RecordingNavigator {
        pub fn at(path: &str) -> Self {
            Self {
                current: RefCell::new(Some(path.to_string())),
                visits: RefCell::new(Vec::new()),
            }
        }

        pub fn visits(&self) -> Vec<String> {
            self.visits.borrow().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn current_path(&self) -> Option<String> {
            self.current.borrow().clone()
        }

        fn navigate(&self, path: &str) {
            *self.current.borrow_mut() = Some(path.to_string());
            self.visits.borrow_mut().push(path.to_string());
        }
    }

    pub struct TestClient {
        pub client: ApiClient,
        pub store: Rc<MemorySessionStore>,
        pub navigator: Rc<RecordingNavigator>,
    }

    pub fn test_client(base_url: &str, session: Option<Session>) -> TestClient {
        test_client_with(base_url, session, AuthSettings::default())
    }

    pub fn test_client_with(
        base_url: &str,
        session: Option<Session>,
        settings: AuthSettings,
    ) -> TestClient {
        let store = Rc::new(match session {
            Some(session) => MemorySessionStore::with_session(session),
            None => MemorySessionStore::new(),
        });
        let navigator = Rc::new(RecordingNavigator::at("/dashboard"));
        let client = ApiClient::from_parts(
            Some(base_url.to_string()),
            store.clone(),
            navigator.clone(),
            settings,
        );
        TestClient {
            client,
            store,
            navigator,
        }
    }
}

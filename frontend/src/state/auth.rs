use crate::{
    api::{ApiClient, ApiError, LoginRequest, Role},
    router,
};
use leptos::*;
use log::warn;

type AuthContext = (ReadSignal<AuthState>, WriteSignal<AuthState>);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub role: Option<Role>,
    pub is_authenticated: bool,
    pub loading: bool,
}

impl AuthState {
    pub fn from_client(client: &ApiClient) -> Self {
        let session = client.session_store().get();
        Self {
            role: session.as_ref().and_then(|s| s.role),
            is_authenticated: session.is_some(),
            loading: false,
        }
    }
}

/// The app-wide client from context. A client created here has its own
/// in-flight refresh slot, so its requests do not coalesce with the app's.
pub fn use_api_client() -> ApiClient {
    use_context::<ApiClient>().unwrap_or_else(|| {
        warn!("no ApiClient in context, using a standalone client");
        ApiClient::new()
    })
}

fn create_auth_context() -> AuthContext {
    let client = use_api_client();
    create_signal(AuthState::from_client(&client))
}

#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let ctx = create_auth_context();
    provide_context::<AuthContext>(ctx);
    view! { <>{children()}</> }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().unwrap_or_else(create_auth_context)
}

/// Logs in and returns the landing path for the session's role.
pub async fn login_request(
    request: LoginRequest,
    client: &ApiClient,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<&'static str, ApiError> {
    set_auth_state.update(|state| state.loading = true);

    match client.login(request).await {
        Ok(_) => {
            let next = AuthState::from_client(client);
            let landing = router::landing_path_for(next.role);
            set_auth_state.set(next);
            Ok(landing)
        }
        Err(error) => {
            set_auth_state.update(|state| state.loading = false);
            Err(error)
        }
    }
}

pub fn logout(client: &ApiClient, set_auth_state: WriteSignal<AuthState>) {
    client.logout_locally();
    set_auth_state.set(AuthState::default());
}

pub fn use_login_action() -> Action<LoginRequest, Result<&'static str, ApiError>> {
    let (_auth, set_auth) = use_auth();
    let client = use_api_client();

    create_action(move |request: &LoginRequest| {
        let payload = request.clone();
        let client = client.clone();
        async move { login_request(payload, &client, set_auth).await }
    })
}

pub fn use_logout() -> impl Fn() + Clone + 'static {
    let (_auth, set_auth) = use_auth();
    let client = use_api_client();
    move || logout(&client, set_auth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::session::SessionStore;
    use crate::test_support::helpers::{fresh_token, session, test_client};
    use leptos::create_runtime;

    fn with_runtime<T>(test: impl FnOnce() -> T) -> T {
        let runtime = create_runtime();
        let result = test();
        runtime.dispose();
        result
    }

    #[test]
    fn use_auth_defaults_to_logged_out_without_session() {
        with_runtime(|| {
            let (state, _set_state) = use_auth();
            let snapshot = state.get();
            assert!(!snapshot.is_authenticated);
            assert!(snapshot.role.is_none());
        });
    }

    #[test]
    fn use_api_client_returns_the_provided_client() {
        with_runtime(|| {
            let stored = session(fresh_token(Role::Carrier), Some("r"), Some(Role::Carrier));
            let t = test_client("http://unused", Some(stored.clone()));
            provide_context(t.client.clone());

            let client = use_api_client();
            assert_eq!(client.session_store().get(), Some(stored));
            client.session_store().clear();
            assert!(t.store.get().is_none());
        });
    }

    #[test]
    fn use_api_client_falls_back_to_a_standalone_client() {
        with_runtime(|| {
            let client = use_api_client();
            assert!(client.session_store().get().is_none());
        });
    }

    #[test]
    fn auth_state_reads_role_from_stored_session() {
        let t = test_client(
            "http://unused",
            Some(session(fresh_token(Role::Admin), Some("r"), Some(Role::Admin))),
        );
        let state = AuthState::from_client(&t.client);
        assert!(state.is_authenticated);
        assert_eq!(state.role, Some(Role::Admin));
    }

    #[test]
    fn logout_resets_state_and_session() {
        with_runtime(|| {
            let t = test_client(
                "http://unused",
                Some(session(fresh_token(Role::Customer), Some("r"), Some(Role::Customer))),
            );
            let (state, set_state) = create_signal(AuthState::from_client(&t.client));
            logout(&t.client, set_state);
            assert_eq!(state.get(), AuthState::default());
            assert!(t.client.session_store().get().is_none());
            assert_eq!(t.navigator.visits(), vec!["/login".to_string()]);
        });
    }
}

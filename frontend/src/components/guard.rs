use leptos::*;

use crate::{
    api::Role,
    router::{guard_decision, GuardDecision},
    state::auth::use_api_client,
    utils::{navigation::UNAUTHORIZED_PATH, time},
};

/// Renders `children` only when the stored session holds an unexpired token
/// whose role is in `allowed`; otherwise redirects or logs out.
#[component]
pub fn RequireRole(allowed: &'static [Role], children: ChildrenFn) -> impl IntoView {
    let client = use_api_client();
    let decision = {
        let session = client.session_store().get();
        guard_decision(
            session.as_ref(),
            allowed,
            time::now_unix(),
            client.settings().expiry_leeway_secs,
        )
    };

    create_effect(move |_| match decision {
        GuardDecision::Allow => {}
        GuardDecision::Login | GuardDecision::Logout => client.logout_locally(),
        GuardDecision::Unauthorized => client.navigator().navigate(UNAUTHORIZED_PATH),
    });

    view! {
        <Show when=move || should_render_children(decision) fallback=|| ()>
            {children()}
        </Show>
    }
}

fn should_render_children(decision: GuardDecision) -> bool {
    decision == GuardDecision::Allow
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::RequireRole;
    use crate::api::Role;
    use crate::test_support::helpers::{fresh_token, session, test_client};
    use crate::test_support::ssr::render_with_client;
    use leptos::*;

    const ADMIN_ONLY: &[Role] = &[Role::Admin];

    fn render_for(role: Option<Role>) -> String {
        let stored = role.map(|role| session(fresh_token(role), Some("r"), Some(role)));
        let t = test_client("http://unused", stored);
        render_with_client(t.client, || {
            view! {
                <RequireRole allowed=ADMIN_ONLY>
                    {|| view! { <div>"admin-protected"</div> }}
                </RequireRole>
            }
        })
    }

    #[test]
    fn renders_children_for_allowed_role() {
        assert!(render_for(Some(Role::Admin)).contains("admin-protected"));
    }

    #[test]
    fn hides_children_for_other_roles() {
        assert!(!render_for(Some(Role::Customer)).contains("admin-protected"));
    }

    #[test]
    fn hides_children_without_session() {
        assert!(!render_for(None).contains("admin-protected"));
    }
}

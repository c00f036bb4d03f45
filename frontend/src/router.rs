use leptos::*;
use leptos_meta::*;
use leptos_router::*;

use crate::{
    api::{ApiClient, Role},
    components::guard::RequireRole,
    pages::{
        carrier::CarrierDeliveriesPage,
        dashboard::DashboardPage,
        forgot_password::ForgotPasswordPage,
        login::LoginPage,
        register::RegisterPage,
        status::{NotFoundPage, UnauthorizedPage},
    },
    state::{auth::AuthProvider, session::Session},
    utils::jwt,
};

const CUSTOMER: &[Role] = &[Role::Customer];
const CARRIER: &[Role] = &[Role::Carrier];
const ADMIN: &[Role] = &[Role::Admin];
const CARRIER_OR_ADMIN: &[Role] = &[Role::Carrier, Role::Admin];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Roles(&'static [Role]),
}

/// Which page renders a role-restricted route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteView {
    Dashboard,
    CarrierDeliveries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSpec {
    pub path: &'static str,
    pub title: &'static str,
    pub access: Access,
    /// Endpoint whose JSON the view renders, if any.
    pub data_path: Option<&'static str>,
    pub view: RouteView,
}

impl RouteSpec {
    const fn public(path: &'static str, title: &'static str) -> Self {
        Self {
            path,
            title,
            access: Access::Public,
            data_path: None,
            view: RouteView::Dashboard,
        }
    }

    const fn gated(
        path: &'static str,
        title: &'static str,
        roles: &'static [Role],
        data_path: Option<&'static str>,
    ) -> Self {
        Self {
            path,
            title,
            access: Access::Roles(roles),
            data_path,
            view: RouteView::Dashboard,
        }
    }

    const fn with_view(self, view: RouteView) -> Self {
        Self { view, ..self }
    }

    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self.access {
            Access::Public => None,
            Access::Roles(roles) => Some(roles),
        }
    }
}

pub const ROUTES: &[RouteSpec] = &[
    RouteSpec::public("/", "Home"),
    RouteSpec::public("/login", "Login"),
    RouteSpec::public("/register", "Register"),
    RouteSpec::public("/forgot-password", "Forgot password"),
    RouteSpec::public("/unauthorized", "Unauthorized"),
    RouteSpec::gated("/dashboard", "Customer dashboard", CUSTOMER, Some("/shipments")),
    RouteSpec::gated("/dashboard/create", "Create shipment", CUSTOMER, None),
    RouteSpec::gated("/dashboard/track", "Track shipment", CUSTOMER, None),
    RouteSpec::gated(
        "/dashboard/my-shipments",
        "My shipments",
        CUSTOMER,
        Some("/shipments"),
    ),
    RouteSpec::gated("/carrier", "Carrier dashboard", CARRIER, None)
        .with_view(RouteView::CarrierDeliveries),
    RouteSpec::gated("/admin", "Admin dashboard", ADMIN, None),
    RouteSpec::gated("/dashboard/agents", "Regional agents", ADMIN, None),
    RouteSpec::gated(
        "/dashboard/affiliate",
        "Affiliate programme",
        CARRIER_OR_ADMIN,
        None,
    ),
    RouteSpec::gated("/dashboard/settings", "Settings", Role::ALL, None),
];

pub fn find_route(path: &str) -> Option<&'static RouteSpec> {
    ROUTES.iter().find(|route| route.path == path)
}

/// The role-restricted entry of [`ROUTES`] for `path`, if any. Public paths
/// have their own `<Route>`s.
pub fn gated_route(path: &str) -> Option<&'static RouteSpec> {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    find_route(path).filter(|route| route.allowed_roles().is_some())
}

pub fn is_allowed(role: Option<Role>, allowed: &[Role]) -> bool {
    role.is_some_and(|role| allowed.contains(&role))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// No usable session: send to the login view.
    Login,
    /// Token present but unreadable or expired: run the logout side effect.
    Logout,
    Unauthorized,
}

pub fn guard_decision(
    session: Option<&Session>,
    allowed: &[Role],
    now: i64,
    leeway_secs: i64,
) -> GuardDecision {
    let Some(session) = session else {
        return GuardDecision::Login;
    };
    if session.role.is_none() {
        return GuardDecision::Login;
    }
    match jwt::decode_claims(&session.access_token) {
        Ok(claims) if !claims.is_expired_at(now, leeway_secs) => {}
        _ => return GuardDecision::Logout,
    }
    if is_allowed(session.role, allowed) {
        GuardDecision::Allow
    } else {
        GuardDecision::Unauthorized
    }
}

pub fn landing_path_for(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Admin) => "/admin",
        Some(Role::Carrier) => "/carrier",
        Some(Role::Customer) | None => "/dashboard",
    }
}

#[cfg(target_arch = "wasm32")]
pub fn mount_app() {
    mount_to_body(app_root);
}

pub fn app_root() -> impl IntoView {
    provide_meta_context();
    provide_context(ApiClient::new());
    view! {
        <Title text="LinkaFrex"/>
        <AuthProvider>
            <Router>
                <Routes>
                    <Route path="/" view=LoginPage/>
                    <Route path="/login" view=LoginPage/>
                    <Route path="/register" view=RegisterPage/>
                    <Route path="/forgot-password" view=ForgotPasswordPage/>
                    <Route path="/unauthorized" view=UnauthorizedPage/>
                    <Route path="/*any" view=GatedRoute/>
                </Routes>
            </Router>
        </AuthProvider>
    }
}

/// Resolves every path without its own `<Route>` against [`ROUTES`].
#[component]
fn GatedRoute() -> impl IntoView {
    let location = use_location();
    move || match gated_route(&location.pathname.get()) {
        Some(route) => view! { <Gated route=route/> }.into_view(),
        None => view! { <NotFoundPage/> }.into_view(),
    }
}

#[component]
fn Gated(route: &'static RouteSpec) -> impl IntoView {
    let allowed = route.allowed_roles().unwrap_or(Role::ALL);
    view! {
        <RequireRole allowed=allowed>
            {move || match route.view {
                RouteView::Dashboard => view! { <DashboardPage route=route/> }.into_view(),
                RouteView::CarrierDeliveries => {
                    view! { <CarrierDeliveriesPage title=route.title/> }.into_view()
                }
            }}
        </RequireRole>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{expired_token, fresh_token, session};
    use crate::utils::time::now_unix;
    use std::collections::HashSet;

    #[test]
    fn no_duplicate_routes() {
        let unique: HashSet<&str> = ROUTES.iter().map(|r| r.path).collect();
        assert_eq!(unique.len(), ROUTES.len());
    }

    #[test]
    fn dashboards_are_gated_by_role() {
        assert_eq!(find_route("/carrier").unwrap().allowed_roles(), Some(CARRIER));
        assert_eq!(find_route("/admin").unwrap().allowed_roles(), Some(ADMIN));
        assert_eq!(
            find_route("/dashboard/affiliate").unwrap().allowed_roles(),
            Some(CARRIER_OR_ADMIN)
        );
        assert_eq!(find_route("/login").unwrap().allowed_roles(), None);
        assert!(find_route("/nowhere").is_none());
    }

    #[test]
    fn every_gated_route_resolves_through_the_catch_all() {
        for route in ROUTES.iter().filter(|r| r.allowed_roles().is_some()) {
            assert_eq!(gated_route(route.path), Some(route), "{}", route.path);
        }
        assert_eq!(gated_route("/carrier/").map(|r| r.path), Some("/carrier"));
        assert!(gated_route("/login").is_none());
        assert!(gated_route("/").is_none());
        assert!(gated_route("/dashboard/unknown").is_none());
    }

    #[test]
    fn carrier_route_uses_the_deliveries_view() {
        assert_eq!(find_route("/carrier").unwrap().view, RouteView::CarrierDeliveries);
        assert_eq!(find_route("/admin").unwrap().view, RouteView::Dashboard);
    }

    #[test]
    fn is_allowed_requires_membership() {
        assert!(is_allowed(Some(Role::Admin), CARRIER_OR_ADMIN));
        assert!(!is_allowed(Some(Role::Customer), CARRIER_OR_ADMIN));
        assert!(!is_allowed(None, Role::ALL));
        assert!(!is_allowed(Some(Role::Admin), &[]));
    }

    #[test]
    fn guard_sends_anonymous_users_to_login() {
        assert_eq!(guard_decision(None, CUSTOMER, now_unix(), 5), GuardDecision::Login);
        let roleless = session(fresh_token(Role::Customer), Some("r"), None);
        assert_eq!(
            guard_decision(Some(&roleless), CUSTOMER, now_unix(), 5),
            GuardDecision::Login
        );
    }

    #[test]
    fn guard_logs_out_expired_or_corrupt_sessions() {
        let expired = session(expired_token(Role::Customer), Some("r"), Some(Role::Customer));
        assert_eq!(
            guard_decision(Some(&expired), CUSTOMER, now_unix(), 5),
            GuardDecision::Logout
        );
        let corrupt = session("junk".into(), Some("r"), Some(Role::Customer));
        assert_eq!(
            guard_decision(Some(&corrupt), CUSTOMER, now_unix(), 5),
            GuardDecision::Logout
        );
    }

    #[test]
    fn guard_checks_role_membership() {
        let carrier = session(fresh_token(Role::Carrier), Some("r"), Some(Role::Carrier));
        assert_eq!(
            guard_decision(Some(&carrier), CARRIER_OR_ADMIN, now_unix(), 5),
            GuardDecision::Allow
        );
        assert_eq!(
            guard_decision(Some(&carrier), ADMIN, now_unix(), 5),
            GuardDecision::Unauthorized
        );
    }

    #[test]
    fn landing_path_follows_role() {
        assert_eq!(landing_path_for(Some(Role::Admin)), "/admin");
        assert_eq!(landing_path_for(Some(Role::Carrier)), "/carrier");
        assert_eq!(landing_path_for(Some(Role::Customer)), "/dashboard");
        assert_eq!(landing_path_for(None), "/dashboard");
    }
}

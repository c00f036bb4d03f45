use leptos::*;
use serde_json::Value;

use crate::{
    api::ApiError,
    components::layout::{ErrorMessage, LoadingSpinner},
    router::RouteSpec,
    state::auth::{use_api_client, use_logout},
};

pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn render_payload(result: Result<Option<Value>, ApiError>) -> View {
    match result {
        Ok(Some(value)) => view! {
            <pre class="bg-gray-900 text-gray-100 rounded p-4 overflow-x-auto text-sm">
                {pretty_json(&value)}
            </pre>
        }
        .into_view(),
        Ok(None) => view! { <p class="text-gray-400">"Nothing to show yet."</p> }.into_view(),
        // The client already logged out and redirected.
        Err(err) if err.is_session_expired() => ().into_view(),
        Err(err) => view! { <ErrorMessage message=err.error /> }.into_view(),
    }
}

/// One view for every role dashboard: a title plus whatever JSON the route's
/// endpoint returns.
#[component]
pub fn DashboardPage(route: &'static RouteSpec) -> impl IntoView {
    let client = use_api_client();
    let logout = use_logout();
    let data = create_local_resource(
        move || route.data_path,
        move |path| {
            let client = client.clone();
            async move {
                match path {
                    Some(path) => client.get_json::<Value>(path).await.map(Some),
                    None => Ok(None),
                }
            }
        },
    );

    view! {
        <section class="max-w-5xl mx-auto px-4 py-8 space-y-6">
            <header class="flex justify-between items-center">
                <h1 class="text-2xl font-semibold text-yellow-400">{route.title}</h1>
                <button class="text-sm underline" on:click=move |_| logout()>"Log out"</button>
            </header>
            <Suspense fallback=|| view! { <LoadingSpinner /> }>
                {move || data.get().map(render_payload)}
            </Suspense>
        </section>
    }
}

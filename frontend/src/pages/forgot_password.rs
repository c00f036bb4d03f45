use leptos::{ev::SubmitEvent, *};

use crate::{
    api::ApiError,
    components::layout::{ErrorMessage, SuccessMessage},
    state::auth::use_api_client,
};

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let (email, set_email) = create_signal(String::new());
    let client = use_api_client();

    let reset_action = create_action(move |email: &String| {
        let client = client.clone();
        let email = email.clone();
        async move { client.forgot_password(&email).await }
    });
    let pending = reset_action.pending();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if !pending.get_untracked() {
            reset_action.dispatch(email.get_untracked());
        }
    };

    view! {
        <div class="min-h-screen flex items-center justify-center px-4 py-10 bg-black text-white">
            <form class="w-full max-w-md space-y-4" on:submit=on_submit>
                <h2 class="text-3xl font-bold text-center text-yellow-400">"Reset your password"</h2>
                {move || match reset_action.value().get() {
                    Some(Ok(())) => view! {
                        <SuccessMessage message="If that email is registered, a reset link is on its way.".into() />
                    }
                    .into_view(),
                    Some(Err(ApiError { error, .. })) => view! { <ErrorMessage message=error /> }.into_view(),
                    None => ().into_view(),
                }}
                <input
                    type="email"
                    name="email"
                    required
                    class="w-full bg-black border border-yellow-400 py-2 px-3 rounded-md"
                    prop:value=email
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
                <button
                    type="submit"
                    class="w-full py-3 bg-yellow-400 text-black font-bold rounded-md"
                    disabled=move || pending.get()
                >
                    "Send reset link"
                </button>
                <p class="text-center text-sm"><a href="/login">"Back to login"</a></p>
            </form>
        </div>
    }
}

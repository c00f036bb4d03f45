use leptos::{ev::SubmitEvent, *};

use crate::{
    api::LoginRequest,
    components::layout::ErrorMessage,
    state::auth::{use_api_client, use_login_action},
};

pub fn validate_credentials(email: &str, password: &str) -> Result<(), String> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err("Enter the email address you registered with.".into());
    }
    if password.is_empty() {
        return Err("Enter your password.".into());
    }
    Ok(())
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);

    let client = use_api_client();
    let login_action = use_login_action();
    let pending = login_action.pending();

    create_effect(move |_| {
        if let Some(result) = login_action.value().get() {
            match result {
                Ok(landing) => {
                    set_error.set(None);
                    client.navigator().navigate(landing);
                }
                Err(err) => set_error.set(Some(err.error)),
            }
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let email = email.get_untracked().trim().to_string();
        let password = password.get_untracked();
        if let Err(msg) = validate_credentials(&email, &password) {
            set_error.set(Some(msg));
            return;
        }
        set_error.set(None);
        login_action.dispatch(LoginRequest { email, password });
    };

    view! {
        <div class="min-h-screen flex items-center justify-center px-4 py-10 bg-black text-white">
            <form class="w-full max-w-md space-y-6" on:submit=on_submit>
                <h2 class="text-3xl font-bold text-center text-yellow-400">"Welcome Back"</h2>
                {move || error.get().map(|message| view! { <ErrorMessage message=message /> })}
                <label class="block text-sm font-medium text-yellow-400">
                    "Email"
                    <input
                        type="email"
                        name="email"
                        required
                        class="w-full bg-black border border-yellow-400 py-2 px-3 rounded-md"
                        prop:value=email
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </label>
                <label class="block text-sm font-medium text-yellow-400">
                    "Password"
                    <input
                        type="password"
                        name="password"
                        required
                        class="w-full bg-black border border-yellow-400 py-2 px-3 rounded-md"
                        prop:value=password
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </label>
                <button
                    type="submit"
                    class="w-full py-3 bg-yellow-400 text-black font-bold rounded-md"
                    disabled=move || pending.get()
                >
                    {move || if pending.get() { "Logging in..." } else { "Login" }}
                </button>
                <p class="text-center text-sm text-gray-400">
                    <a href="/forgot-password">"Forgot password?"</a>
                    " · "
                    <a href="/register">"Register"</a>
                </p>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::validate_credentials;

    #[test]
    fn credentials_need_email_and_password() {
        assert!(validate_credentials("", "pw").is_err());
        assert!(validate_credentials("not-an-email", "pw").is_err());
        assert!(validate_credentials("a@linkafrex.test", "").is_err());
        assert!(validate_credentials("a@linkafrex.test", "pw").is_ok());
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::LoginPage;
    use crate::test_support::helpers::test_client;
    use crate::test_support::ssr::render_with_client;
    use leptos::*;

    #[test]
    fn login_page_renders_form() {
        let t = test_client("http://unused", None);
        let html = render_with_client(t.client, || view! { <LoginPage /> });
        assert!(html.contains("Welcome Back"));
        assert!(html.contains("name=\"email\""));
        assert!(html.contains("/forgot-password"));
    }
}

use leptos::{ev::SubmitEvent, *};

use crate::{
    api::{ApiError, RegisterRequest, Role},
    components::layout::ErrorMessage,
    state::auth::use_api_client,
    utils::navigation::LOGIN_PATH,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: String,
}

impl RegisterForm {
    pub fn into_request(self) -> Result<RegisterRequest, String> {
        if self.username.trim().is_empty() || self.email.trim().is_empty() {
            return Err("Username and email are required.".into());
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match.".into());
        }
        let role = Role::parse(&self.role).ok_or("Choose an account type.")?;
        Ok(RegisterRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
            password_confirm: self.confirm_password,
            role,
        })
    }
}

fn text_field(
    form: RwSignal<RegisterForm>,
    name: &'static str,
    kind: &'static str,
    set: fn(&mut RegisterForm, String),
) -> impl IntoView {
    view! {
        <input
            type=kind
            name=name
            placeholder=name
            required
            class="w-full bg-black border border-yellow-400 py-2 px-3 rounded-md"
            on:input=move |ev| {
                let value = event_target_value(&ev);
                form.update(|f| set(f, value));
            }
        />
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let form = create_rw_signal(RegisterForm::default());
    let (error, set_error) = create_signal(None::<String>);
    let client = use_api_client();

    let register_action = {
        let client = client.clone();
        create_action(move |request: &RegisterRequest| {
            let client = client.clone();
            let request = request.clone();
            async move { client.register(request).await }
        })
    };
    let pending = register_action.pending();

    create_effect(move |_| {
        if let Some(result) = register_action.value().get() {
            match result {
                Ok(()) => client.navigator().navigate(LOGIN_PATH),
                Err(ApiError { error, .. }) => set_error.set(Some(error)),
            }
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        match form.get_untracked().into_request() {
            Ok(request) => {
                set_error.set(None);
                register_action.dispatch(request);
            }
            Err(msg) => set_error.set(Some(msg)),
        }
    };

    view! {
        <div class="min-h-screen flex items-center justify-center px-4 py-10 bg-black text-white">
            <form class="w-full max-w-md space-y-4" on:submit=on_submit>
                <h2 class="text-3xl font-bold text-center text-yellow-400">"Create your account"</h2>
                {move || error.get().map(|message| view! { <ErrorMessage message=message /> })}
                {text_field(form, "username", "text", |f, v| f.username = v)}
                {text_field(form, "email", "email", |f, v| f.email = v)}
                {text_field(form, "password", "password", |f, v| f.password = v)}
                {text_field(form, "confirm_password", "password", |f, v| f.confirm_password = v)}
                <select
                    name="role"
                    class="w-full bg-black border border-yellow-400 py-2 px-3 rounded-md"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| f.role = value);
                    }
                >
                    <option value="">"Account type"</option>
                    {Role::ALL
                        .iter()
                        .map(|role| view! { <option value=role.as_str()>{role.as_str()}</option> })
                        .collect_view()}
                </select>
                <button
                    type="submit"
                    class="w-full py-3 bg-yellow-400 text-black font-bold rounded-md"
                    disabled=move || pending.get()
                >
                    "Register"
                </button>
            </form>
        </div>
    }
}

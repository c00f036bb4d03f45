use leptos::*;

#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! {
        <div class="flex justify-center items-center p-8">
            <div class="animate-spin rounded-full h-8 w-8 border-b-2 border-yellow-400"></div>
        </div>
    }
}

#[component]
pub fn ErrorMessage(message: String) -> impl IntoView {
    view! {
        <div class="bg-red-900/40 border border-red-500 text-red-200 px-4 py-3 rounded mb-4" role="alert">
            {message}
        </div>
    }
}

#[component]
pub fn SuccessMessage(message: String) -> impl IntoView {
    view! {
        <div class="bg-green-900/40 border border-green-500 text-green-200 px-4 py-3 rounded mb-4">
            {message}
        </div>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn message_components_render_text() {
        let html = render_to_string(|| {
            view! {
                <div>
                    <LoadingSpinner />
                    <ErrorMessage message="bad credentials".into() />
                    <SuccessMessage message="check your inbox".into() />
                </div>
            }
        });
        assert!(html.contains("animate-spin"));
        assert!(html.contains("bad credentials"));
        assert!(html.contains("check your inbox"));
    }
}

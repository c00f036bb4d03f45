use leptos::*;

#[component]
pub fn UnauthorizedPage() -> impl IntoView {
    view! {
        <div class="min-h-screen flex flex-col items-center justify-center text-center">
            <h1 class="text-3xl font-bold text-yellow-400">"Access denied"</h1>
            <p class="text-gray-400 mt-2">"Your account does not have permission to view this page."</p>
            <a href="/" class="mt-6 underline">"Back to home"</a>
        </div>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="min-h-screen flex flex-col items-center justify-center text-center">
            <h1 class="text-3xl font-bold text-yellow-400">"404"</h1>
            <p class="text-gray-400 mt-2">"Page not found."</p>
            <a href="/" class="mt-6 underline">"Back to home"</a>
        </div>
    }
}

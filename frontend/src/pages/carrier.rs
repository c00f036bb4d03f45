use chrono::{DateTime, Utc};
use leptos::*;

use crate::{
    api::{ApiError, Delivery, DeliveryStatus},
    components::layout::{ErrorMessage, LoadingSpinner},
    state::auth::{use_api_client, use_logout},
};

pub fn format_assigned_at(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Flips the matching row to delivered once the backend has accepted it.
pub fn mark_row_delivered(deliveries: &mut [Delivery], delivery_id: &str) {
    if let Some(delivery) = deliveries.iter_mut().find(|d| d.id == delivery_id) {
        delivery.status = DeliveryStatus::Delivered;
    }
}

#[component]
pub fn DeliveryList(deliveries: Vec<Delivery>, on_mark: Callback<String>) -> impl IntoView {
    if deliveries.is_empty() {
        return view! { <p class="text-gray-400">"No deliveries assigned."</p> }.into_view();
    }

    view! {
        <div class="space-y-4">
            {deliveries
                .into_iter()
                .map(|delivery| {
                    let id = delivery.id.clone();
                    let status = match delivery.status {
                        DeliveryStatus::Delivered => view! {
                            <span class="text-green-400 text-sm font-semibold">"Delivered"</span>
                        }
                        .into_view(),
                        DeliveryStatus::InTransit => view! {
                            <button
                                class="bg-yellow-500 hover:bg-yellow-400 text-black font-bold px-4 py-2 rounded"
                                on:click=move |_| on_mark.call(id.clone())
                            >
                                "Mark as Delivered"
                            </button>
                        }
                        .into_view(),
                    };
                    view! {
                        <div class="border border-gray-800 bg-[#111] rounded-lg p-4 flex justify-between items-center">
                            <div>
                                <h2 class="font-semibold text-yellow-400">{delivery.id}</h2>
                                <p class="text-sm text-gray-400">"Destination: " {delivery.destination}</p>
                                <p class="text-sm text-gray-500">
                                    "Assigned at: " {format_assigned_at(&delivery.assigned_at)}
                                </p>
                            </div>
                            <div>{status}</div>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
    .into_view()
}

#[component]
pub fn CarrierDeliveriesPage(title: &'static str) -> impl IntoView {
    let client = use_api_client();
    let logout = use_logout();
    let deliveries = create_rw_signal(None::<Vec<Delivery>>);
    let (error, set_error) = create_signal(None::<String>);

    let load = {
        let client = client.clone();
        create_local_resource(
            || (),
            move |_| {
                let client = client.clone();
                async move { client.carrier_deliveries().await }
            },
        )
    };

    let mark_action = create_action(move |delivery_id: &String| {
        let client = client.clone();
        let delivery_id = delivery_id.clone();
        async move { client.mark_delivered(&delivery_id).await.map(|()| delivery_id) }
    });
    let pending = mark_action.pending();

    create_effect(move |_| match load.get() {
        Some(Ok(list)) => deliveries.set(Some(list)),
        // The client already logged out and redirected.
        Some(Err(err)) if err.is_session_expired() => {}
        Some(Err(ApiError { error, .. })) => {
            set_error.set(Some(error));
            deliveries.set(Some(Vec::new()));
        }
        None => {}
    });

    create_effect(move |_| match mark_action.value().get() {
        Some(Ok(delivery_id)) => {
            set_error.set(None);
            deliveries.update(|list| {
                if let Some(list) = list {
                    mark_row_delivered(list, &delivery_id);
                }
            });
        }
        Some(Err(err)) if err.is_session_expired() => {}
        Some(Err(ApiError { error, .. })) => set_error.set(Some(error)),
        None => {}
    });

    let on_mark = Callback::new(move |delivery_id: String| {
        if !pending.get_untracked() {
            mark_action.dispatch(delivery_id);
        }
    });

    view! {
        <section class="max-w-5xl mx-auto px-4 py-8 space-y-6">
            <header class="flex justify-between items-center">
                <h1 class="text-2xl font-semibold text-yellow-400">{title}</h1>
                <button class="text-sm underline" on:click=move |_| logout()>"Log out"</button>
            </header>
            <p class="text-gray-300">"View assigned deliveries and mark orders as delivered."</p>
            {move || error.get().map(|message| view! { <ErrorMessage message=message /> })}
            {move || match deliveries.get() {
                Some(list) => view! { <DeliveryList deliveries=list on_mark=on_mark /> }.into_view(),
                None => view! { <LoadingSpinner /> }.into_view(),
            }}
        </section>
    }
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::helpers::test_client;
    use crate::test_support::ssr::{render_to_string, render_with_client};

    #[test]
    fn list_shows_button_only_for_open_deliveries() {
        let html = render_to_string(|| {
            let rows = vec![
                Delivery {
                    id: "d1".into(),
                    status: DeliveryStatus::InTransit,
                    destination: "Kisumu".into(),
                    assigned_at: "2025-01-02T10:30:00Z".into(),
                },
                Delivery {
                    id: "d2".into(),
                    status: DeliveryStatus::Delivered,
                    destination: "Nakuru".into(),
                    assigned_at: "2025-01-03T08:00:00Z".into(),
                },
            ];
            view! { <DeliveryList deliveries=rows on_mark=Callback::new(|_: String| {}) /> }
        });
        assert!(html.contains("Kisumu"));
        assert!(html.contains("2025-01-02 10:30 UTC"));
        assert_eq!(html.matches("Mark as Delivered").count(), 1);
        assert!(html.contains("Delivered"));
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let html = render_to_string(|| {
            view! { <DeliveryList deliveries=Vec::new() on_mark=Callback::new(|_: String| {}) /> }
        });
        assert!(html.contains("No deliveries assigned."));
    }

    #[test]
    fn page_renders_title_while_loading() {
        let t = test_client("http://unused", None);
        let html = render_with_client(t.client, || {
            view! { <CarrierDeliveriesPage title="Carrier dashboard" /> }
        });
        assert!(html.contains("Carrier dashboard"));
        assert!(html.contains("animate-spin"));
    }
}

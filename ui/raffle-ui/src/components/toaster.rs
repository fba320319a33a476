use std::time::{Duration, Instant};

use dioxus::prelude::*;

use crate::notify::{ToastPhase, Toasts};

const SWEEP_INTERVAL: Duration = Duration::from_millis(500);

#[component]
pub fn Toaster() -> Element {
    let mut toasts = use_context::<Signal<Toasts>>();

    use_future(move || async move {
        loop {
            tokio::time::sleep(SWEEP_INTERVAL).await;
            let now = Instant::now();
            if toasts.peek().has_expired(now) {
                toasts.write().expire(now);
            }
        }
    });

    if toasts.read().is_empty() {
        return rsx! {};
    }
    let items: Vec<_> = toasts
        .read()
        .iter()
        .map(|t| (t.id, t.phase, t.message.clone()))
        .collect();

    rsx! {
        div { class: "toaster",
            for (id, phase, message) in items {
                div {
                    key: "{id}",
                    class: match phase {
                        ToastPhase::Loading => "toast toast-loading",
                        ToastPhase::Success => "toast toast-success",
                        ToastPhase::Error => "toast toast-error",
                    },
                    onclick: move |_| toasts.write().dismiss(id),
                    {
                        match phase {
                            ToastPhase::Loading => rsx! { span { class: "spinner" } },
                            ToastPhase::Success => rsx! { span { class: "toast-icon", "✓" } },
                            ToastPhase::Error => rsx! { span { class: "toast-icon", "✕" } },
                        }
                    }
                    span { class: "toast-message", "{message}" }
                }
            }
        }
    }
}

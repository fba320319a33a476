use dioxus::prelude::*;

use crate::dispatch::InFlight;
use crate::notify::Toasts;
use crate::reads::DrawSnapshot;
use crate::session::end_session;
use crate::state::SessionState;
use crate::view_state::truncate_address;

#[component]
pub fn Header() -> Element {
    let mut session = use_context::<Signal<SessionState>>();
    let mut snapshot = use_context::<Signal<DrawSnapshot>>();
    let mut in_flight = use_context::<Signal<InFlight>>();
    let mut toasts = use_context::<Signal<Toasts>>();

    let user = session.read().wallet.map(truncate_address).unwrap_or_default();

    let log_out = move |_| {
        end_session(
            &mut session.write(),
            &mut snapshot.write(),
            &mut in_flight.write(),
            &mut toasts.write(),
        );
    };

    rsx! {
        header { class: "topbar",
            div { class: "topbar-left",
                span { class: "brand-icon", "◈" }
                div {
                    h1 { class: "brand-text", "Defi Raffle" }
                    p { class: "topbar-user", "User: {user}" }
                }
            }
            nav { class: "topbar-nav",
                NavButton { title: "Buy Tickets", active: true }
                NavButton { title: "Log Out", onclick: log_out }
            }
        }
    }
}

#[component]
fn NavButton(
    title: &'static str,
    #[props(default)] active: bool,
    onclick: Option<EventHandler<MouseEvent>>,
) -> Element {
    rsx! {
        button {
            class: if active { "nav-button nav-button-active" } else { "nav-button" },
            onclick: move |e| {
                if let Some(handler) = onclick {
                    handler.call(e);
                }
            },
            "{title}"
        }
    }
}

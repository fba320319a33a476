use dioxus::prelude::*;

use crate::session::request_wallet;
use crate::state::{SessionState, SharedRaffleClient};

#[component]
pub fn Login() -> Element {
    let mut session = use_context::<Signal<SessionState>>();
    let client = use_context::<SharedRaffleClient>();

    let connecting = session.read().connecting;

    let connect = move |_| {
        let client = client.clone();
        spawn(async move {
            session.write().connecting = true;
            session.write().last_error = None;

            let result = request_wallet(client).await;

            session.write().connecting = false;
            match result {
                Ok(address) => {
                    tracing::info!(wallet = ?address, "wallet connected");
                    session.write().wallet = Some(address);
                }
                Err(e) => {
                    tracing::error!(error = %e, "wallet connection failed");
                    session.write().last_error = Some(e.to_string());
                }
            }
        });
    };

    rsx! {
        div { class: "gate-page",
            div { class: "gate-brand gate-brand-column",
                span { class: "brand-icon brand-icon-large", "◈" }
                h1 { class: "gate-title", "Defi Raffle" }
                h2 { class: "subtitle", "Get started by logging in with your wallet" }

                button {
                    class: "btn btn-login",
                    disabled: connecting,
                    onclick: connect,
                    if connecting {
                        span { class: "spinner" }
                        "Connecting..."
                    } else {
                        "Login with Wallet"
                    }
                }
            }
            if let Some(msg) = session.read().last_error.as_ref() {
                p { class: "error-text", "{msg}" }
            }
        }
    }
}

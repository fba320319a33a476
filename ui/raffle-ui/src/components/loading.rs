use dioxus::prelude::*;

use crate::state::{ContractStatus, SessionState};

#[component]
pub fn Loading() -> Element {
    let session = use_context::<Signal<SessionState>>();
    let status = session.read().contract_status.clone();

    rsx! {
        div { class: "gate-page",
            div { class: "gate-brand",
                span { class: "brand-icon", "◈" }
                h1 { class: "gate-title-small", "Loading the Raffle, hold on tight!" }
            }
            {
                match status {
                    ContractStatus::Error(msg) => rsx! {
                        p { class: "error-text", "Could not reach the raffle contract: {msg}" }
                        p { class: "hint", "Check RAFFLE_RPC_URL and RAFFLE_CONTRACT_ADDRESS, then restart." }
                    },
                    _ => rsx! {
                        span { class: "spinner spinner-large" }
                    },
                }
            }
        }
    }
}

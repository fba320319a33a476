use dioxus::prelude::*;

use crate::config::AppConfig;
use crate::contract::ReadQuery;
use crate::dispatch::{dispatch, Confirmation, InFlight};
use crate::hooks::use_contract_reads;
use crate::notify::Toasts;
use crate::reads::DrawSnapshot;
use crate::state::{SessionState, SharedRaffleClient};
use crate::transaction::WriteCall;
use crate::view_state::format_amount;

/// Operator-only panel. The caller decides whether to mount it.
#[component]
pub fn AdminControls() -> Element {
    use_contract_reads(vec![ReadQuery::OperatorTotalCommission]);
    let snapshot = use_context::<Signal<DrawSnapshot>>();
    let config = use_context::<AppConfig>();

    let commission = snapshot.read().operator_commission().map(format_amount);

    rsx! {
        div { class: "admin-panel",
            h2 { class: "admin-title", "Admin Controls" }
            p { class: "admin-commission",
                "Total Commission to be withdrawn: "
                if let Some(commission) = commission {
                    "{commission} {config.currency}"
                }
            }
            div { class: "admin-actions",
                AdminButton { label: "Draw Winner", icon: "★", call: WriteCall::DrawWinnerTicket }
                AdminButton { label: "Withdraw Commission", icon: "$", call: WriteCall::WithdrawCommission }
                AdminButton { label: "Restart Draw", icon: "↻", call: WriteCall::RestartDraw }
                AdminButton { label: "Refund All", icon: "⤺", call: WriteCall::RefundAll }
            }
        }
    }
}

#[component]
fn AdminButton(label: &'static str, icon: &'static str, call: WriteCall) -> Element {
    let session = use_context::<Signal<SessionState>>();
    let config = use_context::<AppConfig>();
    let client = use_context::<SharedRaffleClient>();
    let toasts = use_context::<Signal<Toasts>>();
    let in_flight = use_context::<Signal<InFlight>>();

    let busy = in_flight.read().contains(call.kind());
    let confirm_attempts = config.confirm_attempts;

    let onclick = move |_| {
        let client = client.clone();
        let call = call.clone();
        let wallet = session.peek().wallet;
        let mut toasts = toasts;
        let mut in_flight = in_flight;
        spawn_forever(async move {
            dispatch(
                client,
                wallet,
                call,
                &mut toasts,
                &mut in_flight,
                Confirmation::every_second(confirm_attempts),
            )
            .await;
        });
    };

    rsx! {
        button { class: "btn admin-button", disabled: busy, onclick,
            span { class: "admin-icon", "{icon}" }
            "{label}"
        }
    }
}

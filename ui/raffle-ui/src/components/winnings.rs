use dioxus::prelude::*;

use crate::config::AppConfig;
use crate::contract::ReadQuery;
use crate::dispatch::{dispatch, Confirmation, InFlight};
use crate::hooks::use_contract_reads;
use crate::notify::Toasts;
use crate::reads::DrawSnapshot;
use crate::state::{SessionState, SharedRaffleClient};
use crate::transaction::{WriteCall, WriteKind};
use crate::view_state::format_amount;

/// Shown only while the connected wallet has unclaimed winnings.
#[component]
pub fn WithdrawBanner() -> Element {
    let session = use_context::<Signal<SessionState>>();
    let wallet = session.read().wallet;
    use_contract_reads(wallet.map(ReadQuery::WinningsFor).into_iter().collect());

    let snapshot = use_context::<Signal<DrawSnapshot>>();
    let config = use_context::<AppConfig>();
    let client = use_context::<SharedRaffleClient>();
    let toasts = use_context::<Signal<Toasts>>();
    let in_flight = use_context::<Signal<InFlight>>();

    let winnings = wallet
        .and_then(|w| snapshot.read().winnings_for(w))
        .filter(|amount| !amount.is_zero());
    let Some(amount) = winnings.map(format_amount) else {
        return rsx! {};
    };
    let withdrawing = in_flight.read().contains(WriteKind::WithdrawWinnings);
    let confirm_attempts = config.confirm_attempts;

    let withdraw = move |_| {
        let client = client.clone();
        let mut toasts = toasts;
        let mut in_flight = in_flight;
        spawn_forever(async move {
            dispatch(
                client,
                wallet,
                WriteCall::WithdrawWinnings,
                &mut toasts,
                &mut in_flight,
                Confirmation::every_second(confirm_attempts),
            )
            .await;
        });
    };

    rsx! {
        div { class: "winnings-banner",
            button {
                class: "btn btn-winnings pulse",
                disabled: withdrawing,
                onclick: withdraw,
                p { class: "winnings-title", "Winner Winner Chicken Dinner!" }
                p { "Total Winnings: {amount} {config.currency}" }
                br {}
                p { class: "winnings-cta", "Click here to withdraw" }
            }
        }
    }
}

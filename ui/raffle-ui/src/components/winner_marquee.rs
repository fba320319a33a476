use dioxus::prelude::*;

use crate::config::AppConfig;
use crate::contract::ReadQuery;
use crate::hooks::use_contract_reads;
use crate::reads::DrawSnapshot;
use crate::view_state::{display_address, format_amount};

#[component]
pub fn WinnerMarquee() -> Element {
    use_contract_reads(vec![ReadQuery::LastWinner, ReadQuery::LastWinnerAmount]);
    let snapshot = use_context::<Signal<DrawSnapshot>>();
    let config = use_context::<AppConfig>();

    let winner = snapshot
        .read()
        .last_winner()
        .map(display_address)
        .unwrap_or_default();
    let amount = snapshot.read().last_winner_amount().map(format_amount);

    rsx! {
        div { class: "marquee",
            div { class: "marquee-track",
                h4 { class: "marquee-item", "Last Winner: {winner}" }
                h4 { class: "marquee-item",
                    "Previous Winnings: "
                    if let Some(amount) = amount {
                        "{amount} {config.currency}"
                    }
                }
            }
        }
    }
}

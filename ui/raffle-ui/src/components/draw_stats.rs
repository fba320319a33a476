use dioxus::prelude::*;

use super::countdown_timer::CountdownTimer;
use crate::config::AppConfig;
use crate::contract::ReadQuery;
use crate::hooks::use_contract_reads;
use crate::reads::DrawSnapshot;
use crate::view_state::format_amount;

#[component]
pub fn NextDraw() -> Element {
    use_contract_reads(vec![
        ReadQuery::CurrentWinningReward,
        ReadQuery::RemainingTickets,
    ]);
    let snapshot = use_context::<Signal<DrawSnapshot>>();
    let config = use_context::<AppConfig>();

    let pool = snapshot.read().current_pool().map(format_amount);
    let remaining = snapshot.read().remaining_tickets();

    rsx! {
        div { class: "stats-container",
            h1 { class: "stats-title", "The Next Draw" }
            div { class: "stats-row",
                div { class: "stats",
                    h2 { class: "stats-label", "Total Pool" }
                    p { class: "stats-value",
                        if let Some(pool) = pool {
                            "{pool} {config.currency}"
                        }
                    }
                }
                div { class: "stats",
                    h2 { class: "stats-label", "Tickets Remaining" }
                    p { class: "stats-value",
                        if let Some(n) = remaining {
                            "{n}"
                        }
                    }
                }
            }
            div { class: "countdown-wrap",
                CountdownTimer {}
            }
        }
    }
}

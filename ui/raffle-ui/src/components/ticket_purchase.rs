use std::time::Duration;

use dioxus::prelude::*;

use crate::config::AppConfig;
use crate::contract::ReadQuery;
use crate::countdown::unix_now;
use crate::dispatch::{purchase, Confirmation, InFlight};
use crate::hooks::use_contract_reads;
use crate::notify::Toasts;
use crate::reads::DrawSnapshot;
use crate::state::{SessionState, SharedRaffleClient};
use crate::transaction::WriteKind;
use crate::view_state::{
    count_tickets, format_amount, parse_quantity, purchase_enabled, total_cost, MAX_QUANTITY,
};

#[component]
pub fn TicketPurchase() -> Element {
    use_contract_reads(vec![
        ReadQuery::TicketPrice,
        ReadQuery::TicketCommission,
        ReadQuery::OperatorTotalCommission,
        ReadQuery::RemainingTickets,
        ReadQuery::Expiration,
        ReadQuery::Tickets,
    ]);
    let session = use_context::<Signal<SessionState>>();
    let snapshot = use_context::<Signal<DrawSnapshot>>();
    let config = use_context::<AppConfig>();
    let client = use_context::<SharedRaffleClient>();
    let toasts = use_context::<Signal<Toasts>>();
    let in_flight = use_context::<Signal<InFlight>>();
    let mut quantity = use_signal(|| 1u32);
    let mut now = use_signal(unix_now);

    // Re-render each second so the button closes with the countdown.
    use_future(move || async move {
        loop {
            tokio::time::sleep(Duration::from_secs(1)).await;
            now.set(unix_now());
        }
    });

    let wallet = session.read().wallet;
    let snap = snapshot.read();
    let price = snap.ticket_price();
    let remaining = snap.remaining_tickets();
    let expiration = snap.expiration();
    let commission = snap.ticket_commission().map(format_amount);
    let network_fees = snap.operator_commission().map(format_amount);
    let my_tickets = count_tickets(snap.tickets(), wallet);
    drop(snap);

    let qty = *quantity.read();
    let price_text = price.map(format_amount);
    let cost_text = price.and_then(|p| total_cost(p, qty)).map(format_amount);
    let buying = in_flight.read().contains(WriteKind::BuyTickets);
    let enabled = purchase_enabled(expiration, remaining, *now.read()) && !buying;
    let currency = config.currency.clone();
    let confirm_attempts = config.confirm_attempts;

    let buy_label = match &cost_text {
        Some(cost) => format!("Buy {qty} Tickets for {cost} {currency}"),
        None => format!("Buy {qty} Tickets"),
    };

    let on_buy = move |_| {
        let client = client.clone();
        let mut toasts = toasts;
        let mut in_flight = in_flight;
        // Outlives this component so a log out cannot cut the write short.
        spawn_forever(async move {
            purchase(
                client,
                wallet,
                qty,
                price,
                remaining,
                &mut toasts,
                &mut in_flight,
                Confirmation::every_second(confirm_attempts),
            )
            .await;
        });
    };

    rsx! {
        div { class: "stats-container purchase-card",
            div { class: "stats-container-inner",
                div { class: "purchase-row",
                    h2 { "Price per ticket" }
                    p {
                        if let Some(price) = price_text {
                            "{price} {currency}"
                        }
                    }
                }

                div { class: "purchase-input-row",
                    p { "TICKETS" }
                    input {
                        class: "ticket-input",
                        r#type: "number",
                        min: "1",
                        max: "{MAX_QUANTITY}",
                        value: "{qty}",
                        oninput: move |e| {
                            if let Some(n) = parse_quantity(&e.value()) {
                                quantity.set(n);
                            }
                        },
                    }
                }

                div { class: "purchase-breakdown",
                    div { class: "purchase-line purchase-total",
                        p { "Total cost of tickets" }
                        p {
                            if let Some(cost) = cost_text {
                                "{cost}"
                            }
                        }
                    }
                    div { class: "purchase-line",
                        p { "Service fees" }
                        p {
                            if let Some(fee) = commission {
                                "{fee} {currency}"
                            }
                        }
                    }
                    div { class: "purchase-line",
                        p { "+ Network Fees" }
                        p {
                            if let Some(fees) = network_fees {
                                "{fees} {currency}"
                            }
                        }
                    }
                }

                button {
                    class: "btn btn-buy",
                    disabled: !enabled,
                    onclick: on_buy,
                    if buying {
                        span { class: "spinner" }
                    }
                    "{buy_label}"
                }
            }

            if my_tickets > 0 {
                div { class: "stats my-tickets",
                    p { class: "my-tickets-title", "You have {my_tickets} Tickets in this draw" }
                    div { class: "ticket-grid",
                        for n in 1..=my_tickets {
                            p { key: "{n}", class: "ticket-chip", "{n}" }
                        }
                    }
                }
            }
        }
    }
}

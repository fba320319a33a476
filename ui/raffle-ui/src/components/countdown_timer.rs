use std::time::Duration;

use dioxus::prelude::*;

use crate::contract::ReadQuery;
use crate::countdown::{advance, unix_now, Countdown, CountdownState, Digits};
use crate::hooks::use_contract_reads;
use crate::reads::DrawSnapshot;

const TICK: Duration = Duration::from_secs(1);

#[component]
pub fn CountdownTimer() -> Element {
    use_contract_reads(vec![ReadQuery::Expiration]);
    let snapshot = use_context::<Signal<DrawSnapshot>>();
    let mut countdown = use_signal(|| None::<Countdown>);

    use_future(move || async move {
        loop {
            let target = snapshot.peek().expiration();
            countdown.with_mut(|slot| advance(slot, target, unix_now()));
            tokio::time::sleep(TICK).await;
        }
    });

    // Unresolved expiration: render nothing rather than garbage digits.
    let Some(current) = countdown.read().clone() else {
        return rsx! {};
    };
    let Digits {
        hours,
        minutes,
        seconds,
    } = current.digits();

    match current.state() {
        CountdownState::Completed => rsx! {
            div { class: "countdown-box",
                h2 { class: "countdown-closed pulse",
                    "Ticket Sales have now CLOSED for this draw. Sorry :("
                }
                DigitRow { hours, minutes, seconds, closed: true }
            }
        },
        CountdownState::Counting => rsx! {
            div { class: "countdown-box",
                h3 { class: "countdown-heading", "Time Remaining" }
                DigitRow { hours, minutes, seconds, closed: false }
            }
        },
    }
}

#[component]
fn DigitRow(hours: u64, minutes: u64, seconds: u64, closed: bool) -> Element {
    let digit_class = if closed { "countdown pulse" } else { "countdown" };

    rsx! {
        div { class: "countdown-row",
            div { class: "countdown-cell",
                div { class: digit_class, "{hours}" }
                div { class: "countdown-label", "hours" }
            }
            div { class: "countdown-cell",
                div { class: digit_class, "{minutes}" }
                div { class: "countdown-label", "minutes" }
            }
            div { class: "countdown-cell",
                div { class: digit_class, "{seconds}" }
                div { class: "countdown-label", "seconds" }
            }
        }
    }
}

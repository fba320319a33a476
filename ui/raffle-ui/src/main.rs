#![allow(non_snake_case)]

mod components;
mod config;
mod contract;
mod countdown;
mod dispatch;
mod error;
mod hooks;
mod notify;
mod reads;
mod session;
mod state;
mod transaction;
mod view_state;

use std::sync::{Arc, Mutex};

use dioxus::prelude::*;

use config::AppConfig;
use contract::ReadQuery;
use dispatch::InFlight;
use hooks::{use_contract_reads, use_poller};
use notify::Toasts;
use reads::{DrawSnapshot, QueryRegistry};
use session::{open_contract, select_view, GateView};
use state::{ContractStatus, SessionState, SharedRaffleClient};

const STYLE: &str = include_str!("../assets/style.css");

fn main() {
    if let Err(e) = dioxus::logger::init(tracing::Level::INFO) {
        eprintln!("failed to initialise logging: {e}");
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(
        rpc = %config.rpc_url,
        contract = ?config.contract_address,
        "starting raffle"
    );

    dioxus::LaunchBuilder::new().with_context(config).launch(App);
}

#[component]
fn App() -> Element {
    let config = use_context::<AppConfig>();

    // Provide shared state to all components
    let mut session = use_context_provider(|| Signal::new(SessionState::default()));
    use_context_provider(|| Signal::new(QueryRegistry::default()));
    use_context_provider(|| Signal::new(DrawSnapshot::default()));
    use_context_provider(|| Signal::new(Toasts::default()));
    use_context_provider(|| Signal::new(InFlight::default()));
    let client = use_context_provider::<SharedRaffleClient>(|| Arc::new(Mutex::new(None)));

    use_future(move || {
        let config = config.clone();
        let client = client.clone();
        async move {
            match open_contract(&config, client).await {
                Ok(()) => session.write().contract_status = ContractStatus::Ready,
                Err(e) => {
                    tracing::error!(error = %e, "failed to open raffle contract");
                    session.write().contract_status = ContractStatus::Error(e.to_string());
                }
            }
        }
    });

    let view = {
        let s = session.read();
        select_view(s.wallet, s.contract_loading())
    };

    rsx! {
        document::Style { {STYLE} }
        {
            match view {
                GateView::Loading => rsx! { components::loading::Loading {} },
                GateView::LoggedOut => rsx! { components::login::Login {} },
                GateView::Main => rsx! { MainView {} },
            }
        }
        components::toaster::Toaster {}
    }
}

// ---------------------------------------------------------------------------
// Main view: header + draw panels
// ---------------------------------------------------------------------------

#[component]
fn MainView() -> Element {
    let config = use_context::<AppConfig>();
    let client = use_context::<SharedRaffleClient>();
    use_poller(client, config.poll_interval);
    use_contract_reads(vec![ReadQuery::LotteryOperator]);

    let session = use_context::<Signal<SessionState>>();
    let snapshot = use_context::<Signal<DrawSnapshot>>();
    let operator = view_state::is_operator(session.read().wallet, snapshot.read().operator());

    rsx! {
        div { class: "app-container",
            components::layout::Header {}
            components::winner_marquee::WinnerMarquee {}

            div { class: "main-content",
                if operator {
                    div { class: "admin-row",
                        components::admin_controls::AdminControls {}
                    }
                }
                components::winnings::WithdrawBanner {}

                div { class: "draw-row",
                    components::draw_stats::NextDraw {}
                    components::ticket_purchase::TicketPurchase {}
                }
            }
        }
    }
}

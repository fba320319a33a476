//! Session gate and the wallet/contract session lifecycle.

use ethers_core::types::Address;

use crate::config::AppConfig;
use crate::contract::{with_client, EvmRaffleContract, RaffleContract, SharedContract};
use crate::dispatch::InFlight;
use crate::error::AppError;
use crate::notify::Toasts;
use crate::reads::DrawSnapshot;
use crate::state::{SessionState, SharedRaffleClient};

/// Which top-level view renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateView {
    Loading,
    LoggedOut,
    Main,
}

pub fn select_view(wallet: Option<Address>, contract_loading: bool) -> GateView {
    if contract_loading {
        GateView::Loading
    } else if wallet.is_none() {
        GateView::LoggedOut
    } else {
        GateView::Main
    }
}

/// Open the contract client once at start-up.
pub async fn open_contract(config: &AppConfig, client: SharedRaffleClient) -> Result<(), AppError> {
    let rpc_url = config.rpc_url.clone();
    let address = config.contract_address;
    tokio::task::spawn_blocking(move || {
        let contract = EvmRaffleContract::connect(&rpc_url, address)?;
        *client.lock().map_err(|_| AppError::Poisoned)? = Some(contract);
        Ok::<_, AppError>(())
    })
    .await?
}

/// Ask the wallet endpoint for an account; the first one becomes the
/// session's address.
pub async fn request_wallet<C: RaffleContract>(client: SharedContract<C>) -> Result<Address, AppError> {
    let accounts = with_client(client, |c| c.accounts()).await?;
    accounts.first().copied().ok_or(AppError::NoAccounts)
}

/// Tear the session down: forget the wallet, every derived value, and the
/// pending-write marks and loading toasts that belonged to it.
///
/// Writes already submitted keep running and still report their outcome.
pub fn end_session(
    session: &mut SessionState,
    snapshot: &mut DrawSnapshot,
    in_flight: &mut InFlight,
    toasts: &mut Toasts,
) {
    if let Some(wallet) = session.wallet.take() {
        tracing::info!(wallet = ?wallet, "wallet disconnected");
    }
    session.connecting = false;
    session.last_error = None;
    snapshot.clear();
    in_flight.clear();
    toasts.dismiss_loading();
}

//! Shared reactive state for the raffle UI.

use ethers_core::types::Address;

use crate::contract::{EvmRaffleContract, SharedContract};

/// Start-up state of the contract handle.
#[derive(Clone, Debug, PartialEq)]
pub enum ContractStatus {
    Loading,
    Ready,
    Error(String),
}

/// Session state, stored in a Dioxus `Signal`.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub wallet: Option<Address>,
    pub contract_status: ContractStatus,
    pub connecting: bool,
    pub last_error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            wallet: None,
            contract_status: ContractStatus::Loading,
            connecting: false,
            last_error: None,
        }
    }
}

impl SessionState {
    /// The gate keeps showing the loading view until the contract is ready,
    /// including when opening it failed.
    pub fn contract_loading(&self) -> bool {
        self.contract_status != ContractStatus::Ready
    }
}

/// Thread-safe handle to the raffle contract client.
pub type SharedRaffleClient = SharedContract<EvmRaffleContract>;

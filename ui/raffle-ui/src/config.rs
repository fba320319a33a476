//! Start-up configuration, read once from the environment.

use std::time::Duration;

use ethers_core::types::Address;

use crate::error::AppError;

/// Avalanche Fuji C-chain public endpoint.
pub const DEFAULT_RPC_URL: &str = "https://api.avax-test.network/ext/bc/C/rpc";
pub const DEFAULT_CURRENCY: &str = "AVAX";
const DEFAULT_POLL_SECS: u64 = 4;
const DEFAULT_CONFIRM_ATTEMPTS: u32 = 60;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub rpc_url: String,
    pub contract_address: Address,
    pub currency: String,
    pub poll_interval: Duration,
    /// Receipt polls (one per second) before a write is reported as timed out.
    pub confirm_attempts: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let contract_address = var("RAFFLE_CONTRACT_ADDRESS")
            .ok_or_else(|| AppError::Config("RAFFLE_CONTRACT_ADDRESS is not set".into()))?
            .trim()
            .parse::<Address>()
            .map_err(|e| AppError::Config(format!("RAFFLE_CONTRACT_ADDRESS: {e}")))?;

        let poll_secs = match var("RAFFLE_POLL_SECS") {
            Some(v) => parse_positive("RAFFLE_POLL_SECS", &v)?,
            None => DEFAULT_POLL_SECS,
        };
        let confirm_attempts = match var("RAFFLE_CONFIRM_ATTEMPTS") {
            Some(v) => parse_positive("RAFFLE_CONFIRM_ATTEMPTS", &v)? as u32,
            None => DEFAULT_CONFIRM_ATTEMPTS,
        };

        Ok(Self {
            rpc_url: var("RAFFLE_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            contract_address,
            currency: var("RAFFLE_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            poll_interval: Duration::from_secs(poll_secs),
            confirm_attempts,
        })
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64, AppError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 && n <= u32::MAX as u64 => Ok(n),
        _ => Err(AppError::Config(format!("{key} must be a positive integer"))),
    }
}

use raffle_rpc::RpcError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Rpc(#[from] RpcError),
    #[error("ABI decode error: {0}")]
    Abi(String),
    #[error("Contract client not ready")]
    NoClient,
    #[error("No wallet connected")]
    NoWallet,
    #[error("Wallet endpoint returned no accounts")]
    NoAccounts,
    #[error("No contract code at {0:?}")]
    NoContract(ethers_core::types::Address),
    #[error("Invalid purchase: {0}")]
    InvalidPurchase(String),
    #[error("Transaction {0:?} reverted")]
    Reverted(ethers_core::types::H256),
    #[error("Transaction {0:?} not confirmed in time")]
    ConfirmationTimeout(ethers_core::types::H256),
    #[error("Another {0} transaction is still pending")]
    Busy(&'static str),
    #[error("Contract client lock poisoned")]
    Poisoned,
    #[error("Background task failed: {0}")]
    Task(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ethers_core::abi::Error> for AppError {
    fn from(e: ethers_core::abi::Error) -> Self {
        Self::Abi(e.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Task(e.to_string())
    }
}

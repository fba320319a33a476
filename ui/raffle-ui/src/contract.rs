//! Typed facade over the raffle contract.
//!
//! Reads and writes go through the [`RaffleContract`] trait so the poller and
//! the dispatcher can run against an in-memory contract in tests. The real
//! implementation speaks JSON-RPC through `raffle-rpc`.

use std::sync::{Arc, Mutex};

use ethers_core::abi::{self, ParamType, Token};
use ethers_core::types::{Address, Bytes, H256, U256};
use raffle_rpc::{CallRequest, RpcClient, TxStatus};

use crate::error::AppError;
use crate::transaction::WriteCall;

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// A named contract read. Parameterised reads carry their argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReadQuery {
    RemainingTickets,
    CurrentWinningReward,
    TicketCommission,
    Expiration,
    TicketPrice,
    OperatorTotalCommission,
    Tickets,
    WinningsFor(Address),
    LastWinner,
    LastWinnerAmount,
    LotteryOperator,
}

/// A resolved read.
#[derive(Clone, Debug, PartialEq)]
pub enum ReadValue {
    Amount(U256),
    Address(Address),
    Addresses(Vec<Address>),
    Timestamp(u64),
    Count(u64),
}

impl ReadQuery {
    pub fn function(&self) -> &'static str {
        match self {
            Self::RemainingTickets => "RemainingTickets",
            Self::CurrentWinningReward => "CurrentWinningReward",
            Self::TicketCommission => "ticketCommission",
            Self::Expiration => "expiration",
            Self::TicketPrice => "ticketPrice",
            Self::OperatorTotalCommission => "operatorTotalCommission",
            Self::Tickets => "getTickets",
            Self::WinningsFor(_) => "getWinningsForAddress",
            Self::LastWinner => "lastWinner",
            Self::LastWinnerAmount => "lastWinnerAmount",
            Self::LotteryOperator => "lotteryOperator",
        }
    }

    fn output(&self) -> ParamType {
        match self {
            Self::Tickets => ParamType::Array(Box::new(ParamType::Address)),
            Self::LastWinner | Self::LotteryOperator => ParamType::Address,
            _ => ParamType::Uint(256),
        }
    }

    pub fn calldata(&self) -> Bytes {
        let (params, tokens) = match self {
            Self::WinningsFor(address) => (vec![ParamType::Address], vec![Token::Address(*address)]),
            _ => (Vec::new(), Vec::new()),
        };
        let mut data = abi::short_signature(self.function(), &params).to_vec();
        data.extend(abi::encode(&tokens));
        Bytes::from(data)
    }

    /// Decode the raw `eth_call` return data for this query.
    pub fn decode(&self, output: &[u8]) -> Result<ReadValue, AppError> {
        let mut tokens = abi::decode(&[self.output()], output)?;
        let token = tokens
            .pop()
            .ok_or_else(|| AppError::Abi(format!("{}: empty output", self.function())))?;

        let value = match (self, token) {
            (Self::Tickets, Token::Array(items)) => ReadValue::Addresses(
                items
                    .into_iter()
                    .filter_map(|t| t.into_address())
                    .collect(),
            ),
            (Self::LastWinner | Self::LotteryOperator, Token::Address(a)) => ReadValue::Address(a),
            (Self::Expiration, Token::Uint(v)) => ReadValue::Timestamp(narrow(self, v)?),
            (Self::RemainingTickets, Token::Uint(v)) => ReadValue::Count(narrow(self, v)?),
            (_, Token::Uint(v)) => ReadValue::Amount(v),
            (_, other) => {
                return Err(AppError::Abi(format!(
                    "{}: unexpected token {other:?}",
                    self.function()
                )))
            }
        };
        Ok(value)
    }
}

fn narrow(query: &ReadQuery, v: U256) -> Result<u64, AppError> {
    if v > U256::from(u64::MAX) {
        return Err(AppError::Abi(format!("{}: {v} does not fit in u64", query.function())));
    }
    Ok(v.as_u64())
}

// ---------------------------------------------------------------------------
// Contract handle
// ---------------------------------------------------------------------------

pub trait RaffleContract: Send + 'static {
    fn read(&mut self, query: ReadQuery) -> Result<ReadValue, AppError>;

    /// Accounts the connected wallet endpoint can sign for.
    fn accounts(&mut self) -> Result<Vec<Address>, AppError>;

    /// Submit a write from `from`; returns the transaction hash.
    fn submit(&mut self, from: Address, call: &WriteCall) -> Result<H256, AppError>;

    /// `None` while pending.
    fn status(&mut self, tx: H256) -> Result<Option<TxStatus>, AppError>;
}

/// Shared, lazily-populated contract handle, injected through context.
pub type SharedContract<C> = Arc<Mutex<Option<C>>>;

/// Run `f` against the shared contract on the blocking pool.
pub async fn with_client<C, T, F>(client: SharedContract<C>, f: F) -> Result<T, AppError>
where
    C: RaffleContract,
    T: Send + 'static,
    F: FnOnce(&mut C) -> Result<T, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = client.lock().map_err(|_| AppError::Poisoned)?;
        let contract = guard.as_mut().ok_or(AppError::NoClient)?;
        f(contract)
    })
    .await?
}

/// The raffle contract reached over JSON-RPC.
pub struct EvmRaffleContract {
    rpc: RpcClient,
    address: Address,
}

impl EvmRaffleContract {
    /// Open the endpoint and check that code is deployed at `address`.
    ///
    /// Blocking; call from `spawn_blocking`.
    pub fn connect(rpc_url: &str, address: Address) -> Result<Self, AppError> {
        let mut rpc = RpcClient::new(rpc_url)?;
        let chain_id = rpc.chain_id()?;
        if rpc.get_code(address)?.is_empty() {
            return Err(AppError::NoContract(address));
        }
        tracing::info!(chain_id, contract = ?address, url = rpc.url(), "raffle contract ready");
        Ok(Self { rpc, address })
    }
}

impl RaffleContract for EvmRaffleContract {
    fn read(&mut self, query: ReadQuery) -> Result<ReadValue, AppError> {
        let call = CallRequest {
            to: self.address,
            data: query.calldata(),
            ..Default::default()
        };
        let output = self.rpc.call(&call)?;
        query.decode(&output)
    }

    fn accounts(&mut self) -> Result<Vec<Address>, AppError> {
        Ok(self.rpc.accounts()?)
    }

    fn submit(&mut self, from: Address, call: &WriteCall) -> Result<H256, AppError> {
        let request = call.to_request(from, self.address);
        let hash = self.rpc.send_transaction(&request)?;
        tracing::debug!(tx = ?hash, kind = ?call.kind(), "transaction submitted");
        Ok(hash)
    }

    fn status(&mut self, tx: H256) -> Result<Option<TxStatus>, AppError> {
        Ok(self.rpc.transaction_status(tx)?)
    }
}

// ---------------------------------------------------------------------------
// In-memory contract for tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub mod mock {
    use std::collections::{HashMap, VecDeque};

    use raffle_rpc::RpcError;

    use super::*;

    fn rpc_error(message: &str) -> AppError {
        AppError::Rpc(RpcError::Rpc {
            code: -32000,
            message: message.to_string(),
        })
    }

    #[derive(Default)]
    pub struct MockContract {
        pub reads: HashMap<ReadQuery, Result<ReadValue, String>>,
        pub accounts: Vec<Address>,
        pub submit_error: Option<String>,
        /// Receipt statuses handed out in order; once drained every poll
        /// reports success.
        pub statuses: VecDeque<Option<TxStatus>>,
        pub submitted: Vec<(Address, WriteCall)>,
    }

    impl MockContract {
        pub fn with_read(mut self, query: ReadQuery, value: ReadValue) -> Self {
            self.reads.insert(query, Ok(value));
            self
        }

        pub fn with_failing_read(mut self, query: ReadQuery, message: &str) -> Self {
            self.reads.insert(query, Err(message.to_string()));
            self
        }
    }

    impl RaffleContract for MockContract {
        fn read(&mut self, query: ReadQuery) -> Result<ReadValue, AppError> {
            match self.reads.get(&query) {
                Some(Ok(value)) => Ok(value.clone()),
                Some(Err(message)) => Err(rpc_error(message)),
                None => Err(rpc_error("execution reverted")),
            }
        }

        fn accounts(&mut self) -> Result<Vec<Address>, AppError> {
            Ok(self.accounts.clone())
        }

        fn submit(&mut self, from: Address, call: &WriteCall) -> Result<H256, AppError> {
            if let Some(message) = &self.submit_error {
                return Err(rpc_error(message));
            }
            self.submitted.push((from, call.clone()));
            Ok(H256::from_low_u64_be(self.submitted.len() as u64))
        }

        fn status(&mut self, _tx: H256) -> Result<Option<TxStatus>, AppError> {
            Ok(self.statuses.pop_front().unwrap_or(Some(TxStatus::Success)))
        }
    }

    pub fn shared(contract: MockContract) -> SharedContract<MockContract> {
        Arc::new(Mutex::new(Some(contract)))
    }
}

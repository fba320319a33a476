//! Raffle write calls: ABI calldata plus the attached payment.

use ethers_core::abi::{self, ParamType, Token};
use ethers_core::types::{Address, Bytes, U256};
use raffle_rpc::CallRequest;

use crate::error::AppError;
use crate::view_state::total_cost;

/// Identifies a write independent of its arguments; used for the in-flight
/// guard and toast text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WriteKind {
    BuyTickets,
    WithdrawWinnings,
    DrawWinnerTicket,
    WithdrawCommission,
    RestartDraw,
    RefundAll,
}

impl WriteKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::BuyTickets => "ticket purchase",
            Self::WithdrawWinnings => "winnings withdrawal",
            Self::DrawWinnerTicket => "winner draw",
            Self::WithdrawCommission => "commission withdrawal",
            Self::RestartDraw => "draw restart",
            Self::RefundAll => "refund",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum WriteCall {
    BuyTickets { quantity: u32, payment: U256 },
    WithdrawWinnings,
    DrawWinnerTicket,
    WithdrawCommission,
    RestartDraw,
    RefundAll,
}

impl WriteCall {
    /// Build a ticket purchase. Payment is `quantity * price` in base units.
    ///
    /// `remaining` is the last known remaining-ticket count; when it is not
    /// yet resolved the quantity is only checked for being positive.
    pub fn purchase(quantity: u32, price: U256, remaining: Option<u64>) -> Result<Self, AppError> {
        if quantity == 0 {
            return Err(AppError::InvalidPurchase("quantity must be at least 1".into()));
        }
        if let Some(remaining) = remaining {
            if u64::from(quantity) > remaining {
                return Err(AppError::InvalidPurchase(format!(
                    "only {remaining} tickets remaining"
                )));
            }
        }
        let payment = total_cost(price, quantity)
            .ok_or_else(|| AppError::InvalidPurchase("payment overflows".into()))?;
        Ok(Self::BuyTickets { quantity, payment })
    }

    pub fn kind(&self) -> WriteKind {
        match self {
            Self::BuyTickets { .. } => WriteKind::BuyTickets,
            Self::WithdrawWinnings => WriteKind::WithdrawWinnings,
            Self::DrawWinnerTicket => WriteKind::DrawWinnerTicket,
            Self::WithdrawCommission => WriteKind::WithdrawCommission,
            Self::RestartDraw => WriteKind::RestartDraw,
            Self::RefundAll => WriteKind::RefundAll,
        }
    }

    fn function(&self) -> &'static str {
        match self {
            Self::BuyTickets { .. } => "BuyTickets",
            Self::WithdrawWinnings => "WithdrawWinnings",
            Self::DrawWinnerTicket => "DrawWinnerTicket",
            Self::WithdrawCommission => "WithdrawCommission",
            Self::RestartDraw => "restartDraw",
            Self::RefundAll => "RefundAll",
        }
    }

    fn arguments(&self) -> (Vec<ParamType>, Vec<Token>) {
        match self {
            Self::BuyTickets { quantity, .. } => (
                vec![ParamType::Uint(256)],
                vec![Token::Uint(U256::from(*quantity))],
            ),
            _ => (Vec::new(), Vec::new()),
        }
    }

    /// 4-byte selector followed by the ABI-encoded arguments.
    pub fn calldata(&self) -> Bytes {
        let (params, tokens) = self.arguments();
        let mut data = abi::short_signature(self.function(), &params).to_vec();
        data.extend(abi::encode(&tokens));
        Bytes::from(data)
    }

    pub fn value(&self) -> Option<U256> {
        match self {
            Self::BuyTickets { payment, .. } => Some(*payment),
            _ => None,
        }
    }

    pub fn to_request(&self, from: Address, contract: Address) -> CallRequest {
        CallRequest {
            from: Some(from),
            to: contract,
            data: self.calldata(),
            value: self.value(),
        }
    }
}

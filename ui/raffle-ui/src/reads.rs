//! Subscription-driven contract reads.
//!
//! Components register the queries they render with a [`QueryRegistry`] for
//! as long as they are mounted. The poller reads every active query on each
//! tick and folds the results into a [`DrawSnapshot`], which is the only
//! place resolved values live.

use std::collections::{BTreeMap, HashMap};

use ethers_core::types::{Address, U256};

use crate::contract::{RaffleContract, ReadQuery, ReadValue};
use crate::error::AppError;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Queries held by one mounted component.
#[derive(Clone, Debug, PartialEq)]
pub struct Subscription {
    queries: Vec<ReadQuery>,
}

/// Reference-counted interest in named queries.
#[derive(Clone, Debug, Default)]
pub struct QueryRegistry {
    interest: BTreeMap<ReadQuery, usize>,
}

impl QueryRegistry {
    pub fn subscribe(&mut self, queries: impl IntoIterator<Item = ReadQuery>) -> Subscription {
        let queries: Vec<ReadQuery> = queries.into_iter().collect();
        for query in &queries {
            *self.interest.entry(*query).or_default() += 1;
        }
        Subscription { queries }
    }

    pub fn unsubscribe(&mut self, subscription: &Subscription) {
        for query in &subscription.queries {
            if let Some(count) = self.interest.get_mut(query) {
                *count -= 1;
                if *count == 0 {
                    self.interest.remove(query);
                }
            }
        }
    }

    pub fn active(&self) -> Vec<ReadQuery> {
        self.interest.keys().copied().collect()
    }

    pub fn is_active(&self, query: &ReadQuery) -> bool {
        self.interest.contains_key(query)
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Latest resolved value of every subscribed query. A missing entry means
/// "not resolved yet".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawSnapshot {
    values: HashMap<ReadQuery, ReadValue>,
}

impl DrawSnapshot {
    /// Fold one poll's results in. Failed reads keep their previous value;
    /// values nobody subscribes to any more are dropped.
    pub fn apply(
        &mut self,
        results: Vec<(ReadQuery, Result<ReadValue, AppError>)>,
        registry: &QueryRegistry,
    ) {
        for (query, result) in results {
            match result {
                Ok(value) => {
                    self.values.insert(query, value);
                }
                Err(e) => {
                    tracing::warn!(query = query.function(), error = %e, "contract read failed");
                }
            }
        }
        self.values.retain(|query, _| registry.is_active(query));
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    fn amount(&self, query: ReadQuery) -> Option<U256> {
        match self.values.get(&query)? {
            ReadValue::Amount(v) => Some(*v),
            _ => None,
        }
    }

    fn address(&self, query: ReadQuery) -> Option<Address> {
        match self.values.get(&query)? {
            ReadValue::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn remaining_tickets(&self) -> Option<u64> {
        match self.values.get(&ReadQuery::RemainingTickets)? {
            ReadValue::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn current_pool(&self) -> Option<U256> {
        self.amount(ReadQuery::CurrentWinningReward)
    }

    pub fn ticket_commission(&self) -> Option<U256> {
        self.amount(ReadQuery::TicketCommission)
    }

    pub fn expiration(&self) -> Option<u64> {
        match self.values.get(&ReadQuery::Expiration)? {
            ReadValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn ticket_price(&self) -> Option<U256> {
        self.amount(ReadQuery::TicketPrice)
    }

    pub fn operator_commission(&self) -> Option<U256> {
        self.amount(ReadQuery::OperatorTotalCommission)
    }

    pub fn tickets(&self) -> Option<&[Address]> {
        match self.values.get(&ReadQuery::Tickets)? {
            ReadValue::Addresses(list) => Some(list.as_slice()),
            _ => None,
        }
    }

    pub fn winnings_for(&self, address: Address) -> Option<U256> {
        self.amount(ReadQuery::WinningsFor(address))
    }

    pub fn last_winner(&self) -> Option<Address> {
        self.address(ReadQuery::LastWinner)
    }

    pub fn last_winner_amount(&self) -> Option<U256> {
        self.amount(ReadQuery::LastWinnerAmount)
    }

    pub fn operator(&self) -> Option<Address> {
        self.address(ReadQuery::LotteryOperator)
    }
}

/// Run every query once. Each result is independent; one failing read does
/// not stop the rest.
pub fn read_all<C: RaffleContract>(
    contract: &mut C,
    queries: &[ReadQuery],
) -> Vec<(ReadQuery, Result<ReadValue, AppError>)> {
    queries
        .iter()
        .map(|query| (*query, contract.read(*query)))
        .collect()
}

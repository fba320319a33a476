//! Write dispatch with loading → success | error notifications.
//!
//! Every failure ends in exactly one error toast under the same id as the
//! loading toast, plus an error log line. Nothing is retried.

use std::collections::BTreeSet;
use std::time::Duration;

use dioxus::prelude::*;
use ethers_core::types::{Address, H256, U256};
use raffle_rpc::TxStatus;

use crate::contract::{with_client, RaffleContract, SharedContract};
use crate::error::AppError;
use crate::notify::{Notify, ToastId};
use crate::transaction::{WriteCall, WriteKind};

pub const FAILURE_MESSAGE: &str = "Whoops, something went wrong!";

/// Toast text for one kind of write.
pub struct Messages {
    pub pending: &'static str,
    pub success: &'static str,
}

pub fn messages(kind: WriteKind) -> Messages {
    let (pending, success) = match kind {
        WriteKind::BuyTickets => ("Buying your tickets...", "Tickets purchased successfully!"),
        WriteKind::WithdrawWinnings => (
            "Withdrawing your winnings...",
            "Winning withdrawn successfully!",
        ),
        WriteKind::DrawWinnerTicket => ("Picking the lucky winner...", "A winner has been selected!"),
        WriteKind::WithdrawCommission => (
            "Withdrawing commission...",
            "Your commission has been withdrawn successfully!",
        ),
        WriteKind::RestartDraw => ("Restarting draw...", "Draw restarted successfully!"),
        WriteKind::RefundAll => ("Refunding all...", "All refunded successfully!"),
    };
    Messages { pending, success }
}

/// Receipt polling schedule.
#[derive(Clone, Copy, Debug)]
pub struct Confirmation {
    pub attempts: u32,
    pub interval: Duration,
}

impl Confirmation {
    pub fn every_second(attempts: u32) -> Self {
        Self {
            attempts,
            interval: Duration::from_secs(1),
        }
    }
}

// ---------------------------------------------------------------------------
// In-flight guard
// ---------------------------------------------------------------------------

/// Write kinds with a transaction currently pending.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InFlight {
    kinds: BTreeSet<WriteKind>,
}

impl InFlight {
    pub fn contains(&self, kind: WriteKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn clear(&mut self) {
        self.kinds.clear();
    }
}

pub trait Pending {
    /// Mark `kind` as pending; `false` if it already was.
    fn begin(&mut self, kind: WriteKind) -> bool;
    fn finish(&mut self, kind: WriteKind);
}

impl Pending for InFlight {
    fn begin(&mut self, kind: WriteKind) -> bool {
        self.kinds.insert(kind)
    }

    fn finish(&mut self, kind: WriteKind) {
        self.kinds.remove(&kind);
    }
}

// `try_write` because `finish` also runs from `Drop`, possibly after the
// signal's owner is gone.
impl Pending for Signal<InFlight> {
    fn begin(&mut self, kind: WriteKind) -> bool {
        self.try_write().is_ok_and(|mut in_flight| in_flight.begin(kind))
    }

    fn finish(&mut self, kind: WriteKind) {
        if let Ok(mut in_flight) = self.try_write() {
            in_flight.finish(kind);
        }
    }
}

/// Settles one write: releases the in-flight mark and replaces the loading
/// toast. If the write future is dropped before it settles, `Drop` does it
/// with the failure message.
struct Settlement<'a, N: Notify, P: Pending> {
    notify: &'a mut N,
    pending: &'a mut P,
    kind: WriteKind,
    id: ToastId,
    settled: bool,
}

impl<N: Notify, P: Pending> Settlement<'_, N, P> {
    fn succeed(mut self, message: &str) {
        self.settled = true;
        self.notify.success(self.id, message);
    }

    fn fail(mut self) {
        self.settled = true;
        self.notify.error(self.id, FAILURE_MESSAGE);
    }
}

impl<N: Notify, P: Pending> Drop for Settlement<'_, N, P> {
    fn drop(&mut self) {
        self.pending.finish(self.kind);
        if !self.settled {
            tracing::warn!(kind = ?self.kind, "write abandoned before confirmation");
            self.notify.error(self.id, FAILURE_MESSAGE);
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Submit `call` from `from` and wait for its receipt.
///
/// Returns the transaction hash on success. `None` covers every failure as
/// well as a refused double submission (which shows no toast).
pub async fn dispatch<C, N, P>(
    client: SharedContract<C>,
    from: Option<Address>,
    call: WriteCall,
    notify: &mut N,
    pending: &mut P,
    confirmation: Confirmation,
) -> Option<H256>
where
    C: RaffleContract,
    N: Notify,
    P: Pending,
{
    run(client, from, call.kind(), Ok(call), notify, pending, confirmation).await
}

/// Buy `quantity` tickets at `price` each.
///
/// Does nothing until the ticket price has resolved. An invalid quantity is
/// reported through the usual error toast.
#[allow(clippy::too_many_arguments)]
pub async fn purchase<C, N, P>(
    client: SharedContract<C>,
    from: Option<Address>,
    quantity: u32,
    price: Option<U256>,
    remaining: Option<u64>,
    notify: &mut N,
    pending: &mut P,
    confirmation: Confirmation,
) -> Option<H256>
where
    C: RaffleContract,
    N: Notify,
    P: Pending,
{
    let price = price?;
    let call = WriteCall::purchase(quantity, price, remaining);
    run(
        client,
        from,
        WriteKind::BuyTickets,
        call,
        notify,
        pending,
        confirmation,
    )
    .await
}

#[allow(clippy::too_many_arguments)]
async fn run<C, N, P>(
    client: SharedContract<C>,
    from: Option<Address>,
    kind: WriteKind,
    call: Result<WriteCall, AppError>,
    notify: &mut N,
    pending: &mut P,
    confirmation: Confirmation,
) -> Option<H256>
where
    C: RaffleContract,
    N: Notify,
    P: Pending,
{
    if !pending.begin(kind) {
        tracing::warn!(error = %AppError::Busy(kind.label()), "write refused");
        return None;
    }

    let text = messages(kind);
    let id = notify.loading(text.pending);
    let settlement = Settlement {
        notify,
        pending,
        kind,
        id,
        settled: false,
    };

    match submit_and_confirm(client, from, call, confirmation).await {
        Ok(hash) => {
            settlement.succeed(text.success);
            tracing::info!(tx = ?hash, ?kind, "Contract call success");
            Some(hash)
        }
        Err(e) => {
            settlement.fail();
            tracing::error!(error = %e, ?kind, "Contract call failure");
            None
        }
    }
}

async fn submit_and_confirm<C: RaffleContract>(
    client: SharedContract<C>,
    from: Option<Address>,
    call: Result<WriteCall, AppError>,
    confirmation: Confirmation,
) -> Result<H256, AppError> {
    let call = call?;
    let from = from.ok_or(AppError::NoWallet)?;

    let hash = with_client(client.clone(), move |c| c.submit(from, &call)).await?;

    for _ in 0..confirmation.attempts {
        tokio::time::sleep(confirmation.interval).await;
        match with_client(client.clone(), move |c| c.status(hash)).await? {
            Some(TxStatus::Success) => return Ok(hash),
            Some(TxStatus::Reverted) => return Err(AppError::Reverted(hash)),
            None => {}
        }
    }
    Err(AppError::ConfirmationTimeout(hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::mock::{shared, MockContract};
    use crate::notify::{ToastPhase, Toasts};

    const FAST: Confirmation = Confirmation {
        attempts: 3,
        interval: Duration::from_millis(1),
    };

    fn buyer() -> Address {
        Address::repeat_byte(0xb0)
    }

    fn only_toast(toasts: &Toasts) -> (ToastPhase, String) {
        assert_eq!(toasts.len(), 1, "expected exactly one toast");
        let t = toasts.iter().next().unwrap();
        (t.phase, t.message.clone())
    }

    #[tokio::test]
    async fn test_purchase_success() {
        let client = shared(MockContract::default());
        let mut toasts = Toasts::default();
        let mut in_flight = InFlight::default();

        let hash = purchase(
            client.clone(),
            Some(buyer()),
            2,
            Some(U256::exp10(18)),
            Some(5),
            &mut toasts,
            &mut in_flight,
            FAST,
        )
        .await;

        assert!(hash.is_some());
        assert_eq!(
            only_toast(&toasts),
            (ToastPhase::Success, "Tickets purchased successfully!".to_string())
        );
        assert!(!in_flight.contains(WriteKind::BuyTickets));

        let guard = client.lock().unwrap();
        let submitted = &guard.as_ref().unwrap().submitted;
        assert_eq!(
            submitted,
            &vec![(
                buyer(),
                WriteCall::BuyTickets {
                    quantity: 2,
                    payment: U256::from(2_000_000_000_000_000_000u128),
                }
            )]
        );
    }

    #[tokio::test]
    async fn test_rejected_write_replaces_loading_toast() {
        let client = shared(MockContract {
            submit_error: Some("user rejected transaction".into()),
            ..Default::default()
        });
        let mut toasts = Toasts::default();
        let mut in_flight = InFlight::default();

        let hash = dispatch(
            client,
            Some(buyer()),
            WriteCall::WithdrawWinnings,
            &mut toasts,
            &mut in_flight,
            FAST,
        )
        .await;

        assert_eq!(hash, None);
        assert_eq!(
            only_toast(&toasts),
            (ToastPhase::Error, FAILURE_MESSAGE.to_string())
        );
        assert!(!in_flight.contains(WriteKind::WithdrawWinnings));
    }

    #[tokio::test]
    async fn test_reverted_transaction() {
        let client = shared(MockContract {
            statuses: [None, Some(TxStatus::Reverted)].into_iter().collect(),
            ..Default::default()
        });
        let mut toasts = Toasts::default();
        let mut in_flight = InFlight::default();

        let hash = dispatch(
            client,
            Some(buyer()),
            WriteCall::DrawWinnerTicket,
            &mut toasts,
            &mut in_flight,
            FAST,
        )
        .await;

        assert_eq!(hash, None);
        assert_eq!(only_toast(&toasts).0, ToastPhase::Error);
    }

    #[tokio::test]
    async fn test_confirmation_timeout() {
        let client = shared(MockContract {
            statuses: [None, None, None, None].into_iter().collect(),
            ..Default::default()
        });
        let mut toasts = Toasts::default();
        let mut in_flight = InFlight::default();

        let hash = dispatch(
            client,
            Some(buyer()),
            WriteCall::RefundAll,
            &mut toasts,
            &mut in_flight,
            FAST,
        )
        .await;

        assert_eq!(hash, None);
        assert_eq!(only_toast(&toasts).0, ToastPhase::Error);
    }

    #[tokio::test]
    async fn test_double_submission_refused() {
        let client = shared(MockContract::default());
        let mut toasts = Toasts::default();
        let mut in_flight = InFlight::default();
        assert!(in_flight.begin(WriteKind::BuyTickets));

        let hash = purchase(
            client.clone(),
            Some(buyer()),
            1,
            Some(U256::one()),
            Some(5),
            &mut toasts,
            &mut in_flight,
            FAST,
        )
        .await;

        assert_eq!(hash, None);
        assert!(toasts.is_empty());
        assert!(client.lock().unwrap().as_ref().unwrap().submitted.is_empty());
        // Other kinds are not blocked.
        assert!(dispatch(
            client,
            Some(buyer()),
            WriteCall::WithdrawWinnings,
            &mut toasts,
            &mut in_flight,
            FAST,
        )
        .await
        .is_some());
    }

    #[tokio::test]
    async fn test_dropped_write_releases_guard_and_settles_toast() {
        let client = shared(MockContract {
            statuses: std::iter::repeat(None).take(1_000).collect(),
            ..Default::default()
        });
        let mut toasts = Toasts::default();
        let mut in_flight = InFlight::default();
        let slow = Confirmation {
            attempts: 1_000,
            interval: Duration::from_millis(10),
        };

        let write = purchase(
            client,
            Some(buyer()),
            1,
            Some(U256::one()),
            Some(5),
            &mut toasts,
            &mut in_flight,
            slow,
        );
        let outcome = tokio::time::timeout(Duration::from_millis(50), write).await;
        assert!(outcome.is_err(), "write should still be pending");

        assert!(!in_flight.contains(WriteKind::BuyTickets));
        assert_eq!(
            only_toast(&toasts),
            (ToastPhase::Error, FAILURE_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_purchase_without_price_is_a_no_op() {
        let client = shared(MockContract::default());
        let mut toasts = Toasts::default();
        let mut in_flight = InFlight::default();

        let hash = purchase(
            client,
            Some(buyer()),
            1,
            None,
            Some(5),
            &mut toasts,
            &mut in_flight,
            FAST,
        )
        .await;

        assert_eq!(hash, None);
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_quantity_and_missing_wallet() {
        let client = shared(MockContract::default());
        let mut toasts = Toasts::default();
        let mut in_flight = InFlight::default();

        let too_many = purchase(
            client.clone(),
            Some(buyer()),
            6,
            Some(U256::one()),
            Some(5),
            &mut toasts,
            &mut in_flight,
            FAST,
        )
        .await;
        assert_eq!(too_many, None);
        assert_eq!(only_toast(&toasts).0, ToastPhase::Error);

        let mut toasts = Toasts::default();
        let no_wallet = dispatch(
            client.clone(),
            None,
            WriteCall::WithdrawWinnings,
            &mut toasts,
            &mut in_flight,
            FAST,
        )
        .await;
        assert_eq!(no_wallet, None);
        assert_eq!(only_toast(&toasts).0, ToastPhase::Error);
        assert!(client.lock().unwrap().as_ref().unwrap().submitted.is_empty());
    }
}

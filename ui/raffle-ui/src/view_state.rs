//! Pure derivations from contract reads to what the view shows.
//!
//! Nothing here caches: components call these on every render with the
//! current snapshot.

use ethers_core::types::{Address, U256};
use ethers_core::utils::{format_ether, to_checksum};

/// Upper bound of the quantity widget.
pub const MAX_QUANTITY: u32 = 10;

/// Number of tickets in `tickets` held by `address`. Zero when either is
/// unresolved.
pub fn count_tickets(tickets: Option<&[Address]>, address: Option<Address>) -> usize {
    match (tickets, address) {
        (Some(tickets), Some(address)) => tickets.iter().filter(|t| **t == address).count(),
        _ => 0,
    }
}

/// Base units (18 decimals) as a display string: `1.0`, `0.25`, `12.000001`.
///
/// Exact for every `U256`; only trailing fractional zeros are dropped.
pub fn format_amount(amount: U256) -> String {
    let full = format_ether(amount);
    match full.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{whole}.0")
            } else {
                format!("{whole}.{frac}")
            }
        }
        None => format!("{full}.0"),
    }
}

/// `price * quantity` in base units, `None` on overflow.
pub fn total_cost(price: U256, quantity: u32) -> Option<U256> {
    price.checked_mul(U256::from(quantity))
}

/// Whether the buy button is enabled. Disabled once the draw has expired or
/// sold out; unresolved reads do not disable it.
pub fn purchase_enabled(expiration: Option<u64>, remaining: Option<u64>, now: u64) -> bool {
    let expired = expiration.is_some_and(|e| e < now);
    let sold_out = remaining == Some(0);
    !(expired || sold_out)
}

/// Parse the quantity widget's text. Out-of-range numbers are clamped to
/// `1..=MAX_QUANTITY`; anything non-numeric yields `None`.
pub fn parse_quantity(text: &str) -> Option<u32> {
    let n: u32 = text.trim().parse().ok()?;
    Some(n.clamp(1, MAX_QUANTITY))
}

/// Operator check. Addresses are compared as bytes, so the hex case the
/// wallet or the contract reported them in does not matter.
pub fn is_operator(connected: Option<Address>, operator: Option<Address>) -> bool {
    matches!((connected, operator), (Some(a), Some(b)) if a == b)
}

/// EIP-55 checksummed form.
pub fn display_address(address: Address) -> String {
    to_checksum(&address, None)
}

/// `0xAbC...1dEf2`: first five and last five characters.
pub fn truncate_address(address: Address) -> String {
    let full = display_address(address);
    format!("{}...{}", &full[..5], &full[full.len() - 5..])
}

#[cfg(test)]
mod tests {
    use ethers_core::utils::parse_ether;

    use super::*;

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    #[test]
    fn test_count_tickets() {
        let list = vec![addr(1), addr(2), addr(1), addr(3), addr(1)];
        assert_eq!(count_tickets(Some(&list), Some(addr(1))), 3);
        assert_eq!(count_tickets(Some(&list), Some(addr(2))), 1);
        assert_eq!(count_tickets(Some(&list), Some(addr(9))), 0);
        assert_eq!(count_tickets(Some(&[]), Some(addr(1))), 0);
        assert_eq!(count_tickets(None, Some(addr(1))), 0);
        assert_eq!(count_tickets(Some(&list), None), 0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(U256::zero()), "0.0");
        assert_eq!(format_amount(U256::exp10(18)), "1.0");
        assert_eq!(format_amount(U256::exp10(16)), "0.01");
        assert_eq!(format_amount(U256::from(1)), "0.000000000000000001");
        assert_eq!(
            format_amount(U256::from(1_500_000_000_000_000_000u128)),
            "1.5"
        );
        assert_eq!(
            format_amount(U256::from(12_000_001_000_000_000_000u128)),
            "12.000001"
        );
    }

    #[test]
    fn test_format_amount_round_trips() {
        let values = [
            U256::zero(),
            U256::one(),
            U256::exp10(18),
            U256::from(123_456_789_012_345_678_901u128),
            U256::from(u128::MAX),
        ];
        for v in values {
            let shown = format_amount(v);
            assert_eq!(parse_ether(&shown).unwrap(), v, "{shown}");
        }
    }

    #[test]
    fn test_total_cost() {
        assert_eq!(
            total_cost(U256::exp10(18), 2),
            Some(U256::from(2_000_000_000_000_000_000u128))
        );
        assert_eq!(total_cost(U256::from(7), 0), Some(U256::zero()));
        assert_eq!(total_cost(U256::MAX, 2), None);
    }

    #[test]
    fn test_purchase_enabled() {
        let now = 1_000;
        assert!(purchase_enabled(Some(2_000), Some(5), now));
        assert!(!purchase_enabled(Some(999), Some(5), now));
        assert!(purchase_enabled(Some(1_000), Some(5), now));
        assert!(!purchase_enabled(Some(2_000), Some(0), now));
        assert!(!purchase_enabled(Some(10), Some(0), now));
        assert!(purchase_enabled(None, None, now));
    }

    #[test]
    fn test_purchase_closes_one_tick_after_countdown() {
        use crate::countdown::{Countdown, CountdownState};

        let target = 1_000;
        let mut countdown = Countdown::new(target, target - 3);
        let mut completed_at = None;
        for now in target - 3..=target + 3 {
            countdown.tick(now);
            if countdown.state() == CountdownState::Completed && completed_at.is_none() {
                completed_at = Some(now);
            }
            let enabled = purchase_enabled(Some(target), Some(5), now);
            match completed_at {
                Some(done) if now > done => assert!(!enabled, "open at {now}"),
                Some(_) => {}
                None => assert!(enabled, "closed early at {now}"),
            }
        }
        assert_eq!(completed_at, Some(target));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), Some(3));
        assert_eq!(parse_quantity(" 10 "), Some(10));
        assert_eq!(parse_quantity("25"), Some(10));
        assert_eq!(parse_quantity("0"), Some(1));
        assert_eq!(parse_quantity("-2"), None);
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity(""), None);
    }

    #[test]
    fn test_is_operator() {
        assert!(is_operator(Some(addr(7)), Some(addr(7))));
        assert!(!is_operator(Some(addr(7)), Some(addr(8))));
        assert!(!is_operator(None, Some(addr(7))));
        assert!(!is_operator(Some(addr(7)), None));
    }

    #[test]
    fn test_is_operator_ignores_hex_case() {
        let checksummed: Address = "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap();
        let lower: Address = "0x5fbdb2315678afecb367f032d93f642f64180aa3".parse().unwrap();
        assert!(is_operator(Some(checksummed), Some(lower)));
    }

    #[test]
    fn test_truncate_address() {
        let a: Address = "0x5fbdb2315678afecb367f032d93f642f64180aa3".parse().unwrap();
        assert_eq!(display_address(a), "0x5FbDB2315678afecb367f032d93F642f64180aa3");
        assert_eq!(truncate_address(a), "0x5Fb...80aa3");
    }
}

//! Countdown to the draw's expiration.

use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownState {
    Counting,
    Completed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Digits {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Digits {
    pub fn from_seconds(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }
}

/// Counting until `now >= target`, then Completed for good.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Countdown {
    target: u64,
    state: CountdownState,
    digits: Digits,
}

impl Countdown {
    pub fn new(target: u64, now: u64) -> Self {
        let mut countdown = Self {
            target,
            state: CountdownState::Counting,
            digits: Digits::default(),
        };
        countdown.tick(now);
        countdown
    }

    /// Advance to `now`. Returns `true` only on the tick that completes.
    pub fn tick(&mut self, now: u64) -> bool {
        if self.state == CountdownState::Completed {
            return false;
        }
        if now >= self.target {
            self.state = CountdownState::Completed;
            self.digits = Digits::default();
            return true;
        }
        self.digits = Digits::from_seconds(self.target - now);
        false
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn digits(&self) -> Digits {
        self.digits
    }
}

/// Drive the countdown held in `slot` for one clock tick.
///
/// An unresolved target clears the slot so nothing is rendered; a changed
/// target (new draw) starts a fresh countdown.
pub fn advance(slot: &mut Option<Countdown>, target: Option<u64>, now: u64) {
    let Some(target) = target else {
        *slot = None;
        return;
    };
    if let Some(countdown) = slot.as_mut().filter(|c| c.target() == target) {
        if countdown.tick(now) {
            tracing::info!(target, "ticket sales closed");
        }
        return;
    }
    *slot = Some(Countdown::new(target, now));
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

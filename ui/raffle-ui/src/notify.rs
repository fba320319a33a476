//! Transient toast notifications.
//!
//! A toast is keyed by [`ToastId`]; a later phase with the same id replaces
//! the earlier one in place instead of stacking.

use std::time::{Duration, Instant};

use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ToastId(u64);

impl std::fmt::Display for ToastId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastPhase {
    Loading,
    Success,
    Error,
}

impl ToastPhase {
    /// How long a toast in this phase stays up. Loading toasts stay until
    /// replaced.
    pub fn lifetime(self) -> Option<Duration> {
        match self {
            Self::Loading => None,
            Self::Success => Some(Duration::from_secs(2)),
            Self::Error => Some(Duration::from_secs(4)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub phase: ToastPhase,
    pub message: String,
    shown_at: Instant,
}

impl Toast {
    fn is_expired(&self, now: Instant) -> bool {
        self.phase
            .lifetime()
            .is_some_and(|lifetime| now.saturating_duration_since(self.shown_at) >= lifetime)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Toasts {
    items: Vec<Toast>,
    next_id: u64,
}

impl Toasts {
    fn set(&mut self, id: ToastId, phase: ToastPhase, message: &str) {
        let toast = Toast {
            id,
            phase,
            message: message.to_string(),
            shown_at: Instant::now(),
        };
        match self.items.iter_mut().find(|t| t.id == id) {
            Some(existing) => *existing = toast,
            None => self.items.push(toast),
        }
    }

    pub fn dismiss(&mut self, id: ToastId) {
        self.items.retain(|t| t.id != id);
    }

    /// Drop every toast still in the loading phase.
    pub fn dismiss_loading(&mut self) {
        self.items.retain(|t| t.phase != ToastPhase::Loading);
    }

    /// Whether any toast is past its lifetime at `now`.
    pub fn has_expired(&self, now: Instant) -> bool {
        self.items.iter().any(|t| t.is_expired(now))
    }

    /// Drop finished toasts whose lifetime has passed at `now`.
    pub fn expire(&mut self, now: Instant) {
        self.items.retain(|t| !t.is_expired(now));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
impl Toasts {
    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.items.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Where the dispatcher reports progress.
pub trait Notify {
    fn loading(&mut self, message: &str) -> ToastId;
    fn success(&mut self, id: ToastId, message: &str);
    fn error(&mut self, id: ToastId, message: &str);
}

impl Notify for Toasts {
    fn loading(&mut self, message: &str) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        self.set(id, ToastPhase::Loading, message);
        id
    }

    fn success(&mut self, id: ToastId, message: &str) {
        self.set(id, ToastPhase::Success, message);
    }

    fn error(&mut self, id: ToastId, message: &str) {
        self.set(id, ToastPhase::Error, message);
    }
}

impl Notify for Signal<Toasts> {
    fn loading(&mut self, message: &str) -> ToastId {
        self.write().loading(message)
    }

    // A write may settle from `Drop` after the store is gone.
    fn success(&mut self, id: ToastId, message: &str) {
        if let Ok(mut toasts) = self.try_write() {
            toasts.success(id, message);
        }
    }

    fn error(&mut self, id: ToastId, message: &str) {
        if let Ok(mut toasts) = self.try_write() {
            toasts.error(id, message);
        }
    }
}

//! Request sequence numbers so a slow, superseded computation cannot
//! overwrite a newer result.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex, PoisonError,
};

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// Hands out strictly increasing tickets.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> RequestTicket {
        RequestTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True when no newer ticket has been issued since `ticket`.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }
}

/// Holds the value published by the newest ticket seen so far.
#[derive(Debug)]
pub struct LatestResult<T> {
    slot: Mutex<Option<(RequestTicket, T)>>,
}

impl<T> Default for LatestResult<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T: Clone> LatestResult<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` unless a result from the same or a newer ticket is already held.
    /// Returns whether the value was accepted.
    pub fn publish(&self, ticket: RequestTicket, value: T) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((held, _)) = slot.as_ref() {
            if ticket <= *held {
                warn!(
                    stale = ticket.sequence(),
                    held = held.sequence(),
                    "discarding result from superseded request"
                );
                return false;
            }
        }
        *slot = Some((ticket, value));
        true
    }

    pub fn get(&self) -> Option<T> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(_, value)| value.clone())
    }

    pub fn ticket(&self) -> Option<RequestTicket> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(ticket, _)| *ticket)
    }
}

//! Reveal clock: at most one pending tick, cancellable.
//!
//! Each armed tick gets a fresh [`TickId`] and its own `CancellationToken`.
//! The spawned timer task races the token against the delay and posts
//! `PlayerEvent::TickElapsed` to the inbox. A tick that was cancelled after
//! it already posted is rejected by [`RevealClock::accept`], so a stale
//! tick can never advance the cursor after a restart or skip.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::events::{PlayerEvent, PlayerEventSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(pub u64);

#[derive(Debug, Default)]
pub struct TickSeq {
    next: u64,
}

impl TickSeq {
    pub fn next_id(&mut self) -> TickId {
        let id = TickId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug)]
struct PendingTick {
    id: TickId,
    cancel: CancellationToken,
}

#[derive(Debug, Default)]
pub struct RevealClock {
    seq: TickSeq,
    pending: Option<PendingTick>,
}

impl RevealClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules the next tick, cancelling any pending one first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self, delay: Duration, inbox: &PlayerEventSender) -> TickId {
        self.cancel();

        let id = self.seq.next_id();
        let cancel = CancellationToken::new();
        spawn_tick(id, delay, cancel.clone(), inbox.clone());
        self.pending = Some(PendingTick { id, cancel });
        id
    }

    /// Cancels the pending tick, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            trace!(tick = pending.id.0, "cancelling pending tick");
            pending.cancel.cancel();
        }
    }

    /// Consumes the pending tick if `id` is it. Returns false for stale ticks.
    pub fn accept(&mut self, id: TickId) -> bool {
        let ok = self.pending.as_ref().is_some_and(|p| p.id == id);
        if ok {
            self.pending = None;
        }
        ok
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}

fn spawn_tick(id: TickId, delay: Duration, cancel: CancellationToken, inbox: PlayerEventSender) {
    tokio::spawn(async move {
        tokio::select! {
            () = cancel.cancelled() => {}
            () = tokio::time::sleep(delay) => {
                // The player may already be gone; nothing to do then.
                let _ = inbox.send(PlayerEvent::TickElapsed(id));
            }
        }
    });
}

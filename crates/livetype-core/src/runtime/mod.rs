//! Playback runtime - owns the session and the clock, runs the event loop.
//!
//! The session is a synchronous state machine; this module is the only place
//! that waits. It follows an inbox pattern:
//! - the clock's timer tasks and the host's [`PlayerHandle`]s send
//!   [`PlayerEvent`]s to one unbounded channel
//! - the loop handles one event at a time, then re-arms the clock if there is
//!   still something to type
//!
//! Restart, skip and quit cancel the pending tick before touching the cursor.
//!
//! Structure:
//! - `mod.rs`: Player loop, handle, options
//! - `clock.rs`: pending tick bookkeeping and timer tasks
//! - `events.rs`: inbox event types

mod clock;
mod events;

use tokio::sync::{mpsc, watch};
use tracing::{debug, trace};

pub use clock::{RevealClock, TickId, TickSeq};
pub use events::{PlayerEvent, PlayerEventReceiver, PlayerEventSender};

use crate::engine::{PlaybackStatus, Session};

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerOptions {
    /// Return from [`Player::run`] as soon as the document is fully typed.
    /// Otherwise the player stays alive (so a restart can replay) until quit.
    pub exit_on_complete: bool,
}

/// Cloneable command handle for a running [`Player`].
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    inbox_tx: PlayerEventSender,
}

impl PlayerHandle {
    pub fn restart(&self) {
        self.send(PlayerEvent::Restart);
    }

    pub fn skip(&self) {
        self.send(PlayerEvent::Skip);
    }

    pub fn quit(&self) {
        self.send(PlayerEvent::Quit);
    }

    fn send(&self, event: PlayerEvent) {
        if self.inbox_tx.send(event).is_err() {
            debug!(?event, "player already stopped");
        }
    }
}

/// Drives a [`Session`] in real time.
#[derive(Debug)]
pub struct Player {
    session: Session,
    clock: RevealClock,
    /// Inbox sender - the clock and handles send events here.
    inbox_tx: PlayerEventSender,
    /// Inbox receiver - drained by the run loop.
    inbox_rx: PlayerEventReceiver,
    status_tx: watch::Sender<PlaybackStatus>,
    options: PlayerOptions,
}

impl Player {
    pub fn new(session: Session, options: PlayerOptions) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (status_tx, _) = watch::channel(session.status());
        Self {
            session,
            clock: RevealClock::new(),
            inbox_tx,
            inbox_rx,
            status_tx,
            options,
        }
    }

    pub fn handle(&self) -> PlayerHandle {
        PlayerHandle {
            inbox_tx: self.inbox_tx.clone(),
        }
    }

    /// Progress updates, published after every handled event.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackStatus> {
        self.status_tx.subscribe()
    }

    /// Runs until quit (or completion, per [`PlayerOptions`]) and hands the
    /// session back.
    pub async fn run(mut self) -> Session {
        loop {
            self.status_tx.send_replace(self.session.status());

            if self.options.exit_on_complete && self.session.is_complete() {
                break;
            }
            self.rearm();

            // The player holds a sender itself, so the inbox never closes.
            let Some(event) = self.inbox_rx.recv().await else {
                break;
            };
            if !self.update(event) {
                break;
            }
        }

        self.clock.cancel();
        self.session
    }

    fn rearm(&mut self) {
        if self.clock.is_armed() {
            return;
        }
        if let Some(delay) = self.session.next_delay() {
            self.clock.arm(delay, &self.inbox_tx);
        }
    }

    /// Applies one event. Returns false when the loop should stop.
    fn update(&mut self, event: PlayerEvent) -> bool {
        match event {
            PlayerEvent::TickElapsed(id) => {
                if self.clock.accept(id) {
                    self.session.tick();
                } else {
                    trace!(tick = id.0, "dropping stale tick");
                }
            }
            PlayerEvent::Restart => {
                self.clock.cancel();
                self.session.restart();
            }
            PlayerEvent::Skip => {
                self.clock.cancel();
                self.session.skip();
            }
            PlayerEvent::Quit => {
                self.clock.cancel();
                return false;
            }
        }
        true
    }
}

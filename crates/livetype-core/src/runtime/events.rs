//! Player event types.
//!
//! Everything that can move the cursor arrives through the player's inbox as
//! a `PlayerEvent`: elapsed ticks from the clock and commands from the host.
//! Events are handled one at a time, so cursor changes never interleave.

use tokio::sync::mpsc;

use super::clock::TickId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// A scheduled tick fired. Ignored unless it is still the pending one.
    TickElapsed(TickId),
    /// Rewind to the start and clear all surfaces.
    Restart,
    /// Jump to the end, committing every region.
    Skip,
    /// Stop the player.
    Quit,
}

/// Sender for the player's event inbox.
pub type PlayerEventSender = mpsc::UnboundedSender<PlayerEvent>;

/// Receiver for the player's event inbox.
pub type PlayerEventReceiver = mpsc::UnboundedReceiver<PlayerEvent>;

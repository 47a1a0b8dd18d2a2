//! Typewriter engine.
//!
//! Structure:
//! - `timing.rs`: per-tick delay rules
//! - `projector.rs`: cursor -> surface updates, one-shot commits
//! - `surfaces.rs`: injected output handles (style, preview, script executor)
//! - `session.rs`: cursor ownership plus restart/skip

mod projector;
mod session;
mod surfaces;
mod timing;

pub use projector::{Projector, StyleAccumulator};
pub use session::{PlaybackStatus, Session};
pub use surfaces::{
    EffectExecutor, MemoryPreview, MemoryStyle, NodeId, PreviewState, PreviewSurface,
    RecordingExecutor, ScrollTarget, StyleLog, StyleSurface, Surfaces,
};
pub use timing::{Pause, pause_at};

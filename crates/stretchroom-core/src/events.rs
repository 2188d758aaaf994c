use serde::{Deserialize, Serialize};

use crate::sound::SoundEffect;
use crate::timer::Snapshot;

/// User and system inputs to the timer engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// Start the sequence, or resume a paused segment.
    Start,
    Pause,
    /// Jump back to the beginning of the current repetition.
    RestartSegmentPressed,
    /// Fired by the scheduler when the active segment runs out.
    OnSegmentCompleted,
    BackPressed,
}

/// Side effects the engine hands back to its caller.
///
/// The engine never invokes navigation or audio directly; the session or
/// front-end executes these in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    StateChanged { snapshot: Snapshot },
    PlaySound { effect: SoundEffect },
    /// Text-to-speech request.
    Announce { text: String },
    /// User asked to leave the timer.
    NavigateBack,
    /// The plan ran to its natural end.
    SequenceCompleted,
}

impl Effect {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Effect::NavigateBack | Effect::SequenceCompleted)
    }
}

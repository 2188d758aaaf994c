//! Sound and speech collaborator.
//!
//! The core only names the cue it wants; loading and mixing assets belongs to
//! the front-end.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::plan::SegmentKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundEffect {
    SegmentStop,
    ActiveSectionComplete,
    TransitionSectionComplete,
    CountdownBeep,
    SequenceComplete,
}

impl SoundEffect {
    /// Cue played when a segment of `kind` runs out.
    pub fn for_completed(kind: SegmentKind) -> Self {
        match kind {
            SegmentKind::Stretch => SoundEffect::ActiveSectionComplete,
            SegmentKind::Transition => SoundEffect::TransitionSectionComplete,
            SegmentKind::Announcement => SoundEffect::SegmentStop,
        }
    }
}

/// Fire-and-forget audio output.
pub trait SoundPlayer: Send {
    fn play(&mut self, effect: SoundEffect);

    fn announce(&mut self, text: &str);

    /// Drop any audio resources. Called once when the session is disposed.
    fn release(&mut self) {}
}

/// Plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl SoundPlayer for SilentPlayer {
    fn play(&mut self, _effect: SoundEffect) {}

    fn announce(&mut self, _text: &str) {}
}

/// Logs every cue instead of playing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPlayer;

impl SoundPlayer for TracingPlayer {
    fn play(&mut self, effect: SoundEffect) {
        info!(?effect, "play sound");
    }

    fn announce(&mut self, text: &str) {
        info!(text, "announce");
    }

    fn release(&mut self) {
        info!("sound player released");
    }
}

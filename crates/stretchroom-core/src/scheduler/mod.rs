//! Event scheduler.
//!
//! Turns the command just applied into future wake-ups: one "segment
//! completed" at the end of the run plus a few countdown pings in the last
//! seconds. Every applied command first cancels whatever the previous
//! segment had scheduled.

mod substrate;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::plan::SegmentKind;
use crate::timer::Command;

pub use substrate::{
    Callback, ManualHandle, ManualSubstrate, Substrate, TimerHandle, TokioHandle, TokioSubstrate,
};

/// How many countdown cues to give per segment kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingConfig {
    #[serde(default = "default_pings")]
    pub active_pings: u32,
    #[serde(default = "default_pings")]
    pub transition_pings: u32,
}

fn default_pings() -> u32 {
    3
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            active_pings: default_pings(),
            transition_pings: default_pings(),
        }
    }
}

impl PingConfig {
    pub fn for_kind(&self, kind: SegmentKind) -> u32 {
        match kind {
            SegmentKind::Stretch => self.active_pings,
            SegmentKind::Transition => self.transition_pings,
            SegmentKind::Announcement => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WakeupKind {
    SegmentCompleted,
    /// Fires `seconds_left` seconds before the segment ends.
    CountdownPing { seconds_left: u32 },
}

/// A fired callback, tagged with the engine epoch that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wakeup {
    pub epoch: u64,
    pub kind: WakeupKind,
}

/// Where fired wake-ups are delivered.
pub type WakeupSink = Arc<dyn Fn(Wakeup) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedCallback {
    pub delay_ms: u64,
    pub kind: WakeupKind,
}

/// Callbacks a command asks for. Pure.
///
/// Start and repeat count the full segment duration, resume counts what was
/// left at the pause. Other commands schedule nothing.
pub fn callbacks_for(command: &Command, pings: PingConfig) -> Vec<PlannedCallback> {
    let (duration_ms, kind) = match command {
        Command::StartSegment { spec, .. } | Command::RepeatExercise { spec, .. } => {
            (spec.duration_ms(), spec.kind())
        }
        Command::ResumeSegment { paused, .. } => {
            (paused.remaining_duration_ms(), paused.spec.kind())
        }
        Command::PauseSegment { .. } | Command::GoBack | Command::SequenceCompleted => {
            return Vec::new()
        }
    };

    // Non-positive durations fire immediately.
    let duration_ms = u64::try_from(duration_ms).unwrap_or(0);
    let whole_seconds = u32::try_from(duration_ms / 1000).unwrap_or(u32::MAX);
    let ping_count = pings.for_kind(kind).min(whole_seconds).saturating_sub(1);

    let mut callbacks = Vec::with_capacity(ping_count as usize + 1);
    callbacks.push(PlannedCallback {
        delay_ms: duration_ms,
        kind: WakeupKind::SegmentCompleted,
    });
    for k in 1..=ping_count {
        callbacks.push(PlannedCallback {
            delay_ms: duration_ms - u64::from(k) * 1000,
            kind: WakeupKind::CountdownPing { seconds_left: k },
        });
    }
    callbacks
}

/// Owns the pending callbacks of one timer session.
pub struct EventScheduler<S: Substrate> {
    substrate: S,
    pings: PingConfig,
    sink: WakeupSink,
    pending: Vec<S::Handle>,
}

impl<S: Substrate> EventScheduler<S> {
    pub fn new(substrate: S, pings: PingConfig, sink: WakeupSink) -> Self {
        Self {
            substrate,
            pings,
            sink,
            pending: Vec::new(),
        }
    }

    pub fn pings(&self) -> PingConfig {
        self.pings
    }

    /// Replace the previous segment's callbacks with those of `command`.
    ///
    /// Cancellation completes before anything new is scheduled.
    pub fn apply(&mut self, command: &Command, epoch: u64) {
        self.cancel_all();
        for planned in callbacks_for(command, self.pings) {
            trace!(epoch, delay_ms = planned.delay_ms, kind = ?planned.kind, "schedule callback");
            let sink = self.sink.clone();
            let wakeup = Wakeup {
                epoch,
                kind: planned.kind,
            };
            let handle = self.substrate.run_after(
                Duration::from_millis(planned.delay_ms),
                Box::new(move || sink(wakeup)),
            );
            self.pending.push(handle);
        }
    }

    pub fn cancel_all(&mut self) {
        for handle in self.pending.drain(..) {
            handle.cancel();
        }
    }

    /// Callbacks still waiting to fire.
    pub fn pending(&self) -> usize {
        self.pending.iter().filter(|h| !h.is_finished()).count()
    }
}

impl<S: Substrate> Drop for EventScheduler<S> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

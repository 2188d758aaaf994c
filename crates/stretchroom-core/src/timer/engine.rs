//! Timer engine.
//!
//! Ties one session's state to its scheduler. Every input goes through the
//! same pipeline:
//!
//! ```text
//! Event -> resolve(state, event, now) -> Command -> reduce(state, command)
//!                                              \-> EventScheduler::apply
//! ```
//!
//! Scheduled callbacks come back as [`Wakeup`]s and re-enter the pipeline via
//! [`TimerEngine::handle_wakeup`]. The engine does not run audio or navigation
//! itself; it returns [`Effect`]s for the caller to execute.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(&plan, settings, clock, substrate, sink)?;
//! let effects = engine.handle(Event::Start);
//! // later, from the sink:
//! let effects = engine.handle_wakeup(wakeup);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::command::Command;
use super::reducer::reduce;
use super::resolver::resolve;
use super::state::{EngineState, Snapshot};
use crate::clock::Clock;
use crate::error::PlanError;
use crate::events::{Effect, Event};
use crate::plan::{ExerciseConfig, SegmentSpec};
use crate::scheduler::{EventScheduler, PingConfig, Substrate, Wakeup, WakeupKind, WakeupSink};
use crate::sound::SoundEffect;

/// Per-session knobs, usually taken from the user's config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub pings: PingConfig,
    pub sound_enabled: bool,
    /// Speak the section name when its announcement segment starts.
    pub announce_names: bool,
    /// Speak the repetition position when a stretch starts.
    pub announce_reps: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            pings: PingConfig::default(),
            sound_enabled: true,
            announce_names: true,
            announce_reps: true,
        }
    }
}

/// Single owner of one active-timer session.
pub struct TimerEngine<S: Substrate> {
    state: EngineState,
    scheduler: EventScheduler<S>,
    clock: Arc<dyn Clock>,
    settings: EngineSettings,
    /// Bumped on every applied command; wake-ups from older epochs are stale.
    epoch: u64,
    disposed: bool,
}

impl<S: Substrate> TimerEngine<S> {
    /// Plan `config` and build an idle engine.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Empty`] when the plan yields no segments.
    pub fn new(
        config: &ExerciseConfig,
        settings: EngineSettings,
        clock: Arc<dyn Clock>,
        substrate: S,
        sink: WakeupSink,
    ) -> Result<Self, PlanError> {
        let state = EngineState::new(config)?;
        info!(
            exercise = %config.exercise_name,
            segments = state.segments.len(),
            repeat = state.repeat,
            "timer session created"
        );
        Ok(Self {
            state,
            scheduler: EventScheduler::new(substrate, settings.pings, sink),
            clock,
            settings,
            epoch: 0,
            disposed: false,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Callbacks scheduled for the current segment and not yet fired.
    pub fn pending_callbacks(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot(self.clock.now_ms())
    }

    // ── Inputs ───────────────────────────────────────────────────────

    /// Feed a user or system event.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        if self.disposed {
            return Vec::new();
        }
        let now = self.clock.now_ms();
        if event == Event::OnSegmentCompleted {
            return self.complete_segment(now);
        }
        let command = resolve(&self.state, event, now);
        if command.is_none() {
            debug!(?event, index = self.state.index, "event ignored");
        }
        self.apply(command, now)
    }

    /// Feed a fired scheduler callback.
    pub fn handle_wakeup(&mut self, wakeup: Wakeup) -> Vec<Effect> {
        if self.disposed {
            return Vec::new();
        }
        if wakeup.epoch != self.epoch {
            warn!(
                wakeup_epoch = wakeup.epoch,
                current_epoch = self.epoch,
                "dropping stale wakeup"
            );
            return Vec::new();
        }
        match wakeup.kind {
            WakeupKind::CountdownPing { seconds_left } => {
                debug!(seconds_left, "countdown ping");
                let mut effects = Vec::new();
                self.push_sound(&mut effects, SoundEffect::CountdownBeep);
                effects
            }
            WakeupKind::SegmentCompleted => {
                let now = self.clock.now_ms();
                self.complete_segment(now)
            }
        }
    }

    /// Cancel everything this session scheduled. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.scheduler.cancel_all();
        self.epoch += 1;
        self.disposed = true;
        info!(completed_reps = self.state.completed_reps, "timer session disposed");
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_segment(&mut self, now: i64) -> Vec<Effect> {
        let finished = self.state.current_segment().map(SegmentSpec::kind);
        let command = resolve(&self.state, Event::OnSegmentCompleted, now);

        let mut effects = Vec::new();
        if let (Some(kind), Some(command)) = (finished, command.as_ref()) {
            if !matches!(command, Command::SequenceCompleted) {
                self.push_sound(&mut effects, SoundEffect::for_completed(kind));
            }
        }
        effects.extend(self.apply(command, now));
        effects
    }

    fn apply(&mut self, command: Option<Command>, now: i64) -> Vec<Effect> {
        let Some(command) = command else {
            return Vec::new();
        };

        self.state = reduce(&self.state, Some(&command));
        self.epoch += 1;
        self.scheduler.apply(&command, self.epoch);
        debug!(
            command = command.name(),
            index = self.state.index,
            epoch = self.epoch,
            pending = self.scheduler.pending(),
            "command applied"
        );

        let mut effects = vec![Effect::StateChanged {
            snapshot: self.state.snapshot(now),
        }];
        match &command {
            Command::StartSegment { spec, .. } | Command::RepeatExercise { spec, .. } => {
                self.push_announcement(&mut effects, spec);
            }
            Command::GoBack => {
                effects.push(Effect::NavigateBack);
            }
            Command::SequenceCompleted => {
                info!(completed_reps = self.state.completed_reps, "sequence completed");
                self.push_sound(&mut effects, SoundEffect::SequenceComplete);
                effects.push(Effect::SequenceCompleted);
            }
            Command::PauseSegment { .. } | Command::ResumeSegment { .. } => {}
        }
        effects
    }

    fn push_sound(&self, effects: &mut Vec<Effect>, effect: SoundEffect) {
        if self.settings.sound_enabled {
            effects.push(Effect::PlaySound { effect });
        }
    }

    fn push_announcement(&self, effects: &mut Vec<Effect>, spec: &SegmentSpec) {
        if !self.settings.sound_enabled {
            return;
        }
        let text = match spec {
            SegmentSpec::Announcement { name, .. } if self.settings.announce_names => {
                name.trim().to_string()
            }
            SegmentSpec::Stretch { name, .. }
                if self.settings.announce_reps && !spec.position().is_empty() =>
            {
                format!("{} {}", name.trim(), spec.position())
                    .trim()
                    .to_string()
            }
            _ => return,
        };
        if !text.is_empty() {
            effects.push(Effect::Announce { text });
        }
    }
}

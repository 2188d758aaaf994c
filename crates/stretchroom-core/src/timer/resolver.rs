//! Interaction rules: which command, if any, an event produces in a state.

use super::command::Command;
use super::state::EngineState;
use crate::events::Event;

/// Resolve `event` against `state` at instant `now`.
///
/// `None` means the event does not apply; callers must then leave both the
/// state and the scheduled callbacks alone.
pub fn resolve(state: &EngineState, event: Event, now: i64) -> Option<Command> {
    match event {
        Event::Pause => {
            let running = state.active_segment.as_ref()?;
            if running.is_paused() {
                return None;
            }
            Some(Command::PauseSegment {
                at: now,
                running: running.clone(),
            })
        }
        Event::Start => match state.active_segment.as_ref() {
            Some(active) => {
                let fraction = active.paused_at_fraction()?;
                Some(Command::ResumeSegment {
                    at: now,
                    fraction,
                    paused: active.clone(),
                })
            }
            None => start_at(state, 0, now),
        },
        Event::RestartSegmentPressed => {
            let target = state
                .segments
                .iter()
                .take(state.index + 1)
                .rposition(|s| s.is_start_of_segment())
                .unwrap_or(0);
            start_at(state, target, now)
        }
        Event::OnSegmentCompleted => {
            let next = state.index + 1;
            if next < state.segments.len() {
                start_at(state, next, now)
            } else if state.repeat {
                let spec = state.segments.first()?.clone();
                Some(Command::RepeatExercise { at: now, spec })
            } else {
                Some(Command::SequenceCompleted)
            }
        }
        Event::BackPressed => Some(Command::GoBack),
    }
}

fn start_at(state: &EngineState, index: usize, now: i64) -> Option<Command> {
    let spec = state.segments.get(index)?.clone();
    Some(Command::StartSegment {
        at: now,
        index,
        spec,
    })
}

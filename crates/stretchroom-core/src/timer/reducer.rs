use super::active::ActiveSegment;
use super::command::Command;
use super::state::EngineState;

/// Apply `command` to `state`, returning the next state.
///
/// Navigation commands and `None` return the state unchanged; their effects
/// happen outside the reducer.
pub fn reduce(state: &EngineState, command: Option<&Command>) -> EngineState {
    let Some(command) = command else {
        return state.clone();
    };

    match command {
        Command::StartSegment { at, index, spec } => EngineState {
            has_started: true,
            index: *index,
            active_segment: Some(ActiveSegment::start(*at, spec.clone())),
            ..state.clone()
        },
        Command::RepeatExercise { at, spec } => EngineState {
            has_started: true,
            index: 0,
            active_segment: Some(ActiveSegment::start(*at, spec.clone())),
            completed_reps: state.completed_reps + 1,
            ..state.clone()
        },
        Command::PauseSegment { at, running } => EngineState {
            active_segment: Some(running.paused_at(*at)),
            ..state.clone()
        },
        Command::ResumeSegment {
            at,
            fraction,
            paused,
        } => EngineState {
            active_segment: Some(paused.resumed_at(*at, *fraction)),
            ..state.clone()
        },
        Command::GoBack | Command::SequenceCompleted => state.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::SegmentSpec;

    fn stretch(seconds: u32) -> SegmentSpec {
        SegmentSpec::Stretch {
            name: "Back".into(),
            duration_seconds: seconds,
            index: 0,
            rep_count: 1,
            is_last: false,
            is_start_of_segment: true,
        }
    }

    fn idle() -> EngineState {
        EngineState::from_segments(vec![stretch(10), stretch(20)], true)
    }

    #[test]
    fn none_leaves_state_unchanged() {
        let s = idle();
        assert_eq!(reduce(&s, None), s);
    }

    #[test]
    fn navigation_commands_leave_state_unchanged() {
        let s = idle();
        assert_eq!(reduce(&s, Some(&Command::GoBack)), s);
        assert_eq!(reduce(&s, Some(&Command::SequenceCompleted)), s);
    }

    #[test]
    fn start_segment_sets_active_run() {
        let s = reduce(
            &idle(),
            Some(&Command::StartSegment {
                at: 500,
                index: 1,
                spec: stretch(20),
            }),
        );
        assert!(s.has_started);
        assert_eq!(s.index, 1);
        let active = s.active_segment.unwrap();
        assert_eq!(active.started_at_time, 500);
        assert_eq!(active.started_at_fraction, 0.0);
        assert_eq!(active.end_at_time, 20_500);
        assert!(!active.is_paused());
    }

    #[test]
    fn repeat_counts_a_pass() {
        let mut s = idle();
        s.index = 1;
        s.completed_reps = 2;
        let s = reduce(
            &s,
            Some(&Command::RepeatExercise {
                at: 0,
                spec: stretch(10),
            }),
        );
        assert_eq!(s.index, 0);
        assert_eq!(s.completed_reps, 3);
        assert_eq!(s.active_segment.unwrap().end_at_time, 10_000);
    }

    #[test]
    fn pause_then_resume_keeps_remaining() {
        let running = ActiveSegment::start(0, stretch(10));
        let mut s = idle();
        s.active_segment = Some(running.clone());

        let paused = reduce(&s, Some(&Command::PauseSegment { at: 4_000, running }));
        let paused_segment = paused.active_segment.clone().unwrap();
        assert_eq!(paused_segment.paused_at_time(), Some(4_000));
        let fraction = paused_segment.paused_at_fraction().unwrap();
        assert!((fraction - 0.4).abs() < 1e-9);

        let resumed = reduce(
            &paused,
            Some(&Command::ResumeSegment {
                at: 60_000,
                fraction,
                paused: paused_segment,
            }),
        );
        let active = resumed.active_segment.unwrap();
        assert!(!active.is_paused());
        assert_eq!(active.started_at_time, 60_000);
        assert_eq!(active.end_at_time, 66_000);
        assert!((active.started_at_fraction - 0.4).abs() < 1e-9);
    }
}

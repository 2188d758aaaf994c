//! Integration tests for the planner, resolver and reducer pipeline.

use std::sync::{Arc, Mutex};

use stretchroom_core::scheduler::{callbacks_for, WakeupSink};
use stretchroom_core::timer::{reduce, resolve};
use stretchroom_core::{
    plan, Command, EngineSettings, EngineState, Event, ExerciseConfig, ManualClock,
    ManualSubstrate, PingConfig, SectionConfig, SegmentSpec, TimerEngine, Wakeup,
};

fn scenario_a_config(repeat: bool) -> ExerciseConfig {
    ExerciseConfig {
        exercise_id: "scenario-a".into(),
        exercise_name: "Scenario A".into(),
        repeat,
        sections: vec![SectionConfig {
            section_id: "only".into(),
            name: String::new(),
            rep_count: 2,
            intro_duration: 0,
            activity_duration: 10,
            transition_duration: 3,
        }],
    }
}

#[test]
fn scenario_a_planner_output() {
    let segments = plan(&scenario_a_config(false));
    assert_eq!(
        segments,
        vec![
            SegmentSpec::Transition {
                name: String::new(),
                duration_seconds: 3,
                index: 0,
                rep_count: 2,
                is_start_of_segment: true,
            },
            SegmentSpec::Stretch {
                name: String::new(),
                duration_seconds: 10,
                index: 0,
                rep_count: 2,
                is_last: false,
                is_start_of_segment: false,
            },
            SegmentSpec::Transition {
                name: String::new(),
                duration_seconds: 3,
                index: 1,
                rep_count: 2,
                is_start_of_segment: false,
            },
            SegmentSpec::Stretch {
                name: String::new(),
                duration_seconds: 10,
                index: 1,
                rep_count: 2,
                is_last: true,
                is_start_of_segment: false,
            },
        ]
    );
}

#[test]
fn scenario_b_pause_resume_timing() {
    // Start index 1 (the 10 s stretch) at t=1000.
    let state = EngineState::new(&scenario_a_config(false)).unwrap();
    let start = Command::StartSegment {
        at: 1_000,
        index: 1,
        spec: state.segments[1].clone(),
    };
    let running = reduce(&state, Some(&start));
    assert_eq!(running.active_segment.as_ref().unwrap().end_at_time, 11_000);

    let pause = resolve(&running, Event::Pause, 6_000);
    let paused = reduce(&running, pause.as_ref());
    let fraction = paused
        .active_segment
        .as_ref()
        .unwrap()
        .paused_at_fraction()
        .unwrap();
    assert!((fraction - 0.5).abs() < 1e-6);

    let resume = resolve(&paused, Event::Start, 20_000);
    assert!(matches!(resume, Some(Command::ResumeSegment { .. })));
    let resumed = reduce(&paused, resume.as_ref());
    let active = resumed.active_segment.unwrap();
    assert_eq!(active.end_at_time, 25_000);
    assert!((active.started_at_fraction - 0.5).abs() < 1e-6);
    assert!(!active.is_paused());
}

fn at_last_segment(repeat: bool) -> EngineState {
    let state = EngineState::new(&scenario_a_config(repeat)).unwrap();
    let last = state.segments.len() - 1;
    let start = Command::StartSegment {
        at: 0,
        index: last,
        spec: state.segments[last].clone(),
    };
    reduce(&state, Some(&start))
}

#[test]
fn scenario_c_last_segment_without_repeat_completes() {
    let state = at_last_segment(false);
    assert_eq!(
        resolve(&state, Event::OnSegmentCompleted, 10_000),
        Some(Command::SequenceCompleted)
    );
    let after = reduce(&state, Some(&Command::SequenceCompleted));
    assert_eq!(after, state);
}

#[test]
fn scenario_c_last_segment_with_repeat_wraps() {
    let state = at_last_segment(true);
    let command = resolve(&state, Event::OnSegmentCompleted, 10_000);
    assert!(matches!(command, Some(Command::RepeatExercise { at: 10_000, .. })));
    let after = reduce(&state, command.as_ref());
    assert_eq!(after.index, 0);
    assert_eq!(after.completed_reps, state.completed_reps + 1);
    assert_eq!(
        after.active_segment.unwrap().spec,
        state.segments[0].clone()
    );
}

#[test]
fn pause_when_paused_is_idempotent() {
    let state = at_last_segment(false);
    let paused = reduce(&state, resolve(&state, Event::Pause, 5_000).as_ref());
    let again = resolve(&paused, Event::Pause, 7_000);
    assert_eq!(again, None);
    assert_eq!(reduce(&paused, again.as_ref()), paused);
}

#[test]
fn restart_returns_to_rep_boundary() {
    let state = at_last_segment(false);
    match resolve(&state, Event::RestartSegmentPressed, 1_000) {
        // Only the first transition starts a rep boundary in scenario A.
        Some(Command::StartSegment { index, .. }) => assert_eq!(index, 0),
        other => panic!("expected StartSegment, got {other:?}"),
    }
}

#[test]
fn scheduling_exclusivity() {
    let clock = ManualClock::new(0);
    let substrate = ManualSubstrate::new();
    let fired: Arc<Mutex<Vec<Wakeup>>> = Arc::new(Mutex::new(Vec::new()));
    let sink_fired = fired.clone();
    let sink: WakeupSink = Arc::new(move |w| sink_fired.lock().unwrap().push(w));
    let settings = EngineSettings {
        pings: PingConfig {
            active_pings: 5,
            transition_pings: 2,
        },
        ..EngineSettings::default()
    };
    let mut engine = TimerEngine::new(
        &scenario_a_config(false),
        settings,
        Arc::new(clock.clone()),
        substrate.clone(),
        sink,
    )
    .unwrap();

    // Transition of 3 s with 2 pings configured: 1 completion + 1 ping.
    engine.handle(Event::Start);
    assert_eq!(engine.pending_callbacks(), 2);
    assert_eq!(substrate.pending(), 2);

    // Complete it by hand: the 10 s stretch gets min(5, 10) - 1 = 4 pings.
    engine.handle(Event::OnSegmentCompleted);
    assert_eq!(engine.pending_callbacks(), 5);
    assert_eq!(substrate.pending(), 5);

    for event in [Event::Pause, Event::BackPressed] {
        engine.handle(Event::Start);
        engine.handle(event);
        assert_eq!(engine.pending_callbacks(), 0, "after {event:?}");
        assert_eq!(substrate.pending(), 0, "after {event:?}");
    }

    let expected = callbacks_for(
        &Command::StartSegment {
            at: 0,
            index: 1,
            spec: engine.state().segments[1].clone(),
        },
        settings.pings,
    );
    assert_eq!(expected.len(), 5);
    assert!(fired.lock().unwrap().is_empty());
}

//! Property tests for planning and pause/resume accounting.

use proptest::prelude::*;

use stretchroom_core::timer::{reduce, resolve};
use stretchroom_core::{plan, Command, EngineState, Event, ExerciseConfig, SectionConfig};

fn section_strategy() -> impl Strategy<Value = SectionConfig> {
    (
        "[a-z ]{0,8}",
        0u32..5,
        0u32..10,
        0u32..60,
        0u32..15,
    )
        .prop_map(|(name, rep_count, intro, activity, transition)| SectionConfig {
            section_id: format!("{name}-{rep_count}-{intro}-{activity}-{transition}"),
            name,
            rep_count,
            intro_duration: intro,
            activity_duration: activity,
            transition_duration: transition,
        })
}

fn config_strategy() -> impl Strategy<Value = ExerciseConfig> {
    (any::<bool>(), prop::collection::vec(section_strategy(), 0..5)).prop_map(
        |(repeat, sections)| ExerciseConfig {
            exercise_id: "prop".into(),
            exercise_name: "Prop".into(),
            repeat,
            sections,
        },
    )
}

/// A state running a single stretch of `seconds` started at `t0`.
fn running(seconds: u32, t0: i64) -> EngineState {
    let config = ExerciseConfig::new("p").with_section(SectionConfig {
        section_id: "s".into(),
        name: String::new(),
        rep_count: 1,
        intro_duration: 0,
        activity_duration: seconds,
        transition_duration: 0,
    });
    let state = EngineState::new(&config).unwrap();
    let start = Command::StartSegment {
        at: t0,
        index: 0,
        spec: state.segments[0].clone(),
    };
    reduce(&state, Some(&start))
}

proptest! {
    #[test]
    fn planner_is_deterministic(config in config_strategy()) {
        prop_assert_eq!(plan(&config), plan(&config.clone()));
    }

    #[test]
    fn at_most_one_last_segment(config in config_strategy()) {
        let last = plan(&config).iter().filter(|s| s.is_last()).count();
        prop_assert!(last <= 1);
        if config.repeat {
            prop_assert_eq!(last, 0);
        }
    }

    #[test]
    fn pause_resume_round_trip(
        seconds in 1u32..600,
        t0 in 0i64..1_000_000,
        pause_offset in 0i64..600_000,
        gap in 0i64..10_000_000,
    ) {
        let state = running(seconds, t0);
        let end = state.active_segment.as_ref().unwrap().end_at_time;
        let t1 = t0 + pause_offset.min(i64::from(seconds) * 1000);

        let paused = reduce(&state, resolve(&state, Event::Pause, t1).as_ref());
        let t2 = t1 + gap;
        let resumed = reduce(&paused, resolve(&paused, Event::Start, t2).as_ref());
        let active = resumed.active_segment.unwrap();

        prop_assert!(!active.is_paused());
        prop_assert_eq!(active.remaining_duration_ms(), end - t1);
        prop_assert_eq!(active.end_at_time, t2 + (end - t1));
        let paused_fraction = paused.active_segment.unwrap().paused_at_fraction().unwrap();
        prop_assert!((active.started_at_fraction - paused_fraction).abs() <= 1e-6);
    }

    #[test]
    fn fraction_never_decreases(
        seconds in 1u32..300,
        steps in prop::collection::vec((0i64..5_000, 0i64..50_000), 1..12),
    ) {
        let mut now = 0i64;
        let mut state = running(seconds, now);
        let mut last_fraction = 0.0f64;

        for (run_for, pause_for) in steps {
            now += run_for;
            state = reduce(&state, resolve(&state, Event::Pause, now).as_ref());
            let fraction = state
                .active_segment
                .as_ref()
                .and_then(|a| a.paused_at_fraction())
                .unwrap();
            prop_assert!(fraction + 1e-9 >= last_fraction);
            prop_assert!((0.0..=1.0).contains(&fraction));
            last_fraction = fraction;

            now += pause_for;
            state = reduce(&state, resolve(&state, Event::Start, now).as_ref());
        }
    }

    #[test]
    fn remaining_time_is_conserved_across_cycles(
        seconds in 1u32..300,
        steps in prop::collection::vec((0i64..2_000, 0i64..50_000), 1..8),
    ) {
        // Total running time plus what is left always equals the duration,
        // as long as no run overshoots the end.
        let mut now = 0i64;
        let mut state = running(seconds, now);
        let mut ran = 0i64;
        let total = i64::from(seconds) * 1000;

        for (run_for, pause_for) in steps {
            let remaining = state.active_segment.as_ref().unwrap().remaining_duration_ms();
            let run_for = run_for.min(remaining);
            now += run_for;
            ran += run_for;
            state = reduce(&state, resolve(&state, Event::Pause, now).as_ref());
            now += pause_for;
            state = reduce(&state, resolve(&state, Event::Start, now).as_ref());
            let active = state.active_segment.as_ref().unwrap();
            prop_assert_eq!(ran + active.remaining_duration_ms(), total);
            let expected_fraction = ran as f64 / total as f64;
            prop_assert!((active.started_at_fraction - expected_fraction).abs() <= 1e-6);
        }
    }
}

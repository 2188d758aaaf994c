use serde::{Deserialize, Serialize};

use super::active::ActiveSegment;
use crate::error::PlanError;
use crate::plan::{self, ExerciseConfig, SegmentKind, SegmentSpec};

/// Everything the resolver and reducer need about one timer session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub has_started: bool,
    pub segments: Vec<SegmentSpec>,
    pub index: usize,
    pub active_segment: Option<ActiveSegment>,
    /// Full passes replayed from index 0.
    pub completed_reps: u32,
    /// Copied from the plan; decides what happens after the final segment.
    pub repeat: bool,
}

impl EngineState {
    /// Plan the segments for `config` and build the idle state.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Empty`] when the plan yields no segments.
    pub fn new(config: &ExerciseConfig) -> Result<Self, PlanError> {
        let segments = plan::plan_checked(config)?;
        Ok(Self::from_segments(segments, config.repeat))
    }

    pub(crate) fn from_segments(segments: Vec<SegmentSpec>, repeat: bool) -> Self {
        Self {
            has_started: false,
            segments,
            index: 0,
            active_segment: None,
            completed_reps: 0,
            repeat,
        }
    }

    pub fn current_segment(&self) -> Option<&SegmentSpec> {
        self.segments.get(self.index)
    }

    pub fn is_running(&self) -> bool {
        self.active_segment
            .as_ref()
            .is_some_and(|active| !active.is_paused())
    }

    pub fn is_paused(&self) -> bool {
        self.active_segment
            .as_ref()
            .is_some_and(ActiveSegment::is_paused)
    }

    /// Build a display view at instant `now`.
    pub fn snapshot(&self, now: i64) -> Snapshot {
        let segment = self.current_segment();
        let active = self.active_segment.as_ref();
        Snapshot {
            has_started: self.has_started,
            index: self.index,
            total_segments: self.segments.len(),
            segment_name: segment.map(|s| s.name().to_string()).unwrap_or_default(),
            segment_kind: segment.map(SegmentSpec::kind),
            position: segment.map(SegmentSpec::position).unwrap_or_default(),
            remaining_ms: active
                .map(|a| a.remaining_at(now))
                .or_else(|| segment.map(SegmentSpec::duration_ms))
                .unwrap_or(0),
            total_ms: segment.map(SegmentSpec::duration_ms).unwrap_or(0),
            fraction: active.map(|a| a.fraction_at(now)).unwrap_or(0.0),
            paused: self.is_paused(),
            completed_reps: self.completed_reps,
        }
    }
}

/// Serializable view of the session for outer layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub has_started: bool,
    pub index: usize,
    pub total_segments: usize,
    pub segment_name: String,
    pub segment_kind: Option<SegmentKind>,
    pub position: String,
    pub remaining_ms: i64,
    pub total_ms: i64,
    pub fraction: f64,
    pub paused: bool,
    pub completed_reps: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::SectionConfig;

    fn config() -> ExerciseConfig {
        ExerciseConfig::new("Test").with_section(SectionConfig {
            section_id: "a".into(),
            name: "".into(),
            rep_count: 2,
            intro_duration: 0,
            activity_duration: 10,
            transition_duration: 3,
        })
    }

    #[test]
    fn new_state_is_idle() {
        let state = EngineState::new(&config()).unwrap();
        assert!(!state.has_started);
        assert_eq!(state.segments.len(), 4);
        assert!(!state.is_running());
        assert!(!state.is_paused());
    }

    #[test]
    fn empty_plan_never_builds_a_state() {
        let mut cfg = config();
        cfg.sections[0].activity_duration = 0;
        cfg.sections[0].transition_duration = 0;
        assert_eq!(EngineState::new(&cfg), Err(PlanError::Empty));
    }

    #[test]
    fn idle_snapshot_shows_first_segment() {
        let state = EngineState::new(&config()).unwrap();
        let snap = state.snapshot(0);
        assert_eq!(snap.index, 0);
        assert_eq!(snap.total_segments, 4);
        assert_eq!(snap.segment_kind, Some(SegmentKind::Transition));
        assert_eq!(snap.position, "1 / 2");
        assert_eq!(snap.remaining_ms, 3_000);
        assert_eq!(snap.fraction, 0.0);
    }

    #[test]
    fn running_snapshot_tracks_clock() {
        let mut state = EngineState::new(&config()).unwrap();
        let spec = state.segments[0].clone();
        state.active_segment = Some(ActiveSegment::start(1_000, spec));
        let snap = state.snapshot(2_500);
        assert_eq!(snap.remaining_ms, 1_500);
        assert!((snap.fraction - 0.5).abs() < 1e-9);
        assert!(!snap.paused);
    }
}

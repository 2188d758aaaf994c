use serde::{Deserialize, Serialize};

use super::active::ActiveSegment;
use crate::plan::SegmentSpec;

/// A resolved state transition. Timestamps are the single `now` sampled for
/// the event that produced the command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    StartSegment {
        at: i64,
        index: usize,
        spec: SegmentSpec,
    },
    /// Start over from index 0 and count a completed pass.
    RepeatExercise { at: i64, spec: SegmentSpec },
    ResumeSegment {
        at: i64,
        fraction: f64,
        paused: ActiveSegment,
    },
    PauseSegment { at: i64, running: ActiveSegment },
    GoBack,
    SequenceCompleted,
}

impl Command {
    /// Label used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::StartSegment { .. } => "start_segment",
            Command::RepeatExercise { .. } => "repeat_exercise",
            Command::ResumeSegment { .. } => "resume_segment",
            Command::PauseSegment { .. } => "pause_segment",
            Command::GoBack => "go_back",
            Command::SequenceCompleted => "sequence_completed",
        }
    }
}

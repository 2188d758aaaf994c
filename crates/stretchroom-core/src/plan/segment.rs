use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Announcement,
    Transition,
    Stretch,
}

/// One timed phase of a plan, produced by the planner and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SegmentSpec {
    /// Section intro; the name is read out while it runs.
    #[serde(rename_all = "camelCase")]
    Announcement { name: String, duration_seconds: u32 },
    /// Rest between repetitions.
    #[serde(rename_all = "camelCase")]
    Transition {
        name: String,
        duration_seconds: u32,
        index: u32,
        rep_count: u32,
        is_start_of_segment: bool,
    },
    /// Active stretch.
    #[serde(rename_all = "camelCase")]
    Stretch {
        name: String,
        duration_seconds: u32,
        index: u32,
        rep_count: u32,
        is_last: bool,
        is_start_of_segment: bool,
    },
}

impl SegmentSpec {
    pub fn kind(&self) -> SegmentKind {
        match self {
            SegmentSpec::Announcement { .. } => SegmentKind::Announcement,
            SegmentSpec::Transition { .. } => SegmentKind::Transition,
            SegmentSpec::Stretch { .. } => SegmentKind::Stretch,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SegmentSpec::Announcement { name, .. }
            | SegmentSpec::Transition { name, .. }
            | SegmentSpec::Stretch { name, .. } => name,
        }
    }

    pub fn duration_seconds(&self) -> u32 {
        match self {
            SegmentSpec::Announcement {
                duration_seconds, ..
            }
            | SegmentSpec::Transition {
                duration_seconds, ..
            }
            | SegmentSpec::Stretch {
                duration_seconds, ..
            } => *duration_seconds,
        }
    }

    /// Get segment duration in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        i64::from(self.duration_seconds()) * 1000
    }

    /// Only the final stretch of a non-repeating plan is last.
    pub fn is_last(&self) -> bool {
        matches!(self, SegmentSpec::Stretch { is_last: true, .. })
    }

    /// Whether this segment begins a repetition boundary ("restart rep" target).
    pub fn is_start_of_segment(&self) -> bool {
        match self {
            SegmentSpec::Announcement { .. } => true,
            SegmentSpec::Transition {
                is_start_of_segment,
                ..
            }
            | SegmentSpec::Stretch {
                is_start_of_segment,
                ..
            } => *is_start_of_segment,
        }
    }

    /// "2 / 5" style repetition label, empty for single-rep sections.
    pub fn position(&self) -> String {
        match self {
            SegmentSpec::Announcement { .. } => String::new(),
            SegmentSpec::Transition {
                index, rep_count, ..
            }
            | SegmentSpec::Stretch {
                index, rep_count, ..
            } => {
                if *rep_count <= 1 {
                    String::new()
                } else {
                    format!("{} / {}", index + 1, rep_count)
                }
            }
        }
    }
}

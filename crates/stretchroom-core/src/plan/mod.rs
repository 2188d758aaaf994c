mod exercise;
mod planner;
mod segment;

pub use exercise::{sample_plan, ExerciseConfig, SectionConfig};
pub use planner::{plan, plan_checked};
pub use segment::{SegmentKind, SegmentSpec};

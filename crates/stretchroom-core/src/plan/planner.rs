//! Segment planner.
//!
//! Flattens an [`ExerciseConfig`] into the linear list of timed segments the
//! engine walks through. For every section:
//!
//! ```text
//! [Announcement]  (Transition? Stretch?) x rep_count
//! ```
//!
//! The announcement exists when the section has a name or an intro duration.
//! The first repetition skips its transition when an announcement precedes it.

use super::exercise::ExerciseConfig;
use super::segment::SegmentSpec;
use crate::error::PlanError;

/// Derive the segment list for a plan. Pure; equal input gives equal output.
pub fn plan(config: &ExerciseConfig) -> Vec<SegmentSpec> {
    let section_count = config.sections.len();
    let mut segments = Vec::new();

    for (section_index, section) in config.sections.iter().enumerate() {
        let has_intro = section.has_intro();
        let has_transition = section.transition_duration > 0;
        let is_last_section = section_index + 1 == section_count;

        if has_intro {
            segments.push(SegmentSpec::Announcement {
                name: section.name.clone(),
                duration_seconds: section.intro_duration,
            });
        }

        for it in 0..section.rep_count {
            if (!has_intro || it > 0) && has_transition {
                segments.push(SegmentSpec::Transition {
                    name: section.name.clone(),
                    duration_seconds: section.transition_duration,
                    index: it,
                    rep_count: section.rep_count,
                    is_start_of_segment: it == 0 && !has_intro,
                });
            }

            if section.activity_duration > 0 {
                segments.push(SegmentSpec::Stretch {
                    name: section.name.clone(),
                    duration_seconds: section.activity_duration,
                    index: it,
                    rep_count: section.rep_count,
                    is_last: !config.repeat && is_last_section && it + 1 == section.rep_count,
                    is_start_of_segment: it == 0 && !has_intro && !has_transition,
                });
            }
        }
    }

    segments
}

/// Like [`plan`], but rejects a plan that yields no segments.
///
/// # Errors
///
/// Returns [`PlanError::Empty`] when every section contributes nothing.
pub fn plan_checked(config: &ExerciseConfig) -> Result<Vec<SegmentSpec>, PlanError> {
    let segments = plan(config);
    if segments.is_empty() {
        return Err(PlanError::Empty);
    }
    Ok(segments)
}

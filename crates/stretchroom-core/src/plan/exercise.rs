use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use super::planner;
use crate::error::PlanError;

/// A user-authored group of repeated segments sharing name and durations.
///
/// Durations are whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionConfig {
    pub section_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_rep_count")]
    pub rep_count: u32,
    #[serde(default)]
    pub intro_duration: u32,
    #[serde(default)]
    pub activity_duration: u32,
    #[serde(default)]
    pub transition_duration: u32,
}

fn default_rep_count() -> u32 {
    1
}

impl SectionConfig {
    /// New section with a fresh id and the editor's default durations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            section_id: Uuid::new_v4().to_string(),
            name: name.into(),
            rep_count: 1,
            intro_duration: 5,
            activity_duration: 30,
            transition_duration: 5,
        }
    }

    pub fn has_intro(&self) -> bool {
        !self.name.trim().is_empty() || self.intro_duration > 0
    }
}

/// A complete stretch plan as stored and edited outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseConfig {
    pub exercise_id: String,
    pub exercise_name: String,
    #[serde(default)]
    pub repeat: bool,
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

impl ExerciseConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            exercise_id: Uuid::new_v4().to_string(),
            exercise_name: name.into(),
            repeat: false,
            sections: Vec::new(),
        }
    }

    pub fn with_section(mut self, section: SectionConfig) -> Self {
        self.sections.push(section);
        self
    }

    /// Sum of all planned segment durations, in seconds.
    pub fn total_duration_secs(&self) -> u64 {
        planner::plan(self)
            .iter()
            .map(|s| u64::from(s.duration_seconds()))
            .sum()
    }

    /// Check that the plan can start a timer session.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::NoSections`] for a plan without sections,
    /// [`PlanError::InvalidSection`] for blank or duplicate section ids and
    /// [`PlanError::Empty`] when no section yields a segment.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.sections.is_empty() {
            return Err(PlanError::NoSections);
        }

        let mut seen = HashSet::new();
        for (index, section) in self.sections.iter().enumerate() {
            if section.section_id.trim().is_empty() {
                return Err(PlanError::InvalidSection {
                    index,
                    message: "section id is blank".into(),
                });
            }
            if !seen.insert(section.section_id.as_str()) {
                return Err(PlanError::InvalidSection {
                    index,
                    message: format!("duplicate section id '{}'", section.section_id),
                });
            }
        }

        planner::plan_checked(self).map(|_| ())
    }
}

/// A small built-in plan offered when nothing has been saved yet.
pub fn sample_plan() -> ExerciseConfig {
    ExerciseConfig {
        exercise_id: "sample".into(),
        exercise_name: "Morning Stretch".into(),
        repeat: false,
        sections: vec![
            SectionConfig {
                section_id: "sample-neck".into(),
                name: "Neck Rolls".into(),
                rep_count: 2,
                intro_duration: 5,
                activity_duration: 20,
                transition_duration: 5,
            },
            SectionConfig {
                section_id: "sample-hamstring".into(),
                name: "Hamstring Stretch".into(),
                rep_count: 3,
                intro_duration: 5,
                activity_duration: 30,
                transition_duration: 10,
            },
        ],
    }
}

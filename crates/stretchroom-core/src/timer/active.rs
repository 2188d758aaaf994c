//! Progress accounting for the segment currently on screen.
//!
//! Progress is a fraction in `[0, 1]`. A run that resumed from a nonzero
//! fraction maps its wall-clock window onto the remaining range
//! `[started_at_fraction, 1]`, so repeated pause/resume cycles keep adding up
//! to the same total duration.

use serde::{Deserialize, Serialize};

use crate::plan::SegmentSpec;

/// A running or paused segment.
///
/// The paused fields are either both `Some` or both `None`; the constructors
/// below are the only way to change them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSegment {
    pub started_at_time: i64,
    pub started_at_fraction: f64,
    /// Projected completion, assuming no further pause.
    pub end_at_time: i64,
    paused_at_time: Option<i64>,
    paused_at_fraction: Option<f64>,
    pub spec: SegmentSpec,
}

impl ActiveSegment {
    /// Fresh run from the beginning of `spec`.
    pub fn start(at: i64, spec: SegmentSpec) -> Self {
        Self {
            started_at_time: at,
            started_at_fraction: 0.0,
            end_at_time: at + spec.duration_ms(),
            paused_at_time: None,
            paused_at_fraction: None,
            spec,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at_time.is_some() && self.paused_at_fraction.is_some()
    }

    pub fn paused_at_time(&self) -> Option<i64> {
        self.paused_at_time
    }

    pub fn paused_at_fraction(&self) -> Option<f64> {
        self.paused_at_fraction
    }

    /// Time left when the run (re)started or was paused.
    ///
    /// May be negative if a pause landed after the projected end.
    pub fn remaining_duration_ms(&self) -> i64 {
        self.end_at_time - self.paused_at_time.unwrap_or(self.started_at_time)
    }

    /// Progress at instant `t`.
    pub fn fraction_at(&self, t: i64) -> f64 {
        if let Some(fraction) = self.paused_at_fraction {
            return fraction;
        }
        let window = self.end_at_time - self.started_at_time;
        let current = if window <= 0 {
            1.0
        } else {
            (t - self.started_at_time) as f64 / window as f64
        };
        let scaling = 1.0 - self.started_at_fraction;
        (self.started_at_fraction + scaling * current).clamp(0.0, 1.0)
    }

    /// Milliseconds left at `t`, never negative.
    pub fn remaining_at(&self, t: i64) -> i64 {
        let reference = self.paused_at_time.unwrap_or(t);
        (self.end_at_time - reference).max(0)
    }

    /// Freeze progress at `t`.
    pub fn paused_at(&self, t: i64) -> Self {
        Self {
            paused_at_time: Some(t),
            paused_at_fraction: Some(self.fraction_at(t)),
            ..self.clone()
        }
    }

    /// Continue a paused run at `t` from `fraction`.
    pub fn resumed_at(&self, t: i64, fraction: f64) -> Self {
        Self {
            started_at_time: t,
            started_at_fraction: fraction,
            end_at_time: t + self.remaining_duration_ms(),
            paused_at_time: None,
            paused_at_fraction: None,
            spec: self.spec.clone(),
        }
    }
}

//! # Stretchroom Core Library
//!
//! This library provides the core logic for the Stretchroom stretch timer.
//! Front-ends (the CLI here, a mobile or desktop shell elsewhere) stay thin
//! layers over the same engine.
//!
//! ## Architecture
//!
//! - **Planner**: flattens a user-authored [`ExerciseConfig`] into a linear
//!   list of timed [`SegmentSpec`]s
//! - **Timer Engine**: a wall-clock state machine built from a pure resolver
//!   (`(state, event) -> command`) and a pure reducer
//!   (`(state, command) -> state`)
//! - **Scheduler**: cancellable wake-ups for segment completion and countdown
//!   pings
//! - **Session**: a tokio task that owns one engine and serializes all input
//! - **Storage**: TOML-based settings and plan files
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`EventScheduler`]: Pending callbacks for the active segment
//! - [`Config`]: Application configuration management
//! - [`PlanStore`]: Saved exercise plans

pub mod clock;
pub mod error;
pub mod events;
pub mod plan;
pub mod scheduler;
pub mod session;
pub mod sound;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, MonotonicClock, SystemClock};
pub use error::{ConfigError, CoreError, PlanError, StorageError};
pub use events::{Effect, Event};
pub use plan::{plan, sample_plan, ExerciseConfig, SectionConfig, SegmentKind, SegmentSpec};
pub use scheduler::{EventScheduler, ManualSubstrate, PingConfig, TokioSubstrate, Wakeup, WakeupKind};
pub use session::SessionHandle;
pub use sound::{SilentPlayer, SoundEffect, SoundPlayer, TracingPlayer};
pub use storage::{Config, PlanStore};
pub use timer::{ActiveSegment, Command, EngineSettings, EngineState, Snapshot, TimerEngine};

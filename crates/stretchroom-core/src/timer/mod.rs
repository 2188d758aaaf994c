mod active;
mod command;
mod engine;
mod reducer;
mod resolver;
mod state;

pub use active::ActiveSegment;
pub use command::Command;
pub use engine::{EngineSettings, TimerEngine};
pub use reducer::reduce;
pub use resolver::resolve;
pub use state::{EngineState, Snapshot};

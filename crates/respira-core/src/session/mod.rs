pub mod amplitude;
mod engine;
mod recorder;

pub use engine::{SessionEngine, SessionRunState, SessionStatus};
pub use recorder::{DatabaseRecorder, NullRecorder, SessionRecorder, SessionSummary};

// Port Layer - Interfaces for external dependencies

pub mod clock; // For deterministic timestamps
pub mod process_launcher;

// Re-exports
pub use clock::{Clock, SystemClock};
pub use process_launcher::{ChildStdout, LaunchError, LaunchSpec, ProcessLauncher, RunningProcess};

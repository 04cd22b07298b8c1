// Domain Layer - Pure supervision model

pub mod constants;
pub mod launch_line;
pub mod outcome;
pub mod request;

// Re-exports
pub use launch_line::format_launch_line;
pub use outcome::{ExitOutcome, SupervisionReport};
pub use request::{OutputPaths, SupervisionRequest};

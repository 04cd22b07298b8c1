// Central Error Type for supervision

use std::path::PathBuf;
use thiserror::Error;

/// Supervision error type
///
/// Exec failure of the child program is NOT an error: it is reported as
/// `ExitOutcome::LaunchFailed`. Read errors on the channel are NOT errors
/// either: they end the relay and show up in `SupervisionReport::read_anomaly`.
#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Empty command: a program to run is required")]
    EmptyCommand,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Failed to open output file {}: {source}", path.display())]
    OutputFileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Resource creation failed: {0}")]
    ResourceCreation(String),

    #[error("Output sink failed: {0}")]
    Sink(String),

    #[error("Failed to wait for child: {0}")]
    Wait(String),
}

/// Result type alias using SupervisorError
pub type Result<T> = std::result::Result<T, SupervisorError>;

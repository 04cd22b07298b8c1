// Supervision Outcome Domain Model

use serde::{Deserialize, Serialize};

use super::constants::{LAUNCH_FAILED_EXIT_CODE, SIGNAL_EXIT_CODE_BASE};
use super::request::OutputPaths;

/// How the supervised child ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExitOutcome {
    /// Normal exit with a status code
    Exited(i32),
    /// Terminated by a signal (unix)
    Signaled(i32),
    /// The program image could not be executed
    LaunchFailed,
}

impl ExitOutcome {
    /// Process exit code equivalent, as a shell would report it
    pub fn code(&self) -> i32 {
        match self {
            ExitOutcome::Exited(code) => *code,
            ExitOutcome::Signaled(signal) => SIGNAL_EXIT_CODE_BASE + signal,
            ExitOutcome::LaunchFailed => LAUNCH_FAILED_EXIT_CODE,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, ExitOutcome::Exited(0))
    }
}

impl std::fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitOutcome::Exited(code) => write!(f, "exited with code {}", code),
            ExitOutcome::Signaled(signal) => write!(f, "terminated by signal {}", signal),
            ExitOutcome::LaunchFailed => write!(f, "failed to launch"),
        }
    }
}

/// Summary of one completed supervision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisionReport {
    pub outcome: ExitOutcome,
    /// Bytes relayed from the child (launch line excluded)
    pub bytes_relayed: u64,
    pub chunks: u64,
    /// Read error that ended the relay early, if any
    pub read_anomaly: Option<String>,
    pub output_paths: OutputPaths,
    pub duration_ms: i64,
}

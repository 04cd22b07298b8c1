// Supervision Request Domain Model

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::constants::{DEFAULT_STDERR_PATH, DEFAULT_STDOUT_PATH};
use crate::error::{Result, SupervisorError};

/// One supervised run: the command to launch and where its output goes.
///
/// Constructed by the caller, consumed by a single `Supervisor::supervise`
/// call, then discarded. Payloads go through `from_payload` so the non-empty
/// command invariant cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisionRequest {
    /// Program followed by its arguments (never empty)
    command: Vec<String>,

    pub stdout_path: Option<String>,

    /// Accepted and resolved, but nothing is ever captured into it
    pub stderr_path: Option<String>,

    /// Directory the child runs in (output paths are NOT resolved against it)
    pub working_dir: Option<PathBuf>,
}

impl SupervisionRequest {
    /// Create a request for `command` with default output paths
    ///
    /// # Errors
    /// - `SupervisorError::EmptyCommand` if `command` has no program element
    pub fn new<I, S>(command: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command: Vec<String> = command.into_iter().map(Into::into).collect();
        if command.is_empty() {
            return Err(SupervisorError::EmptyCommand);
        }

        Ok(Self {
            command,
            stdout_path: None,
            stderr_path: None,
            working_dir: None,
        })
    }

    pub fn with_stdout_path(mut self, path: impl Into<String>) -> Self {
        self.stdout_path = Some(path.into());
        self
    }

    pub fn with_stderr_path(mut self, path: impl Into<String>) -> Self {
        self.stderr_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Parse a request from a JSON payload
    ///
    /// Expected shape:
    /// ```text
    /// {
    ///   "command": ["printf", "hello"],
    ///   "stdout_file": "out.txt",      // optional
    ///   "stderr_file": "err.txt",      // optional
    ///   "working_dir": "/tmp"          // optional
    /// }
    /// ```
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self> {
        let command = payload
            .get("command")
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                SupervisorError::InvalidPayload("Missing 'command' array in payload".to_string())
            })?
            .iter()
            .map(|v| {
                v.as_str().map(str::to_string).ok_or_else(|| {
                    SupervisorError::InvalidPayload(format!(
                        "Non-string element in 'command': {}",
                        v
                    ))
                })
            })
            .collect::<Result<Vec<String>>>()?;

        let optional_str = |key: &str| -> Result<Option<String>> {
            match payload.get(key) {
                None | Some(serde_json::Value::Null) => Ok(None),
                Some(v) => v.as_str().map(|s| Some(s.to_string())).ok_or_else(|| {
                    SupervisorError::InvalidPayload(format!("'{}' must be a string", key))
                }),
            }
        };

        let mut request = Self::new(command)?;
        request.stdout_path = optional_str("stdout_file")?;
        request.stderr_path = optional_str("stderr_file")?;
        request.working_dir = optional_str("working_dir")?.map(PathBuf::from);

        Ok(request)
    }

    /// Program to execute (first element of the command)
    pub fn program(&self) -> &str {
        // Non-empty by construction
        &self.command[0]
    }

    pub fn args(&self) -> &[String] {
        &self.command[1..]
    }

    /// Resolve the effective output paths (empty string counts as absent)
    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths {
            stdout: resolve_path(self.stdout_path.as_deref(), DEFAULT_STDOUT_PATH),
            stderr: resolve_path(self.stderr_path.as_deref(), DEFAULT_STDERR_PATH),
        }
    }
}

fn resolve_path(path: Option<&str>, default: &str) -> PathBuf {
    match path {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => PathBuf::from(default),
    }
}

/// Effective output file locations after default substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    pub stdout: PathBuf,
    pub stderr: PathBuf,
}

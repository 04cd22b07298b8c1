// Process Launcher Port
// Abstraction over spawning a child with its stdout captured through a pipe

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::io::AsyncRead;

use crate::domain::{ExitOutcome, SupervisionRequest};

/// Read end of the child's stdout channel
pub type ChildStdout = Box<dyn AsyncRead + Send + Unpin>;

/// Everything the launcher needs to start one child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl LaunchSpec {
    pub fn from_request(request: &SupervisionRequest) -> Self {
        Self {
            program: request.program().to_string(),
            args: request.args().to_vec(),
            working_dir: request.working_dir.clone(),
        }
    }
}

/// Launch errors
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The program image could not be executed (missing, not executable, bad format)
    #[error("Exec failed: {0}")]
    Exec(String),

    /// Pipe or process creation failed (descriptor/process exhaustion)
    #[error("Resource creation failed: {0}")]
    Resource(String),
}

/// Process Launcher trait
///
/// Implementations:
/// - TokioProcessLauncher (childtee-infra-system): real child processes
/// - mocks::ScriptedLauncher: canned output for tests
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Start the child with stdout piped to the caller and stderr inherited
    ///
    /// # Errors
    /// - LaunchError::Exec if the program cannot be executed
    /// - LaunchError::Resource if the pipe or process cannot be created
    async fn launch(&self, spec: &LaunchSpec) -> Result<Box<dyn RunningProcess>, LaunchError>;
}

/// Handle to a launched child
#[async_trait]
pub trait RunningProcess: Send {
    /// OS process id, if still known
    fn id(&self) -> Option<u32>;

    /// Take ownership of the stdout read end (returns None on the second call)
    fn take_stdout(&mut self) -> Option<ChildStdout>;

    /// Block until the child exits and collect its status
    async fn wait(&mut self) -> std::io::Result<ExitOutcome>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::io;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    /// Scripted launcher behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Child writes `stdout` then ends with `outcome`
        Output { stdout: Vec<u8>, outcome: ExitOutcome },
        /// Child writes `stdout`, then the channel read fails with `message`
        ReadError {
            stdout: Vec<u8>,
            message: String,
            outcome: ExitOutcome,
        },
        /// Child writes `stdout`, then collecting its status fails
        WaitError { stdout: Vec<u8>, message: String },
        /// Program cannot be executed
        ExecFailure(String),
        /// Pipe/fork could not be created
        ResourceFailure(String),
    }

    /// Mock launcher that replays a scripted child
    pub struct ScriptedLauncher {
        behavior: MockBehavior,
        launched: Arc<Mutex<Vec<LaunchSpec>>>,
    }

    impl ScriptedLauncher {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                launched: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_output(stdout: impl Into<Vec<u8>>, exit_code: i32) -> Self {
            Self::new(MockBehavior::Output {
                stdout: stdout.into(),
                outcome: ExitOutcome::Exited(exit_code),
            })
        }

        pub fn new_exec_failure(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::ExecFailure(message.into()))
        }

        pub fn call_count(&self) -> usize {
            self.launched.lock().unwrap().len()
        }

        pub fn launched_specs(&self) -> Vec<LaunchSpec> {
            self.launched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProcessLauncher for ScriptedLauncher {
        async fn launch(
            &self,
            spec: &LaunchSpec,
        ) -> Result<Box<dyn RunningProcess>, LaunchError> {
            self.launched.lock().unwrap().push(spec.clone());

            let process = match self.behavior.clone() {
                MockBehavior::Output { stdout, outcome } => ScriptedProcess {
                    stdout: Some(Box::new(io::Cursor::new(stdout))),
                    wait_result: Ok(outcome),
                },
                MockBehavior::ReadError {
                    stdout,
                    message,
                    outcome,
                } => ScriptedProcess {
                    stdout: Some(Box::new(FailingReader::new(stdout, message))),
                    wait_result: Ok(outcome),
                },
                MockBehavior::WaitError { stdout, message } => ScriptedProcess {
                    stdout: Some(Box::new(io::Cursor::new(stdout))),
                    wait_result: Err(message),
                },
                MockBehavior::ExecFailure(msg) => return Err(LaunchError::Exec(msg)),
                MockBehavior::ResourceFailure(msg) => return Err(LaunchError::Resource(msg)),
            };

            Ok(Box::new(process))
        }
    }

    struct ScriptedProcess {
        stdout: Option<ChildStdout>,
        wait_result: Result<ExitOutcome, String>,
    }

    #[async_trait]
    impl RunningProcess for ScriptedProcess {
        fn id(&self) -> Option<u32> {
            None
        }

        fn take_stdout(&mut self) -> Option<ChildStdout> {
            self.stdout.take()
        }

        async fn wait(&mut self) -> io::Result<ExitOutcome> {
            self.wait_result.clone().map_err(io::Error::other)
        }
    }

    /// Reader that yields `data` and then fails instead of reporting end-of-stream
    pub struct FailingReader {
        data: io::Cursor<Vec<u8>>,
        message: String,
    }

    impl FailingReader {
        pub fn new(data: impl Into<Vec<u8>>, message: impl Into<String>) -> Self {
            Self {
                data: io::Cursor::new(data.into()),
                message: message.into(),
            }
        }
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let this = self.get_mut();
            if (this.data.position() as usize) < this.data.get_ref().len() {
                return Pin::new(&mut this.data).poll_read(cx, buf);
            }
            Poll::Ready(Err(io::Error::other(this.message.clone())))
        }
    }
}

// Supervisor: launch one child, tee its stdout to console + file, reap it
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use super::relay::{relay, write_to_sinks, RelayError, RelaySummary, Sink};
use crate::domain::constants::{END_BANNER, START_BANNER};
use crate::domain::{format_launch_line, ExitOutcome, SupervisionReport, SupervisionRequest};
use crate::error::{Result, SupervisorError};
use crate::port::{Clock, LaunchError, LaunchSpec, ProcessLauncher, RunningProcess};

/// Process supervisor
///
/// Owns the output files for the duration of one run. The child only ever
/// holds the write end of its stdout channel; the supervisor only ever holds
/// the read end, so the relay sees end-of-stream once the child (and anything
/// it forked that kept stdout open) is gone.
pub struct Supervisor {
    launcher: Arc<dyn ProcessLauncher>,
    clock: Arc<dyn Clock>,
}

impl Supervisor {
    /// Create a new supervisor
    ///
    /// # Arguments
    /// * `launcher` - Process launcher (real or scripted)
    /// * `clock` - Clock for the launch line timestamp and duration tracking
    ///
    /// # Example
    /// ```ignore
    /// let supervisor = Supervisor::new(
    ///     Arc::new(TokioProcessLauncher::new()),
    ///     Arc::new(SystemClock),
    /// );
    /// ```
    pub fn new(launcher: Arc<dyn ProcessLauncher>, clock: Arc<dyn Clock>) -> Self {
        Self { launcher, clock }
    }

    /// Supervise `request`, teeing to this process's stdout
    pub async fn supervise(&self, request: &SupervisionRequest) -> Result<SupervisionReport> {
        let mut console = tokio::io::stdout();
        self.supervise_with_console(request, &mut console).await
    }

    /// Supervise `request`, teeing to `console`
    ///
    /// Blocks until the child exits; there is no timeout.
    ///
    /// # Errors
    /// - SupervisorError::OutputFileOpen if either output file cannot be created
    /// - SupervisorError::ResourceCreation if the pipe or process cannot be created
    /// - SupervisorError::Sink if the console or stdout file rejects a write
    /// - SupervisorError::Wait if the child's exit status cannot be collected
    pub async fn supervise_with_console<C>(
        &self,
        request: &SupervisionRequest,
        console: &mut C,
    ) -> Result<SupervisionReport>
    where
        C: AsyncWrite + Send + Unpin,
    {
        let start_time = self.clock.now_millis();
        let output_paths = request.output_paths();

        debug!(
            stdout_path = %output_paths.stdout.display(),
            stderr_path = %output_paths.stderr.display(),
            "Opening output files"
        );

        let mut stdout_file = create_output(&output_paths.stdout).await?;
        // Nothing is captured into this one; it is created/truncated and held
        let stderr_file = create_output(&output_paths.stderr).await?;

        let spec = LaunchSpec::from_request(request);
        info!(
            program = %spec.program,
            args = ?spec.args,
            working_dir = ?spec.working_dir,
            "Launching child"
        );

        // Nothing reaches the console or the stdout file unless a child exists
        let launched = match self.launcher.launch(&spec).await {
            Ok(process) => Ok(process),
            Err(LaunchError::Exec(reason)) => Err(reason),
            Err(LaunchError::Resource(reason)) => {
                error!(program = %spec.program, reason = %reason, "Could not create child");
                return Err(SupervisorError::ResourceCreation(reason));
            }
        };

        // Nothing is read from the pipe yet, so the launch line precedes every child byte
        let preamble = self.write_preamble(&mut *console, &mut stdout_file).await;

        let (outcome, summary) = match launched {
            Ok(mut process) => {
                if let Err(err) = preamble {
                    drop(process.take_stdout());
                    let _ = process.wait().await;
                    return Err(err);
                }
                info!(pid = ?process.id(), "Child running");
                self.relay_and_reap(process.as_mut(), &mut *console, &mut stdout_file)
                    .await?
            }
            Err(reason) => {
                preamble?;
                // Same report a failed exec in the child would give
                eprintln!("Failed to run child: {}", reason);
                warn!(program = %spec.program, reason = %reason, "Child could not be executed");
                (ExitOutcome::LaunchFailed, RelaySummary::default())
            }
        };

        stdout_file.flush().await.map_err(sink_error)?;
        drop(stdout_file);
        drop(stderr_file);

        console
            .write_all(END_BANNER.as_bytes())
            .await
            .map_err(sink_error)?;
        console.flush().await.map_err(sink_error)?;

        let duration_ms = self.clock.now_millis() - start_time;

        info!(
            outcome = %outcome,
            bytes_relayed = summary.bytes,
            chunks = summary.chunks,
            duration_ms = duration_ms,
            "Supervision completed"
        );

        Ok(SupervisionReport {
            outcome,
            bytes_relayed: summary.bytes,
            chunks: summary.chunks,
            read_anomaly: summary.read_anomaly,
            output_paths,
            duration_ms,
        })
    }

    /// Start banner to the console, then the launch line to console and stdout file
    async fn write_preamble(&self, console: Sink<'_>, stdout_file: &mut File) -> Result<()> {
        console
            .write_all(START_BANNER.as_bytes())
            .await
            .map_err(sink_error)?;
        console.flush().await.map_err(sink_error)?;

        let launch_line = format_launch_line(&self.clock.now_local());
        let mut sinks: [Sink<'_>; 2] = [console, stdout_file];
        write_to_sinks(&mut sinks, launch_line.as_bytes())
            .await
            .map_err(relay_error)
    }

    /// Drain the child's stdout, then collect its exit status
    ///
    /// The child is always waited for, even when a sink fails mid-relay: the
    /// read end is dropped first so a child blocked on a full pipe gets EPIPE
    /// instead of hanging the wait.
    async fn relay_and_reap(
        &self,
        process: &mut dyn RunningProcess,
        console: Sink<'_>,
        stdout_file: &mut File,
    ) -> Result<(ExitOutcome, RelaySummary)> {
        let relayed = match process.take_stdout() {
            Some(mut reader) => {
                let mut sinks: [Sink<'_>; 2] = [console, stdout_file];
                relay(&mut reader, &mut sinks).await
            }
            None => {
                warn!("Child stdout was not captured, nothing to relay");
                Ok(RelaySummary::default())
            }
        };

        let waited = process.wait().await;

        let summary = relayed.map_err(relay_error)?;
        let outcome = waited.map_err(|e| SupervisorError::Wait(e.to_string()))?;

        debug!(outcome = %outcome, "Child reaped");
        Ok((outcome, summary))
    }
}

async fn create_output(path: &Path) -> Result<File> {
    File::create(path)
        .await
        .map_err(|source| SupervisorError::OutputFileOpen {
            path: path.to_path_buf(),
            source,
        })
}

fn sink_error(err: std::io::Error) -> SupervisorError {
    SupervisorError::Sink(err.to_string())
}

fn relay_error(err: RelayError) -> SupervisorError {
    SupervisorError::Sink(err.to_string())
}

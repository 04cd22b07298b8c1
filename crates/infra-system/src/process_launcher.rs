// Process launcher implementation
// reason: tokio::process gives a managed pipe, so the parent never holds the write end
use async_trait::async_trait;
use std::io;
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use childtee_core::domain::ExitOutcome;
use childtee_core::port::process_launcher::{
    ChildStdout, LaunchError, LaunchSpec, ProcessLauncher, RunningProcess,
};

/// Launches real child processes
///
/// stdout is piped back to the supervisor; stdin and stderr are inherited
/// from the supervisor, matching a plain fork/exec where only stdout was
/// redirected.
#[derive(Debug, Default, Clone)]
pub struct TokioProcessLauncher;

impl TokioProcessLauncher {
    pub fn new() -> Self {
        Self
    }

    fn build_command(spec: &LaunchSpec) -> Command {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        if let Some(dir) = &spec.working_dir {
            command.current_dir(dir);
        }

        command
    }
}

#[async_trait]
impl ProcessLauncher for TokioProcessLauncher {
    async fn launch(&self, spec: &LaunchSpec) -> Result<Box<dyn RunningProcess>, LaunchError> {
        let child = Self::build_command(spec)
            .spawn()
            .map_err(|e| classify_spawn_error(&spec.program, e))?;

        debug!(program = %spec.program, pid = ?child.id(), "Spawned child");
        Ok(Box::new(TokioChild { child }))
    }
}

struct TokioChild {
    child: Child,
}

#[async_trait]
impl RunningProcess for TokioChild {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child
            .stdout
            .take()
            .map(|stdout| Box::new(stdout) as ChildStdout)
    }

    async fn wait(&mut self) -> io::Result<ExitOutcome> {
        let status = self.child.wait().await?;
        Ok(exit_outcome(status))
    }
}

/// Split spawn failures into "the program can't run" and "the OS is out of resources"
///
/// Exec-class errors are the ones a forked child would hit at exec time;
/// everything else (pipe, fork, descriptor exhaustion) happens before that.
fn classify_spawn_error(program: &str, err: io::Error) -> LaunchError {
    if is_exec_error(&err) {
        info!(program = %program, error = %err, "Program could not be executed");
        LaunchError::Exec(err.to_string())
    } else {
        warn!(program = %program, error = %err, "Failed to create child process");
        LaunchError::Resource(err.to_string())
    }
}

fn is_exec_error(err: &io::Error) -> bool {
    if matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
    ) {
        return true;
    }

    #[cfg(unix)]
    {
        use nix::libc;

        matches!(
            err.raw_os_error(),
            Some(libc::ENOEXEC) | Some(libc::ENOTDIR) | Some(libc::ELOOP) | Some(libc::ENAMETOOLONG)
        )
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// Convert a collected status into the domain outcome
fn exit_outcome(status: ExitStatus) -> ExitOutcome {
    if let Some(code) = status.code() {
        return ExitOutcome::Exited(code);
    }

    #[cfg(unix)]
    {
        use nix::sys::signal::Signal;
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            let name = Signal::try_from(signal)
                .map(|s| s.as_str())
                .unwrap_or("unknown");
            warn!(signal = signal, signal_name = name, "Child terminated by signal");
            return ExitOutcome::Signaled(signal);
        }
    }

    // Neither a code nor a signal: treat as a generic failure
    ExitOutcome::Exited(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn spec(program: &str, args: &[&str]) -> LaunchSpec {
        LaunchSpec {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            working_dir: None,
        }
    }

    async fn read_all(process: &mut dyn RunningProcess) -> Vec<u8> {
        let mut stdout = process.take_stdout().unwrap();
        let mut buf = Vec::new();
        stdout.read_to_end(&mut buf).await.unwrap();
        buf
    }

    #[tokio::test]
    async fn test_launch_captures_stdout() {
        let launcher = TokioProcessLauncher::new();
        let mut process = launcher.launch(&spec("echo", &["hello"])).await.unwrap();

        let output = read_all(process.as_mut()).await;
        let outcome = process.wait().await.unwrap();

        assert_eq!(output, b"hello\n");
        assert_eq!(outcome, ExitOutcome::Exited(0));
    }

    #[tokio::test]
    async fn test_take_stdout_only_once() {
        let launcher = TokioProcessLauncher::new();
        let mut process = launcher.launch(&spec("true", &[])).await.unwrap();

        assert!(process.take_stdout().is_some());
        assert!(process.take_stdout().is_none());
        process.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_exit_code_collected() {
        let launcher = TokioProcessLauncher::new();
        let mut process = launcher
            .launch(&spec("sh", &["-c", "exit 3"]))
            .await
            .unwrap();

        let _ = read_all(process.as_mut()).await;
        assert_eq!(process.wait().await.unwrap(), ExitOutcome::Exited(3));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_signal_collected() {
        let launcher = TokioProcessLauncher::new();
        let mut process = launcher
            .launch(&spec("sh", &["-c", "kill -9 $$"]))
            .await
            .unwrap();

        let _ = read_all(process.as_mut()).await;
        assert_eq!(process.wait().await.unwrap(), ExitOutcome::Signaled(9));
    }

    #[tokio::test]
    async fn test_working_dir_applied() {
        let launcher = TokioProcessLauncher::new();
        let mut launch = spec("pwd", &[]);
        launch.working_dir = Some(std::path::PathBuf::from("/"));
        let mut process = launcher.launch(&launch).await.unwrap();

        let output = read_all(process.as_mut()).await;
        process.wait().await.unwrap();

        assert_eq!(output, b"/\n");
    }

    #[tokio::test]
    async fn test_missing_program_is_exec_error() {
        let launcher = TokioProcessLauncher::new();
        let result = launcher.launch(&spec("/nonexistent/binary", &[])).await;

        assert!(matches!(result, Err(LaunchError::Exec(_))));
    }

    #[test]
    fn test_classify_spawn_errors() {
        let not_found = io::Error::from(io::ErrorKind::NotFound);
        assert!(matches!(
            classify_spawn_error("x", not_found),
            LaunchError::Exec(_)
        ));

        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert!(matches!(
            classify_spawn_error("x", denied),
            LaunchError::Exec(_)
        ));

        let exhausted = io::Error::from(io::ErrorKind::OutOfMemory);
        assert!(matches!(
            classify_spawn_error("x", exhausted),
            LaunchError::Resource(_)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_classify_enoexec_as_exec_error() {
        let err = io::Error::from_raw_os_error(nix::libc::ENOEXEC);
        assert!(matches!(
            classify_spawn_error("x", err),
            LaunchError::Exec(_)
        ));

        let err = io::Error::from_raw_os_error(nix::libc::EMFILE);
        assert!(matches!(
            classify_spawn_error("x", err),
            LaunchError::Resource(_)
        ));
    }
}

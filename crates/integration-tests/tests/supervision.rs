//! Supervision of real child processes: tee, exit status, file handling

mod common;

use childtee_core::domain::ExitOutcome;
use common::{Harness, LAUNCH_LINE};

#[tokio::test]
async fn test_console_and_file_match() {
    let harness = Harness::new();

    let (report, console) = harness
        .run(&["sh", "-c", "printf 'first\\nsecond\\n'"])
        .await;

    let expected_console = format!(
        "===== Starting child =====\n{}first\nsecond\n===== Ending child =====\n",
        LAUNCH_LINE
    );
    assert_eq!(String::from_utf8(console).unwrap(), expected_console);
    assert_eq!(harness.relayed(), b"first\nsecond\n");
    assert_eq!(report.outcome, ExitOutcome::Exited(0));
    assert_eq!(report.bytes_relayed, 13);
}

#[tokio::test]
async fn test_exit_code_collected() {
    let harness = Harness::new();

    let (report, _) = harness.run(&["sh", "-c", "printf out; exit 42"]).await;

    assert_eq!(report.outcome, ExitOutcome::Exited(42));
    assert_eq!(harness.relayed(), b"out");
}

#[tokio::test]
async fn test_signaled_child() {
    let harness = Harness::new();

    let (report, _) = harness.run(&["sh", "-c", "kill -TERM $$"]).await;

    assert_eq!(report.outcome, ExitOutcome::Signaled(15));
    assert_eq!(report.outcome.code(), 143);
}

#[tokio::test]
async fn test_program_found_via_path_search() {
    let harness = Harness::new();

    let (report, _) = harness.run(&["echo", "searched"]).await;

    assert_eq!(report.outcome, ExitOutcome::Exited(0));
    assert_eq!(harness.relayed(), b"searched\n");
}

#[tokio::test]
async fn test_stderr_file_stays_empty() {
    let harness = Harness::new();
    std::fs::write(harness.stderr_path(), "left over from a previous run").unwrap();

    let (report, _) = harness
        .run(&["sh", "-c", "echo to-stderr >&2; echo to-stdout"])
        .await;

    assert_eq!(report.outcome, ExitOutcome::Exited(0));
    assert_eq!(harness.relayed(), b"to-stdout\n");
    assert_eq!(std::fs::metadata(harness.stderr_path()).unwrap().len(), 0);
}

#[tokio::test]
async fn test_nonexistent_binary() {
    let harness = Harness::new();

    let (report, console) = harness.run(&["/nonexistent/binary"]).await;

    assert_eq!(report.outcome, ExitOutcome::LaunchFailed);
    assert_eq!(report.outcome.code(), 1);
    assert_eq!(harness.stdout_file(), LAUNCH_LINE.as_bytes());

    let expected_console = format!(
        "===== Starting child =====\n{}===== Ending child =====\n",
        LAUNCH_LINE
    );
    assert_eq!(String::from_utf8(console).unwrap(), expected_console);
}

#[cfg(unix)]
#[tokio::test]
async fn test_non_executable_file() {
    use std::os::unix::fs::PermissionsExt;

    let harness = Harness::new();
    let script = harness.dir.path().join("not-executable.sh");
    std::fs::write(&script, "#!/bin/sh\necho never\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o644)).unwrap();

    let (report, _) = harness.run(&[script.to_str().unwrap()]).await;

    assert_eq!(report.outcome, ExitOutcome::LaunchFailed);
    assert_eq!(harness.stdout_file(), LAUNCH_LINE.as_bytes());
}

#[tokio::test]
async fn test_script_in_working_dir() {
    let harness = Harness::new();
    let workdir = harness.dir.path().join("work");
    std::fs::create_dir(&workdir).unwrap();
    std::fs::write(workdir.join("note.txt"), "from the work dir\n").unwrap();

    let request = harness
        .request(&["cat", "note.txt"])
        .with_working_dir(&workdir);
    let (report, _) = harness.run_request(&request).await;

    assert_eq!(report.outcome, ExitOutcome::Exited(0));
    assert_eq!(harness.relayed(), b"from the work dir\n");
}

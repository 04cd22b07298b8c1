// Shared fixtures: real launcher, frozen clock, temp output files
#![allow(dead_code)]

use chrono::{Local, TimeZone};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use childtee_core::application::Supervisor;
use childtee_core::domain::{SupervisionReport, SupervisionRequest};
use childtee_core::port::clock::mocks::FixedClock;
use childtee_infra_system::TokioProcessLauncher;

pub const LAUNCH_LINE: &str = "[2025-06-15 08:30:00] Running subcommand\n";

pub struct Harness {
    pub dir: TempDir,
    supervisor: Supervisor,
}

impl Harness {
    pub fn new() -> Self {
        let clock = FixedClock(Local.with_ymd_and_hms(2025, 6, 15, 8, 30, 0).unwrap());
        Self {
            dir: TempDir::new().unwrap(),
            supervisor: Supervisor::new(Arc::new(TokioProcessLauncher::new()), Arc::new(clock)),
        }
    }

    pub fn stdout_path(&self) -> PathBuf {
        self.dir.path().join("stdout.txt")
    }

    pub fn stderr_path(&self) -> PathBuf {
        self.dir.path().join("stderr.txt")
    }

    pub fn request(&self, command: &[&str]) -> SupervisionRequest {
        SupervisionRequest::new(command.iter().copied())
            .unwrap()
            .with_stdout_path(self.stdout_path().to_string_lossy())
            .with_stderr_path(self.stderr_path().to_string_lossy())
    }

    /// Run `command`, returning the report and everything written to the console
    pub async fn run(&self, command: &[&str]) -> (SupervisionReport, Vec<u8>) {
        self.run_request(&self.request(command)).await
    }

    pub async fn run_request(&self, request: &SupervisionRequest) -> (SupervisionReport, Vec<u8>) {
        let mut console = Vec::new();
        let report = self
            .supervisor
            .supervise_with_console(request, &mut console)
            .await
            .unwrap();
        (report, console)
    }

    pub fn stdout_file(&self) -> Vec<u8> {
        std::fs::read(self.stdout_path()).unwrap()
    }

    /// Captured stdout file with the launch line checked and removed
    pub fn relayed(&self) -> Vec<u8> {
        let file = self.stdout_file();
        assert!(
            file.starts_with(LAUNCH_LINE.as_bytes()),
            "stdout file does not start with the launch line: {:?}",
            String::from_utf8_lossy(&file)
        );
        file[LAUNCH_LINE.len()..].to_vec()
    }
}

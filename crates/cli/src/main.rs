//! childtee - run a command, tee its stdout to the console and a file, wait for it
//!
//! Exit code mirrors the child: its own code, 128 + signal when killed, and 1
//! when the program could not be executed or supervision itself failed.

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::sync::Arc;
use tracing::debug;

use childtee_core::application::Supervisor;
use childtee_core::domain::{SupervisionReport, SupervisionRequest};
use childtee_core::port::SystemClock;
use childtee_infra_system::TokioProcessLauncher;

#[derive(Parser)]
#[command(name = "childtee")]
#[command(about = "Run a command and tee its stdout to the console and a file", long_about = None)]
#[command(version)]
struct Cli {
    /// File receiving a copy of the child's stdout [default: stdout.txt]
    #[arg(long, env = "CHILDTEE_STDOUT_FILE")]
    stdout_file: Option<String>,

    /// File reserved for the child's stderr; created empty, nothing is captured into it [default: stderr.txt]
    #[arg(long, env = "CHILDTEE_STDERR_FILE")]
    stderr_file: Option<String>,

    /// Directory to run the child in
    #[arg(short = 'C', long)]
    working_dir: Option<String>,

    /// Build the request from a JSON payload instead of COMMAND
    /// (e.g. '{"command": ["./test.sh"], "stdout_file": "out.txt"}')
    #[arg(long, conflicts_with = "command")]
    payload: Option<String>,

    /// Print a summary to stderr once the child has exited
    #[arg(long, value_enum)]
    report: Option<ReportFormat>,

    /// Program to run, followed by its arguments
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required_unless_present = "payload"
    )]
    command: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

fn expand(path: &str) -> String {
    shellexpand::tilde(path).into_owned()
}

/// Build the request; explicit flags (and their env vars) win over payload fields
fn build_request(cli: &Cli) -> Result<SupervisionRequest> {
    let mut request = match &cli.payload {
        Some(raw) => {
            let payload: serde_json::Value =
                serde_json::from_str(raw).context("Failed to parse --payload as JSON")?;
            SupervisionRequest::from_payload(&payload)?
        }
        None => SupervisionRequest::new(cli.command.iter().cloned())?,
    };

    if let Some(path) = &cli.stdout_file {
        request.stdout_path = Some(path.clone());
    }
    if let Some(path) = &cli.stderr_file {
        request.stderr_path = Some(path.clone());
    }
    if let Some(dir) = &cli.working_dir {
        request.working_dir = Some(dir.into());
    }

    // Expansion runs after the merge so payload fields get it too
    request.stdout_path = request.stdout_path.as_deref().map(expand);
    request.stderr_path = request.stderr_path.as_deref().map(expand);
    request.working_dir = request
        .working_dir
        .map(|dir| match dir.to_str() {
            Some(text) => expand(text).into(),
            None => dir,
        });

    Ok(request)
}

fn print_report(report: &SupervisionReport, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Json => {
            eprintln!("{}", serde_json::to_string_pretty(report)?);
        }
        ReportFormat::Text => {
            let outcome = report.outcome.to_string();
            let outcome = if report.outcome.success() {
                outcome.green()
            } else {
                outcome.red()
            };
            eprintln!("{} child {}", "childtee:".bold(), outcome);
            eprintln!(
                "  relayed {} bytes in {} chunks to {}",
                report.bytes_relayed,
                report.chunks,
                report.output_paths.stdout.display()
            );
            if let Some(anomaly) = &report.read_anomaly {
                eprintln!("  {} relay ended on read error: {}", "warning:".yellow(), anomaly);
            }
            eprintln!("  took {} ms", report.duration_ms);
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<i32> {
    let request = build_request(&cli)?;
    debug!(request = ?request, "Supervision request built");

    // DI wiring
    let supervisor = Supervisor::new(Arc::new(TokioProcessLauncher::new()), Arc::new(SystemClock));
    let report = supervisor.supervise(&request).await?;

    if let Some(format) = cli.report {
        print_report(&report, format)?;
    }

    Ok(report.outcome.code())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            1
        }
    };

    std::process::exit(code);
}

// childtee Infrastructure - System Adapters
// Implements: ProcessLauncher

pub mod process_launcher;

pub use process_launcher::TokioProcessLauncher;

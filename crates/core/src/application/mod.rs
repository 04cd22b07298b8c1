// Application Layer - Supervision use case

pub mod relay;
pub mod supervisor;

// Re-exports
pub use relay::{relay, RelayError, RelaySummary};
pub use supervisor::Supervisor;

// childtee Core - Domain Logic & Ports
// NO process or terminal dependencies: adapters live in childtee-infra-system

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{Result, SupervisorError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

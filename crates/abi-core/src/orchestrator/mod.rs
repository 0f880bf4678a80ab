//! Orchestrator - Tool-calling loop
//!
//! One user turn runs as a bounded cycle:
//! `AwaitingModel -> {Dispatching -> AwaitingModel}* -> Done | Error`.
//!
//! # Module Structure
//!
//! - `types`: turn outcome and status
//! - `config`: loop limits and timeouts
//! - `core`: the `Agent` struct
//! - `process`: `submit`, the loop itself

mod config;
mod core;
mod process;
mod types;


pub use config::OrchestratorConfig;
pub use core::Agent;
pub use types::{TurnOutcome, TurnStatus};

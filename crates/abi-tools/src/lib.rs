//! ABI Tools - Tool Registry and Execution Engine
//!
//! This crate provides the tool system of the ABI agent:
//! - Registry: Role-tagged tool registration and discovery
//! - Runner: Validated, time-bounded tool invocation
//! - Builtins: Customer and business data-query tools

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builtins;
pub mod error;
pub mod registry;
pub mod runner;

pub use builtins::{register_builtins, BuiltinsConfig};
pub use error::{Error, Result};
pub use registry::{
    Caller, ParamType, ParameterSpec, Role, Tool, ToolCallRequest, ToolCallResult, ToolRegistry,
    ToolSpec,
};
pub use runner::{RunnerConfig, ToolRunner};

//! Application wiring
//!
//! - `config`: typed configuration sections
//! - `loader`: layered configuration loading
//! - `init`: data store, tool registry, provider and agent construction

mod config;
mod init;
mod loader;

pub use config::AppConfig;
pub use init::{build_registry, build_runtime, load_data, Runtime};
pub use loader::load_config;

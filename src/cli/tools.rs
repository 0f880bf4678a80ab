//! Tools command - per-role tool listing

use crate::app::{build_registry, load_data, AppConfig};
use abi_tools::{BuiltinsConfig, Role};
use anyhow::Result;
use std::sync::Arc;

/// List the tools a role can see, with their parameters
pub fn run(role: Role, config: &AppConfig) -> Result<()> {
    let data = Arc::new(load_data(config)?);
    let builtins = BuiltinsConfig {
        reference_date: config.data.reference_date,
    };
    let registry = build_registry(data, builtins)?;
    let specs = registry.visible_tools(role);

    println!("Tools visible to {role} ({}):", specs.len());
    for spec in specs {
        println!("\n  {}", spec.name);
        println!("    {}", spec.description);
        for param in &spec.parameters {
            let flag = if param.required { "required" } else { "optional" };
            println!(
                "    - {} ({}, {flag}): {}",
                param.name,
                param.param_type.as_str(),
                param.description
            );
        }
    }
    Ok(())
}

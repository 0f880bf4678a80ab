//! CLI module for ABI
//!
//! Provides commands:
//! - `chat`: Interactive session as a customer or business user
//! - `audit`: Revenue anomaly and critical delay status board
//! - `tools`: Tools visible to a role
//! - `schema`: Data schema description

use crate::app::AppConfig;
use abi_tools::Role;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod audit;
pub mod chat;
pub mod schema;
pub mod tools;

/// ABI business intelligence agent CLI
#[derive(Parser, Debug)]
#[command(name = "abi")]
#[command(about = "Autonomous business intelligence over order and revenue data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding customers.csv, products.csv, orders.csv and revenue.csv
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Evaluate delivery delays as of this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub reference_date: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive session
    Chat(ChatArgs),
    /// Run the revenue anomaly and critical delay checks
    Audit,
    /// List the tools visible to a role
    Tools {
        /// Role to list tools for
        #[arg(long, value_parser = parse_role)]
        role: Role,
    },
    /// Print the data schema
    Schema,
}

/// Arguments of `abi chat`
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Role to sign in as (customer or business)
    #[arg(long, value_parser = parse_role)]
    pub role: Role,

    /// Customer id, required for the customer role
    #[arg(long, required_if_eq("role", "customer"))]
    pub customer_id: Option<String>,

    /// Display name
    #[arg(long, default_value = "user")]
    pub user: String,
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse()
}

/// Run the CLI command
pub async fn run(cli: Cli, mut config: AppConfig) -> anyhow::Result<()> {
    if let Some(dir) = cli.data_dir {
        config.data.directory = dir;
    }
    if let Some(date) = cli.reference_date {
        config.data.reference_date = Some(date);
    }

    match cli.command {
        Some(Commands::Chat(args)) => chat::run(args, &config).await,
        Some(Commands::Audit) => audit::run(&config),
        Some(Commands::Tools { role }) => tools::run(role, &config),
        Some(Commands::Schema) => {
            schema::run();
            Ok(())
        }
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

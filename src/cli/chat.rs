//! Chat command - interactive agent session

use super::ChatArgs;
use crate::app::{build_runtime, AppConfig, Runtime};
use abi_core::{format_error_for_cli, Session, TurnOutcome};
use abi_data::normalize_id;
use abi_tools::Role;
use anyhow::{bail, Result};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const PROMPT: &str = "you> ";

/// Run an interactive session until `/quit` or end of input
pub async fn run(args: ChatArgs, config: &AppConfig) -> Result<()> {
    let runtime = build_runtime(config)?;
    let mut session = login(&args, &runtime)?;

    println!(
        "Signed in as {} ({}). Type /trace for the last trace, /quit to leave.",
        session.username(),
        session.role()
    );
    if let Some(customer_id) = session.customer_id() {
        let summary = runtime
            .data
            .delivery_summary(customer_id, runtime.builtins.today());
        println!("\n{}", summary.message());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n{PROMPT}");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/trace" => {
                println!("{}", session.trace().to_json()?);
                continue;
            }
            _ => {}
        }

        match runtime.agent.submit(&mut session, line).await {
            Ok(outcome) => print_outcome(&outcome),
            Err(e) => println!("{}", format_error_for_cli(&e)),
        }
    }

    session.end();
    println!("Signed out.");
    Ok(())
}

fn login(args: &ChatArgs, runtime: &Runtime) -> Result<Session> {
    match args.role {
        Role::Business => Ok(Session::business(&args.user)),
        Role::Customer => {
            let Some(raw) = args.customer_id.as_deref() else {
                bail!("--customer-id is required for the customer role");
            };
            let customer_id = normalize_id(raw);
            if runtime.data.customer(&customer_id).is_none() {
                bail!("unknown customer id: {customer_id}");
            }
            Ok(Session::customer(&args.user, &customer_id))
        }
    }
}

fn print_outcome(outcome: &TurnOutcome) {
    println!("\nabi> {}", outcome.response);

    let timeline = outcome.trace.timeline();
    if timeline.is_empty() {
        return;
    }
    println!(
        "\n--- reasoning trace ({}, {} cycle(s)) ---",
        outcome.status, outcome.iterations
    );
    for entry in timeline {
        println!("  {entry}");
    }
}

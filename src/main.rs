//! Fieldcheck CLI - Composable Field Validation
//!
//! A demonstration CLI for the fieldcheck library.

use anyhow::{Context, Result};
use fieldcheck::prelude::*;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("fieldcheck");

    if args.len() < 2 {
        print_usage(program);
        return ExitCode::SUCCESS;
    }

    let result = match args[1].as_str() {
        "list" => list_rules(),
        "check" => {
            if args.len() < 4 {
                eprintln!("Error: Please specify a chain file and a value");
                eprintln!("Usage: {} check <chain.toml> <value>", program);
                return ExitCode::from(2);
            }
            check_value(&args[2], &args[3])
        }
        "help" | "--help" | "-h" => {
            print_usage(program);
            Ok(true)
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage(program);
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn print_usage(program: &str) {
    println!("Fieldcheck v{}", fieldcheck::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list                      List the built-in rules");
    println!("  check <chain.toml> <val>  Validate a value against a chain file");
    println!("  help                      Show this help message");
    println!();
    println!("Chain file format:");
    println!("  only_on_completed = false");
    println!();
    println!("  [[rule]]");
    println!("  type = \"MIN_LENGTH\"");
    println!("  params = [3]");
}

fn list_rules() -> Result<bool> {
    let catalog = Catalog::with_builtins()?;

    println!("Available rules ({} total):", catalog.len());
    println!();
    for (type_name, entry) in catalog.entries() {
        let params = if entry.validator.is_initable() { " (params)" } else { "" };
        println!("  {:<12}{} - {}", type_name, params, entry.description);
    }
    Ok(true)
}

/// Run the chain in `chain_path` against `raw`. Returns whether it accepted.
fn check_value(chain_path: &str, raw: &str) -> Result<bool> {
    let catalog = Catalog::with_builtins()?;
    let chain = ChainConfig::from_file(chain_path)?;
    let composition = catalog
        .compose_config(&chain)
        .with_context(|| format!("Failed to build chain from {}", chain_path))?;

    let value = Value::parse_input(raw);
    log::info!("checking {} value against {} rule(s)", value.kind(), composition.len());

    let run = composition.validate(value, chain.options(), |snapshot: &[Validation], done: bool| {
        match serde_json::to_string(snapshot) {
            Ok(json) => println!("{} done={}", json, done),
            Err(e) => log::warn!("could not serialize snapshot: {}", e),
        }
    })?;
    let last = pollster::block_on(run);

    match classify(&last) {
        Some(Outcome::Accepted) => {
            println!("accepted");
            Ok(true)
        }
        outcome => {
            let label = outcome.map_or("incomplete", |o| o.as_str());
            let detail = pick_rejected(&last)
                .map(|v| match &v.runtime_error {
                    Some(err) => format!("{} ({})", v.type_name, err),
                    None => v.type_name.clone(),
                })
                .unwrap_or_default();
            println!("{}: {}", label, detail);
            Ok(false)
        }
    }
}

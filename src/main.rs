//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `dnscheck` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Printing of rendered results
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use dnscheck::config::Command;
use dnscheck::initialization::init_logger_with;
use dnscheck::{run_check, run_resolvers, run_show, Config};

async fn dispatch(config: &Config) -> Result<()> {
    match &config.command {
        Command::Check(args) => {
            let outcome = run_check(config, args).await?;
            println!("{}", outcome.render(args.format)?);
            if let Some(key) = &outcome.key {
                eprintln!("Results saved as {} in {}", key, config.db_path.display());
            }
        }
        Command::Show(args) => {
            let outcome = run_show(config, args).await?;
            println!("{}", outcome.render(args.format)?);
        }
        Command::Resolvers(args) => print!("{}", run_resolvers(args)),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting MAXMIND_LICENSE_KEY in .env without exporting it manually
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let result = match config.validate() {
        Ok(()) => dispatch(&config).await,
        Err(e) => Err(anyhow::anyhow!("Configuration validation failed: {}", e)),
    };

    if let Err(e) = result {
        eprintln!("dnscheck error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

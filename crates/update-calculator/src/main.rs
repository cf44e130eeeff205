// SPDX-License-Identifier: MIT OR Apache-2.0

mod config;

use std::{cmp::Ordering, path::PathBuf};

use clap::{Parser, Subcommand};
use libupdate_calculator::{
    Error, UpdateCalculator, UpdateResult, compare_version_strings, summarize,
};

use crate::config::{CliConfig, Overrides};

mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const PARTIAL_FAILURE: i32 = 1;
    pub const FATAL_ERROR: i32 = 2;
}

#[derive(Parser)]
#[command(name = "update-calculator")]
#[command(about = "compute available rpm package updates for a fleet of hosts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// read configuration from this file instead of the user config dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// root of the mirrored repositories
    #[arg(long, global = true)]
    mirror_dir: Option<PathBuf>,

    /// root of the host manifests
    #[arg(long, global = true)]
    manifests_dir: Option<PathBuf>,

    /// worker threads for batch runs (default: all cpus)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// compute updates for a single host
    Host {
        /// host id as found under processed/
        host_id: String,
    },
    /// compute updates for every host
    All {
        /// print only the fleet summary
        #[arg(long)]
        summary: bool,
    },
    /// print the fleet summary
    Summary,
    /// compare two version strings (-1, 0 or 1)
    EvrCompare { a: String, b: String },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::EvrCompare { a, b } = &cli.command {
        println!("{}", ordering_value(compare_version_strings(a, b)));
        std::process::exit(exit_codes::SUCCESS);
    }

    let overrides = Overrides {
        mirror_dir: cli.mirror_dir.clone(),
        manifests_dir: cli.manifests_dir.clone(),
        threads: cli.threads,
    };
    let config = match CliConfig::load(cli.config.as_deref(), overrides) {
        Ok(c) => c,
        Err(e) => {
            output_error(&format!("failed to load config: {e}"));
            std::process::exit(exit_codes::FATAL_ERROR);
        }
    };

    let calculator = UpdateCalculator::new(config.inner);

    let result = match &cli.command {
        Commands::Host { host_id } => cmd_host(&calculator, host_id),
        Commands::All { summary } => cmd_all(&calculator, *summary),
        Commands::Summary => cmd_all(&calculator, true),
        Commands::EvrCompare { .. } => Ok(exit_codes::SUCCESS),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output_error(&e.to_string());
            std::process::exit(exit_codes::FATAL_ERROR);
        }
    }
}

fn output_error(msg: &str) {
    eprintln!("error: {msg}");
}

fn ordering_value(ord: Ordering) -> i8 {
    match ord {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

fn exit_code(results: &[UpdateResult]) -> i32 {
    if results.iter().any(UpdateResult::has_errors) {
        exit_codes::PARTIAL_FAILURE
    } else {
        exit_codes::SUCCESS
    }
}

fn cmd_host(calculator: &UpdateCalculator, host_id: &str) -> Result<i32, Error> {
    let result = calculator.compute_for_host(host_id);
    println!("{}", result.to_json()?);

    for error in &result.errors {
        log::warn!("{host_id}: {error}");
    }

    Ok(exit_code(std::slice::from_ref(&result)))
}

fn cmd_all(calculator: &UpdateCalculator, summary_only: bool) -> Result<i32, Error> {
    let results = calculator.compute_all_parallel()?;

    log::info!(
        "computed {} host(s), {} package cache(s) loaded",
        results.len(),
        calculator.repository().len()
    );

    if summary_only {
        println!("{}", summarize(&results).to_json()?);
    } else {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    Ok(exit_code(&results))
}

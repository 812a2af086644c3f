#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for lifer-chaser.
//!
//! `rank` finds the observation locations whose surroundings recently
//! produced the most species missing from a life list; `county` reads a
//! frequency table instead. Without a subcommand an interactive menu
//! asks for the same inputs.
//!
//! Uses `indicatif-log-bridge` (via [`lifer_chaser_cli_utils::init_logger`])
//! so log lines and progress bars share the terminal.

mod commands;
mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{CountyOptions, OutputFormat, RankOptions};

#[derive(Parser)]
#[command(name = "lifer_chaser", about = "Find where to look for birds you have never seen")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank observation locations by the lifers reported around them
    Rank {
        /// Observation export (CSV, optionally gzipped)
        observations: PathBuf,
        /// Life list (CSV or one species per line)
        #[arg(long)]
        life_list: PathBuf,
        /// TOML run config; flags below override its values
        #[arg(long)]
        config: Option<PathBuf>,
        /// Reference month (1-12)
        #[arg(long)]
        month: Option<u32>,
        /// Reference day of the month
        #[arg(long)]
        day: Option<u32>,
        /// Days of tolerance around the reference date (default 4)
        #[arg(long)]
        interval: Option<i64>,
        /// Neighborhood radius in miles (default 5)
        #[arg(long)]
        radius: Option<f64>,
        /// Number of centers to report (default 10)
        #[arg(long)]
        top: Option<usize>,
        /// Scoring policy: `checklist_count` or `total_species`
        #[arg(long)]
        policy: Option<String>,
        /// Neighborhood index: `rtree` or `brute_force`
        #[arg(long)]
        index: Option<String>,
        /// Maximum candidate species listed per center
        #[arg(long)]
        max_candidates: Option<usize>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List likely lifers from a county frequency table
    County {
        /// Frequency table (CSV, optionally gzipped)
        frequencies: PathBuf,
        /// Life list (CSV or one species per line)
        #[arg(long)]
        life_list: PathBuf,
        /// Comma-separated weeks (e.g. "May-1,May-2") or month names
        #[arg(long)]
        weeks: String,
        /// Minimum average frequency, 0-1
        #[arg(long, default_value = "0")]
        threshold: f64,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = lifer_chaser_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&multi);
    };

    match command {
        Commands::Rank {
            observations,
            life_list,
            config,
            month,
            day,
            interval,
            radius,
            top,
            policy,
            index,
            max_candidates,
            format,
        } => commands::rank(
            &multi,
            &RankOptions {
                observations,
                life_list,
                config,
                month,
                day,
                interval,
                radius,
                top,
                policy,
                index,
                max_candidates,
                format,
            },
        )?,
        Commands::County {
            frequencies,
            life_list,
            weeks,
            threshold,
            format,
        } => commands::county(&CountyOptions {
            frequencies,
            life_list,
            weeks,
            threshold,
            format,
        })?,
    }

    Ok(())
}

//! Menu-driven front end using `dialoguer`, for running without
//! memorizing flags.

use std::path::PathBuf;

use dialoguer::{Input, Select};
use lifer_chaser_cli_utils::MultiProgress;

use crate::commands::{self, CountyOptions, OutputFormat, RankOptions};

/// Top-level actions in the interactive menu.
enum Action {
    RankCenters,
    CountyLifers,
}

impl Action {
    const ALL: &[Self] = &[Self::RankCenters, Self::CountyLifers];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::RankCenters => "Rank locations from an observation export",
            Self::CountyLifers => "List likely lifers from a county frequency table",
        }
    }
}

const POLICIES: &[&str] = &["checklist_count", "total_species"];
const INDEXES: &[&str] = &["rtree", "brute_force"];
const FORMATS: &[OutputFormat] = &[OutputFormat::Table, OutputFormat::Json];

/// Prompts for an action and its inputs, then runs it.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected command fails.
pub fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("Lifer Chaser");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::RankCenters => rank(multi),
        Action::CountyLifers => county(),
    }
}

fn rank(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let observations = prompt_path("Observation export")?;
    let life_list = prompt_path("Life list")?;

    let month: u32 = Input::new()
        .with_prompt("Reference month (1-12)")
        .validate_with(|m: &u32| {
            if (1..=12).contains(m) {
                Ok(())
            } else {
                Err("month must be 1-12")
            }
        })
        .interact_text()?;
    let day: u32 = Input::new()
        .with_prompt("Reference day")
        .validate_with(|d: &u32| {
            if (1..=31).contains(d) {
                Ok(())
            } else {
                Err("day must be 1-31")
            }
        })
        .interact_text()?;
    let interval: i64 = Input::new()
        .with_prompt("Days of tolerance")
        .default(lifer_chaser_analytics::config::DEFAULT_INTERVAL_DAYS)
        .interact_text()?;
    let radius: f64 = Input::new()
        .with_prompt("Radius (miles)")
        .default(lifer_chaser_analytics::config::DEFAULT_RADIUS_MILES)
        .interact_text()?;
    let top: usize = Input::new()
        .with_prompt("Centers to report")
        .default(lifer_chaser_analytics::config::DEFAULT_TOP_N)
        .interact_text()?;

    let policy = Select::new()
        .with_prompt("Scoring policy")
        .items(POLICIES)
        .default(0)
        .interact()?;
    let index = Select::new()
        .with_prompt("Neighborhood index")
        .items(INDEXES)
        .default(0)
        .interact()?;

    commands::rank(
        multi,
        &RankOptions {
            observations,
            life_list,
            month: Some(month),
            day: Some(day),
            interval: Some(interval),
            radius: Some(radius),
            top: Some(top),
            policy: Some(POLICIES[policy].to_string()),
            index: Some(INDEXES[index].to_string()),
            format: prompt_format()?,
            ..RankOptions::default()
        },
    )
}

fn county() -> Result<(), Box<dyn std::error::Error>> {
    let frequencies = prompt_path("Frequency table")?;
    let life_list = prompt_path("Life list")?;
    let weeks: String = Input::new()
        .with_prompt("Weeks (e.g. May-1,May-2 or May)")
        .validate_with(|weeks: &String| {
            commands::parse_weeks(weeks)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;
    let threshold: f64 = Input::new()
        .with_prompt("Minimum frequency (0-1)")
        .default(0.0)
        .validate_with(|t: &f64| {
            if (0.0..=1.0).contains(t) {
                Ok(())
            } else {
                Err("threshold must be within 0-1")
            }
        })
        .interact_text()?;

    commands::county(&CountyOptions {
        frequencies,
        life_list,
        weeks,
        threshold,
        format: prompt_format()?,
    })
}

fn prompt_path(prompt: &str) -> Result<PathBuf, dialoguer::Error> {
    let path: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|path: &String| {
            if std::path::Path::new(path.trim()).is_file() {
                Ok(())
            } else {
                Err("no such file")
            }
        })
        .interact_text()?;
    Ok(PathBuf::from(path.trim()))
}

fn prompt_format() -> Result<OutputFormat, dialoguer::Error> {
    let idx = Select::new()
        .with_prompt("Output format")
        .items(&["table", "json"])
        .default(0)
        .interact()?;
    Ok(FORMATS[idx])
}

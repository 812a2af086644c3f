//! The `rank` and `county` commands, shared by the flag-driven and
//! interactive front ends.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Month;
use lifer_chaser_analytics::config::{parse_index, parse_policy};
use lifer_chaser_analytics::{RunConfig, analyze_county, rank_centers};
use lifer_chaser_analytics_models::{RankingReport, SpeciesFrequency};
use lifer_chaser_cli_utils::{IndicatifProgress, MultiProgress};
use lifer_chaser_ingest::{load_frequency_table, load_life_list, load_observations, open_input};
use lifer_chaser_season::{MonthWeek, SeasonError};
use lifer_chaser_taxonomy::SpeciesRules;

/// Candidate species shown per row in table output.
const TABLE_CANDIDATES: usize = 5;

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text columns.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
}

/// Inputs for a ranking run. `None` fields fall back to the config file,
/// then to the built-in defaults.
#[derive(Debug, Default)]
pub struct RankOptions {
    pub observations: PathBuf,
    pub life_list: PathBuf,
    pub config: Option<PathBuf>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub interval: Option<i64>,
    pub radius: Option<f64>,
    pub top: Option<usize>,
    pub policy: Option<String>,
    pub index: Option<String>,
    pub max_candidates: Option<usize>,
    pub format: OutputFormat,
}

/// Inputs for a county frequency search.
#[derive(Debug)]
pub struct CountyOptions {
    pub frequencies: PathBuf,
    pub life_list: PathBuf,
    pub weeks: String,
    pub threshold: f64,
    pub format: OutputFormat,
}

/// Builds the run config: the TOML file if given, then flag overrides.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed, if no
/// reference date is available, or if a policy or index name is unknown.
pub fn resolve_config(options: &RankOptions) -> Result<RunConfig, Box<dyn std::error::Error>> {
    let mut config = if let Some(path) = &options.config {
        log::info!("Loading config from {}", path.display());
        RunConfig::from_toml_str(&std::fs::read_to_string(path)?)?
    } else {
        let (Some(month), Some(day)) = (options.month, options.day) else {
            return Err("--month and --day are required when no --config is given".into());
        };
        RunConfig::new(month, day)
    };

    if let Some(month) = options.month {
        config.reference_month = month;
    }
    if let Some(day) = options.day {
        config.reference_day = day;
    }
    if let Some(interval) = options.interval {
        config.interval_days = interval;
    }
    if let Some(radius) = options.radius {
        config.radius_miles = radius;
    }
    if let Some(top) = options.top {
        config.top_n = top;
    }
    if let Some(policy) = &options.policy {
        config.policy = parse_policy(policy)?;
    }
    if let Some(index) = &options.index {
        config.index = parse_index(index)?;
    }
    if options.max_candidates.is_some() {
        config.max_candidates = options.max_candidates;
    }

    config.validate()?;
    Ok(config)
}

/// Loads the inputs, ranks centers, and prints the result.
///
/// # Errors
///
/// Returns an error if the config is invalid or an input file cannot be
/// loaded.
pub fn rank(multi: &MultiProgress, options: &RankOptions) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let config = resolve_config(options)?;

    let loaded = load_observations(open_input(&options.observations)?)?;
    if !loaded.skipped.is_empty() {
        log::warn!(
            "Skipped {} of {} rows in {}",
            loaded.skipped.len(),
            loaded.rows_read(),
            options.observations.display()
        );
    }
    let life_list = load_life_list(open_input(&options.life_list)?)?;

    let progress = IndicatifProgress::centers_bar(multi, "Building neighborhoods");
    let report = rank_centers(loaded.observations, &life_list, &config, &progress)?;

    match options.format {
        OutputFormat::Table => print_ranking(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    log::info!("Done in {:.2?}", start.elapsed());
    Ok(())
}

/// Loads a frequency table and prints the likeliest lifers for the given
/// weeks.
///
/// # Errors
///
/// Returns an error if the weeks or threshold are invalid or an input file
/// cannot be loaded.
pub fn county(options: &CountyOptions) -> Result<(), Box<dyn std::error::Error>> {
    let weeks = parse_weeks(&options.weeks)?;
    let rows = load_frequency_table(open_input(&options.frequencies)?)?;
    let life_list = load_life_list(open_input(&options.life_list)?)?;

    let results = analyze_county(
        rows,
        &life_list,
        &weeks,
        options.threshold,
        &SpeciesRules::default(),
    )?;

    match options.format {
        OutputFormat::Table => print_frequencies(&results),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
    }

    Ok(())
}

/// Parses a comma-separated list of week labels. A bare month name expands
/// to all four of its weeks.
///
/// # Errors
///
/// Returns [`SeasonError::InvalidWeek`] for an unrecognized label.
pub fn parse_weeks(value: &str) -> Result<Vec<MonthWeek>, SeasonError> {
    let mut weeks = Vec::new();
    for label in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if let Ok(month) = label.parse::<Month>() {
            weeks.extend(MonthWeek::all_in(month));
        } else {
            weeks.push(label.parse::<MonthWeek>()?);
        }
    }
    if weeks.is_empty() {
        return Err(SeasonError::InvalidWeek {
            label: value.to_string(),
        });
    }
    weeks.dedup();
    Ok(weeks)
}

fn print_ranking(report: &RankingReport) {
    if let Some(reason) = report.empty_reason() {
        println!("No centers to report: {reason}.");
        return;
    }

    println!(
        "Top {} centers by {} within {} mi",
        report.centers.len(),
        report.policy,
        report.radius_miles
    );
    println!();
    println!(
        "{:>4}  {:>10}  {:>11}  {:>6}  TOP CANDIDATES",
        "RANK", "LAT", "LNG", "SCORE"
    );
    println!("{}", "-".repeat(80));
    for center in &report.centers {
        println!(
            "{:>4}  {:>10.5}  {:>11.5}  {:>6}  {}",
            center.rank,
            center.center.latitude,
            center.center.longitude,
            center.score,
            candidate_summary(&center.candidates)
        );
    }
}

fn candidate_summary(candidates: &[String]) -> String {
    let mut summary = candidates
        .iter()
        .take(TABLE_CANDIDATES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if candidates.len() > TABLE_CANDIDATES {
        summary.push_str(&format!(" (+{} more)", candidates.len() - TABLE_CANDIDATES));
    }
    summary
}

fn print_frequencies(results: &[SpeciesFrequency]) {
    if results.is_empty() {
        println!("No lifers reach the threshold in those weeks.");
        return;
    }

    println!("{:<40} FREQUENCY", "SPECIES");
    println!("{}", "-".repeat(50));
    for result in results {
        println!("{:<40} {:>8.1}%", result.species, result.frequency * 100.0);
    }
}

#[cfg(test)]
mod tests {
    use lifer_chaser_observation_models::ScoringPolicy;

    use super::*;

    #[test]
    fn month_names_expand_to_all_weeks() {
        let weeks = parse_weeks("May, June-2").unwrap();
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0], MonthWeek::new(Month::May, 1).unwrap());
        assert_eq!(weeks[4], MonthWeek::new(Month::June, 2).unwrap());
    }

    #[test]
    fn bad_week_labels_are_rejected() {
        assert!(parse_weeks("May-5").is_err());
        assert!(parse_weeks("Smarch").is_err());
        assert!(parse_weeks(" , ").is_err());
    }

    #[test]
    fn flags_without_config_need_a_date() {
        let options = RankOptions {
            month: Some(5),
            ..RankOptions::default()
        };
        assert!(resolve_config(&options).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let options = RankOptions {
            month: Some(5),
            day: Some(15),
            radius: Some(2.5),
            policy: Some("total_species".to_string()),
            max_candidates: Some(3),
            ..RankOptions::default()
        };
        let config = resolve_config(&options).unwrap();
        assert_eq!(config.reference_month, 5);
        assert_eq!(config.reference_day, 15);
        assert!((config.radius_miles - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.policy, ScoringPolicy::TotalSpecies);
        assert_eq!(config.max_candidates, Some(3));
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let options = RankOptions {
            month: Some(5),
            day: Some(15),
            index: Some("quadtree".to_string()),
            ..RankOptions::default()
        };
        assert!(resolve_config(&options).is_err());

        let options = RankOptions {
            month: Some(13),
            day: Some(1),
            ..RankOptions::default()
        };
        assert!(resolve_config(&options).is_err());
    }

    #[test]
    fn long_candidate_lists_are_abbreviated() {
        let candidates: Vec<String> = (1..=7).map(|i| format!("Species {i}")).collect();
        let summary = candidate_summary(&candidates);
        assert!(summary.starts_with("Species 1, Species 2"));
        assert!(summary.ends_with("(+2 more)"));
        assert_eq!(candidate_summary(&candidates[..1]), "Species 1");
    }
}

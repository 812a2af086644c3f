//! Run configuration.
//!
//! A [`RunConfig`] can be built in code, loaded from a TOML file, or
//! assembled from CLI flags layered over a file. It is validated before the
//! pipeline touches any data.

use std::str::FromStr;

use lifer_chaser_observation_models::{NeighborhoodIndexKind, ScoringPolicy};
use lifer_chaser_season::DateWindow;
use lifer_chaser_taxonomy::SpeciesRules;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default days of tolerance around the reference date.
pub const DEFAULT_INTERVAL_DAYS: i64 = 4;

/// Default neighborhood radius.
pub const DEFAULT_RADIUS_MILES: f64 = 5.0;

/// Default number of ranked centers reported.
pub const DEFAULT_TOP_N: usize = 10;

/// Parameters for one ranking run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RunConfig {
    /// Reference month, 1-12.
    pub reference_month: u32,
    /// Reference day, 1-31. Not cross-checked against the month.
    pub reference_day: u32,
    /// Days of tolerance on either side of the reference date.
    pub interval_days: i64,
    /// Neighborhood radius in miles.
    pub radius_miles: f64,
    /// Number of centers to report.
    pub top_n: usize,
    /// How neighborhoods are scored.
    pub policy: ScoringPolicy,
    /// Which neighborhood builder to run.
    pub index: NeighborhoodIndexKind,
    /// Cap on candidate species listed per center.
    pub max_candidates: Option<usize>,
    /// Species classification rules.
    pub species: SpeciesRules,
}

/// On-disk shape of a [`RunConfig`]. Enum-valued fields stay strings here
/// so that unknown names surface as [`ConfigError`] variants.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
struct RunConfigFile {
    reference_month: u32,
    reference_day: u32,
    interval_days: Option<i64>,
    radius_miles: Option<f64>,
    top_n: Option<usize>,
    policy: Option<String>,
    index: Option<String>,
    max_candidates: Option<usize>,
    #[serde(default)]
    species: SpeciesRules,
}

impl RunConfig {
    /// Creates a config around `month`/`day` with default everything else.
    #[must_use]
    pub fn new(reference_month: u32, reference_day: u32) -> Self {
        Self {
            reference_month,
            reference_day,
            interval_days: DEFAULT_INTERVAL_DAYS,
            radius_miles: DEFAULT_RADIUS_MILES,
            top_n: DEFAULT_TOP_N,
            policy: ScoringPolicy::default(),
            index: NeighborhoodIndexKind::default(),
            max_candidates: None,
            species: SpeciesRules::default(),
        }
    }

    /// Parses and validates a TOML config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] for malformed TOML, an unknown-name
    /// variant for unrecognized policy or index names, or whatever
    /// [`RunConfig::validate`] rejects.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let file: RunConfigFile = toml::de::from_str(toml_str)?;

        let mut config = Self::new(file.reference_month, file.reference_day);
        config.species = file.species;
        config.max_candidates = file.max_candidates;
        if let Some(interval_days) = file.interval_days {
            config.interval_days = interval_days;
        }
        if let Some(radius_miles) = file.radius_miles {
            config.radius_miles = radius_miles;
        }
        if let Some(top_n) = file.top_n {
            config.top_n = top_n;
        }
        if let Some(policy) = file.policy {
            config.policy = parse_policy(&policy)?;
        }
        if let Some(index) = file.index {
            config.index = parse_index(&index)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks every parameter.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=12).contains(&self.reference_month) {
            return Err(ConfigError::InvalidMonth {
                month: self.reference_month,
            });
        }
        if !(1..=31).contains(&self.reference_day) {
            return Err(ConfigError::InvalidDay {
                day: self.reference_day,
            });
        }
        if self.interval_days < 0 {
            return Err(ConfigError::InvalidInterval {
                interval_days: self.interval_days,
            });
        }
        if !(self.radius_miles.is_finite() && self.radius_miles > 0.0) {
            return Err(ConfigError::InvalidRadius {
                radius_miles: self.radius_miles,
            });
        }
        if self.top_n == 0 {
            return Err(ConfigError::InvalidTopN { top_n: self.top_n });
        }
        Ok(())
    }

    /// The date window this config describes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Season`] if the month, day, or interval is
    /// out of range.
    pub fn window(&self) -> Result<DateWindow, ConfigError> {
        Ok(DateWindow::new(
            self.reference_month,
            self.reference_day,
            self.interval_days,
        )?)
    }
}

/// Parses a scoring policy name (`total_species` or `checklist_count`).
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPolicy`] for anything else.
pub fn parse_policy(value: &str) -> Result<ScoringPolicy, ConfigError> {
    ScoringPolicy::from_str(value.trim()).map_err(|_| ConfigError::UnknownPolicy {
        value: value.to_string(),
        expected: expected_names(ScoringPolicy::all()),
    })
}

/// Parses a neighborhood index name (`brute_force` or `rtree`).
///
/// # Errors
///
/// Returns [`ConfigError::UnknownIndex`] for anything else.
pub fn parse_index(value: &str) -> Result<NeighborhoodIndexKind, ConfigError> {
    NeighborhoodIndexKind::from_str(value.trim()).map_err(|_| ConfigError::UnknownIndex {
        value: value.to_string(),
        expected: expected_names(NeighborhoodIndexKind::all()),
    })
}

fn expected_names<T: AsRef<str>>(variants: &[T]) -> String {
    variants
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RunConfig::new(5, 1);
        assert_eq!(config.interval_days, 4);
        assert!((config.radius_miles - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.policy, ScoringPolicy::ChecklistCount);
        assert_eq!(config.index, NeighborhoodIndexKind::RTree);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_parameters() {
        let mut config = RunConfig::new(5, 1);
        config.radius_miles = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRadius { .. })
        ));

        config.radius_miles = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRadius { .. })
        ));

        let mut config = RunConfig::new(5, 1);
        config.interval_days = -1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInterval { interval_days: -1 })
        ));

        let mut config = RunConfig::new(5, 1);
        config.top_n = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTopN { top_n: 0 })
        ));

        assert!(matches!(
            RunConfig::new(13, 1).validate(),
            Err(ConfigError::InvalidMonth { month: 13 })
        ));
        assert!(matches!(
            RunConfig::new(4, 32).validate(),
            Err(ConfigError::InvalidDay { day: 32 })
        ));
    }

    #[test]
    fn loads_toml() {
        let config = RunConfig::from_toml_str(
            r#"
            reference_month = 9
            reference_day = 15
            radius_miles = 12.5
            policy = "total_species"
            index = "brute_force"
            max_candidates = 5

            [species]
            species_groups = []
            exclude_domestic = false
            "#,
        )
        .unwrap();

        assert_eq!(config.reference_month, 9);
        assert_eq!(config.reference_day, 15);
        assert_eq!(config.interval_days, 4);
        assert!((config.radius_miles - 12.5).abs() < f64::EPSILON);
        assert_eq!(config.policy, ScoringPolicy::TotalSpecies);
        assert_eq!(config.index, NeighborhoodIndexKind::BruteForce);
        assert_eq!(config.max_candidates, Some(5));
        assert!(config.species.species_groups.is_empty());
        assert!(!config.species.exclude_domestic);
    }

    #[test]
    fn toml_species_rules_default_when_omitted() {
        let config = RunConfig::from_toml_str("reference_month = 1\nreference_day = 1").unwrap();
        assert_eq!(config.species, SpeciesRules::default());
    }

    #[test]
    fn toml_unknown_names_are_config_errors() {
        let err = RunConfig::from_toml_str(
            "reference_month = 1\nreference_day = 1\npolicy = \"most_birds\"",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPolicy { ref value, .. } if value == "most_birds"));
        assert!(err.to_string().contains("total_species, checklist_count"));

        let err = RunConfig::from_toml_str(
            "reference_month = 1\nreference_day = 1\nindex = \"kd_tree\"",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownIndex { .. }));
    }

    #[test]
    fn toml_values_are_validated() {
        let err = RunConfig::from_toml_str(
            "reference_month = 1\nreference_day = 1\nradius_miles = -3.0",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRadius { .. }));

        assert!(matches!(
            RunConfig::from_toml_str("reference_month = \"May\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn parses_names() {
        assert_eq!(
            parse_policy("checklist_count").unwrap(),
            ScoringPolicy::ChecklistCount
        );
        assert_eq!(parse_index("rtree").unwrap(), NeighborhoodIndexKind::RTree);
        assert!(parse_index("r_tree").is_err());
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Result types for neighborhood ranking and county frequency analysis.
//!
//! These are plain data carriers: the scorer and orchestrator in
//! `lifer_chaser_analytics` produce them, and the CLI renders them as a
//! table or serializes them to JSON.

use std::collections::HashMap;

use lifer_chaser_observation_models::{Location, ScoringPolicy};
use serde::{Deserialize, Serialize};

/// Occurrences of one species within a neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesCount {
    /// Normalized common name.
    pub species: String,
    /// Number of observation rows reporting it.
    pub occurrences: u64,
}

/// Per-species occurrence counts in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesTally {
    entries: Vec<SpeciesCount>,
}

impl SpeciesTally {
    /// Number of distinct species.
    #[must_use]
    pub fn distinct_species(&self) -> usize {
        self.entries.len()
    }

    /// Sum of occurrences over all species.
    #[must_use]
    pub fn total_occurrences(&self) -> u64 {
        self.entries.iter().map(|entry| entry.occurrences).sum()
    }

    /// Occurrences of `species`, if present.
    #[must_use]
    pub fn get(&self, species: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|entry| entry.species == species)
            .map(|entry| entry.occurrences)
    }

    /// Returns `true` if no species were tallied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, SpeciesCount> {
        self.entries.iter()
    }

    /// Species names in first-seen order.
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.species.as_str())
    }

    /// Species names ordered by occurrences descending. Equal counts keep
    /// first-seen order.
    #[must_use]
    pub fn by_occurrence(&self) -> Vec<&SpeciesCount> {
        let mut sorted: Vec<&SpeciesCount> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
        sorted
    }
}

impl<S: Into<String>> FromIterator<S> for SpeciesTally {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut entries: Vec<SpeciesCount> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for species in iter {
            let species = species.into();
            if let Some(&i) = index.get(&species) {
                entries[i].occurrences += 1;
            } else {
                index.insert(species.clone(), entries.len());
                entries.push(SpeciesCount {
                    species,
                    occurrences: 1,
                });
            }
        }

        Self { entries }
    }
}

impl<'a> IntoIterator for &'a SpeciesTally {
    type Item = &'a SpeciesCount;
    type IntoIter = std::slice::Iter<'a, SpeciesCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A center with its score and supporting tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredNeighborhood {
    /// The neighborhood anchor.
    pub center: Location,
    /// Score under the run's policy.
    pub score: u64,
    /// Species seen in the neighborhood within the date window.
    pub tally: SpeciesTally,
}

/// One row of the final ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCenter {
    /// 1-based position in the ranking.
    pub rank: usize,
    /// The neighborhood anchor.
    pub center: Location,
    /// Score under the run's policy.
    pub score: u64,
    /// Candidate lifers, most frequently reported first.
    pub candidates: Vec<String>,
    /// Full per-species breakdown.
    pub tally: SpeciesTally,
}

/// How many rows each pipeline stage kept or dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCounts {
    /// Observations handed to the pipeline.
    pub input_observations: usize,
    /// Dropped as spuhs, slashes, hybrids, domestics, or species groups.
    pub non_species_removed: usize,
    /// Dropped because the species is on the life list.
    pub lifers_removed: usize,
    /// Dropped by the date window.
    pub outside_window: usize,
    /// Observations that reached neighborhood building.
    pub remaining_observations: usize,
    /// Unique locations, i.e. candidate centers.
    pub centers: usize,
    /// Location pairs whose distance was undefined.
    pub undefined_pairs: u64,
}

/// Output of a ranking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingReport {
    /// Scoring policy the centers were ranked by.
    pub policy: ScoringPolicy,
    /// Neighborhood radius in miles.
    pub radius_miles: f64,
    /// Per-stage row counts.
    pub stages: StageCounts,
    /// The top centers, best first.
    pub centers: Vec<RankedCenter>,
}

impl RankingReport {
    /// Returns `true` if no center survived filtering.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Short explanation of why the ranking is empty, if it is.
    #[must_use]
    pub fn empty_reason(&self) -> Option<&'static str> {
        if !self.is_empty() {
            return None;
        }
        let stages = &self.stages;
        Some(if stages.input_observations == 0 {
            "no observations were loaded"
        } else if stages.non_species_removed == stages.input_observations {
            "every observation was a non-species record"
        } else if stages.remaining_observations == 0 && stages.outside_window == 0 {
            "every species is already on the life list"
        } else if stages.remaining_observations == 0 {
            "no observations fall within the date window"
        } else {
            "no centers were built"
        })
    }
}

/// One row of a county frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRecord {
    /// Common name.
    #[serde(rename = "comName")]
    pub common_name: String,
    /// Week-of-month label, e.g. `"May-2"`.
    #[serde(rename = "monthQt")]
    pub month_week: String,
    /// Fraction of checklists reporting the species, 0-1.
    pub frequency: f64,
    /// Number of checklists the frequency was computed from.
    #[serde(rename = "sampleSize", default)]
    pub sample_size: Option<u64>,
}

/// A species and its average frequency over the selected weeks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesFrequency {
    /// Common name.
    pub species: String,
    /// Mean frequency, 0-1.
    pub frequency: f64,
}

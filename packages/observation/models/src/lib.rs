#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Core data types for the lifer-chaser pipeline.
//!
//! Defines the immutable [`Observation`] record produced by the loaders, the
//! hashable [`Location`] used as a neighborhood anchor, the user's
//! [`LifeList`], and the run-wide enums that select the scoring policy and
//! the neighborhood index implementation.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A geographic point in decimal degrees.
///
/// Treated as an opaque, hashable key: two locations are equal when their
/// coordinates are bit-for-bit equal (with `-0.0` folded into `0.0`).
/// Ordering is lexical on `(latitude, longitude)` and is the tie-break used
/// when ranking centers with equal scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Latitude in decimal degrees, positive north.
    pub latitude: f64,
    /// Longitude in decimal degrees, positive east.
    pub longitude: f64,
}

impl Location {
    /// Creates a location from a latitude/longitude pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` if both coordinates are finite and within the valid
    /// latitude/longitude ranges.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    fn canonical(self) -> (f64, f64) {
        (fold_zero(self.latitude), fold_zero(self.longitude))
    }
}

fn fold_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (lat, lng) = self.canonical();
        lat.to_bits().hash(state);
        lng.to_bits().hash(state);
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        let (lat_a, lng_a) = self.canonical();
        let (lat_b, lng_b) = other.canonical();
        lat_a.total_cmp(&lat_b).then_with(|| lng_a.total_cmp(&lng_b))
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

impl From<Location> for geo::Point<f64> {
    fn from(location: Location) -> Self {
        Self::new(location.longitude, location.latitude)
    }
}

/// One reported sighting from the community database export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Checklist (submission) identifier, e.g. `"S12345678"`.
    pub submission_id: String,
    /// Common name as reported, possibly with a parenthetical qualifier.
    pub common_name: String,
    /// Scientific name, if the export carried one.
    pub scientific_name: Option<String>,
    /// Where the checklist was made.
    pub location: Location,
    /// Calendar date of the checklist. The year is kept but only the
    /// month/day position matters to the date window.
    pub date: NaiveDate,
    /// Number of individuals; "present, count unknown" is stored as 1.
    pub count: u32,
}

/// The set of species the user has already recorded.
///
/// Names are stored lowercased so membership checks are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeList {
    names: BTreeSet<String>,
}

impl LifeList {
    /// Builds a life list from already-normalized common names.
    ///
    /// Names are trimmed and lowercased; empty names are dropped.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();
        Self { names }
    }

    /// Returns `true` if `common_name` is on the list (case-insensitive).
    #[must_use]
    pub fn contains(&self, common_name: &str) -> bool {
        self.names.contains(&common_name.trim().to_lowercase())
    }

    /// Number of species on the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the list has no species.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over the lowercased names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// How a neighborhood's observations are reduced to a single score.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoringPolicy {
    /// Number of distinct species present.
    TotalSpecies,
    /// Number of observation rows (one per species per checklist).
    #[default]
    ChecklistCount,
}

impl ScoringPolicy {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::TotalSpecies, Self::ChecklistCount]
    }
}

/// Which neighborhood builder to run.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NeighborhoodIndexKind {
    /// Compare every center against every location.
    BruteForce,
    /// Prefilter candidates through an R-tree envelope query.
    #[default]
    #[serde(rename = "rtree")]
    #[strum(serialize = "rtree")]
    RTree,
}

impl NeighborhoodIndexKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::BruteForce, Self::RTree]
    }
}

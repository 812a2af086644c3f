#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Load report types.

use lifer_chaser_observation_models::Observation;
use serde::{Deserialize, Serialize};

/// A data row that could not be turned into a record and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MalformedRecord {
    /// 1-based line number in the input, header included.
    pub line: u64,
    /// What was wrong with the row.
    pub reason: String,
}

impl std::fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// Result of loading an observation export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Rows that parsed, in file order.
    pub observations: Vec<Observation>,
    /// Rows that were skipped.
    pub skipped: Vec<MalformedRecord>,
}

impl LoadReport {
    /// Total data rows read, parsed or not.
    #[must_use]
    pub fn rows_read(&self) -> usize {
        self.observations.len() + self.skipped.len()
    }
}

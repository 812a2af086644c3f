//! Life list construction and lifer filtering.

use std::sync::LazyLock;

use lifer_chaser_observation_models::{LifeList, Observation};
use regex::Regex;

use crate::species::strip_subspecies_qualifier;

/// Separator between common and scientific name in life list exports
/// (`"Chestnut-sided Warbler - Setophaga pensylvanica"`). Hyphens inside
/// common names have no surrounding spaces.
static NAME_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+-\s+").expect("valid regex"));

/// Extracts the common name from a life list entry.
///
/// Accepts both `"<Common> - <Scientific>"` and a bare common name, and
/// strips any subspecific qualifier.
#[must_use]
pub fn common_name_of_entry(entry: &str) -> &str {
    let common = NAME_SEPARATOR_RE.split(entry).next().unwrap_or(entry);
    strip_subspecies_qualifier(common)
}

/// Builds a [`LifeList`] from raw life list entries.
#[must_use]
pub fn life_list_from_entries<I, S>(entries: I) -> LifeList
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let names: Vec<String> = entries
        .into_iter()
        .map(|entry| common_name_of_entry(entry.as_ref()).to_string())
        .collect();
    LifeList::new(names)
}

/// Keeps only observations of species not on the life list.
///
/// The observation's common name is qualifier-stripped and compared
/// case-insensitively, so applying this twice is the same as once.
#[must_use]
pub fn remove_lifers(observations: Vec<Observation>, life_list: &LifeList) -> Vec<Observation> {
    if life_list.is_empty() {
        return observations;
    }
    observations
        .into_iter()
        .filter(|observation| {
            !life_list.contains(strip_subspecies_qualifier(&observation.common_name))
        })
        .collect()
}

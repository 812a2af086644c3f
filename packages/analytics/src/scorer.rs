//! Neighborhood scoring.

use lifer_chaser_analytics_models::{ScoredNeighborhood, SpeciesTally};
use lifer_chaser_observation_models::{Location, Observation, ScoringPolicy};

/// Scores the observations selected for one neighborhood.
///
/// `observations` must already be restricted to the neighborhood's member
/// locations and the date window, with non-species and lifers removed.
/// The tally is built in first-seen order and returned under either
/// policy:
///
/// * [`ScoringPolicy::TotalSpecies`]: number of distinct species.
/// * [`ScoringPolicy::ChecklistCount`]: number of observation rows, i.e.
///   the sum of the tally's occurrence counts.
#[must_use]
pub fn score_neighborhood<'a, I>(
    center: Location,
    observations: I,
    policy: ScoringPolicy,
) -> ScoredNeighborhood
where
    I: IntoIterator<Item = &'a Observation>,
{
    let tally: SpeciesTally = observations
        .into_iter()
        .map(|observation| observation.common_name.as_str())
        .collect();

    let score = match policy {
        ScoringPolicy::TotalSpecies => tally.distinct_species() as u64,
        ScoringPolicy::ChecklistCount => tally.total_occurrences(),
    };

    ScoredNeighborhood {
        center,
        score,
        tally,
    }
}

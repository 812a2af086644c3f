//! End-to-end ranking of candidate centers.
//!
//! Normalize species → remove lifers → date window → build neighborhoods →
//! score → rank → truncate. Every stage returns a new filtered copy; the
//! stage sizes are recorded in the report's [`StageCounts`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use lifer_chaser_analytics_models::{
    RankedCenter, RankingReport, ScoredNeighborhood, StageCounts,
};
use lifer_chaser_observation_models::{LifeList, Location, Observation};
use lifer_chaser_season::select_within_window;
use lifer_chaser_spatial::{
    Neighborhood, ProgressCallback, build_neighborhoods, builder_for, unique_locations,
};
use lifer_chaser_taxonomy::{normalize_species, remove_lifers};
use rayon::prelude::*;

use crate::{ConfigError, RunConfig, score_neighborhood};

/// Ranks every unique observation location by the lifer potential of its
/// neighborhood.
///
/// An input that filters down to nothing yields an empty ranking, not an
/// error; [`RankingReport::empty_reason`] explains which stage emptied it.
///
/// # Errors
///
/// Returns [`ConfigError`] if `config` is invalid. Nothing is computed in
/// that case.
pub fn rank_centers(
    observations: Vec<Observation>,
    life_list: &LifeList,
    config: &RunConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<RankingReport, ConfigError> {
    config.validate()?;
    let window = config.window()?;
    let start = Instant::now();

    let mut stages = StageCounts {
        input_observations: observations.len(),
        ..StageCounts::default()
    };

    let observations = normalize_species(observations, &config.species);
    stages.non_species_removed = stages.input_observations - observations.len();

    let before = observations.len();
    let observations = remove_lifers(observations, life_list);
    stages.lifers_removed = before - observations.len();

    let before = observations.len();
    let observations = select_within_window(observations, &window);
    stages.outside_window = before - observations.len();
    stages.remaining_observations = observations.len();

    log::info!(
        "{} observations: {} non-species, {} lifers already seen, {} outside {} ±{} days, {} remaining",
        stages.input_observations,
        stages.non_species_removed,
        stages.lifers_removed,
        stages.outside_window,
        window.reference().format("%B %-d"),
        window.interval_days(),
        stages.remaining_observations,
    );

    let locations = unique_locations(&observations);
    stages.centers = locations.len();

    let builder = builder_for(config.index);
    let neighborhoods =
        build_neighborhoods(builder.as_ref(), &locations, config.radius_miles, progress);
    stages.undefined_pairs = neighborhoods.undefined_pairs;

    let rows_by_location = rows_by_location(&observations);
    let mut scored: Vec<ScoredNeighborhood> = neighborhoods
        .iter()
        .collect::<Vec<_>>()
        .par_iter()
        .map(|neighborhood| {
            let rows = member_rows(neighborhood, &rows_by_location);
            score_neighborhood(
                neighborhood.center,
                rows.into_iter().map(|i| &observations[i]),
                config.policy,
            )
        })
        .collect();

    sort_by_rank(&mut scored);
    scored.truncate(config.top_n);

    let centers: Vec<RankedCenter> = scored
        .into_iter()
        .enumerate()
        .map(|(i, scored)| {
            let limit = config.max_candidates.unwrap_or(usize::MAX);
            let candidates = scored
                .tally
                .by_occurrence()
                .into_iter()
                .take(limit)
                .map(|entry| entry.species.clone())
                .collect();
            RankedCenter {
                rank: i + 1,
                center: scored.center,
                score: scored.score,
                candidates,
                tally: scored.tally,
            }
        })
        .collect();

    log::info!(
        "Ranked {} of {} centers by {} in {:.2?}",
        centers.len(),
        stages.centers,
        config.policy,
        start.elapsed()
    );

    Ok(RankingReport {
        policy: config.policy,
        radius_miles: config.radius_miles,
        stages,
        centers,
    })
}

/// Orders by score descending, then by center ascending.
pub fn sort_by_rank(scored: &mut [ScoredNeighborhood]) {
    scored.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.center.cmp(&b.center)));
}

/// Row indices of the observations at each location, in input order.
fn rows_by_location(observations: &[Observation]) -> HashMap<Location, Vec<usize>> {
    let mut rows: HashMap<Location, Vec<usize>> = HashMap::new();
    for (i, observation) in observations.iter().enumerate() {
        rows.entry(observation.location).or_default().push(i);
    }
    rows
}

/// Row indices of every observation inside `neighborhood`, in input order.
fn member_rows(
    neighborhood: &Neighborhood,
    rows_by_location: &HashMap<Location, Vec<usize>>,
) -> Vec<usize> {
    let mut rows: Vec<usize> = neighborhood
        .members
        .iter()
        .filter_map(|member| rows_by_location.get(member))
        .flatten()
        .copied()
        .collect();
    rows.sort_unstable();
    rows
}

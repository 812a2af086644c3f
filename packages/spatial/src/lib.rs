#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Radius neighborhoods around candidate centers.
//!
//! Every unique observation location is a candidate center. A center's
//! neighborhood is the set of locations whose geodesic distance from it is
//! strictly less than the radius, plus the center itself. Pairs whose
//! distance is undefined never join a neighborhood.
//!
//! The computation sits behind [`NeighborhoodBuilder`] so that the
//! brute-force all-pairs scan and the R-tree prefiltered scan are
//! interchangeable: both produce identical neighborhoods.

pub mod brute_force;
pub mod progress;
pub mod rtree;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use lifer_chaser_geodesic::{Distance, DistanceProvider};
use lifer_chaser_observation_models::{Location, NeighborhoodIndexKind, Observation};

pub use brute_force::BruteForceBuilder;
pub use progress::{NullProgress, ProgressCallback, null_progress};
pub use rtree::RTreeBuilder;

/// One center and the locations within the radius of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighborhood {
    /// The anchor location.
    pub center: Location,
    /// Locations within the radius, always including `center`.
    pub members: BTreeSet<Location>,
}

impl Neighborhood {
    /// Returns `true` if `location` belongs to this neighborhood.
    #[must_use]
    pub fn contains(&self, location: &Location) -> bool {
        self.members.contains(location)
    }
}

/// All neighborhoods of a run, in center order.
#[derive(Debug, Clone, Default)]
pub struct Neighborhoods {
    entries: Vec<Neighborhood>,
    by_center: HashMap<Location, usize>,
    /// Number of (center, location) pairs whose distance was undefined.
    pub undefined_pairs: u64,
}

impl Neighborhoods {
    fn from_results(results: Vec<(Neighborhood, u64)>) -> Self {
        let mut undefined_pairs = 0;
        let mut entries = Vec::with_capacity(results.len());
        for (neighborhood, undefined) in results {
            undefined_pairs += undefined;
            entries.push(neighborhood);
        }
        let by_center = entries
            .iter()
            .enumerate()
            .map(|(i, n)| (n.center, i))
            .collect();
        Self {
            entries,
            by_center,
            undefined_pairs,
        }
    }

    /// Looks up the neighborhood anchored at `center`.
    #[must_use]
    pub fn get(&self, center: &Location) -> Option<&Neighborhood> {
        self.by_center.get(center).map(|&i| &self.entries[i])
    }

    /// Iterates over neighborhoods in center order.
    pub fn iter(&self) -> std::slice::Iter<'_, Neighborhood> {
        self.entries.iter()
    }

    /// Number of centers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no centers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Neighborhoods {
    type Item = &'a Neighborhood;
    type IntoIter = std::slice::Iter<'a, Neighborhood>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builds the center → members mapping for a set of unique locations.
pub trait NeighborhoodBuilder: Send + Sync {
    /// Short name for log messages.
    fn name(&self) -> &'static str;

    /// Builds one neighborhood per location, treating each as a center.
    ///
    /// `locations` must already be deduplicated; output order follows it.
    fn build(
        &self,
        locations: &[Location],
        radius_miles: f64,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Neighborhoods;
}

/// Returns the Vincenty-backed builder for `kind`.
#[must_use]
pub fn builder_for(kind: NeighborhoodIndexKind) -> Box<dyn NeighborhoodBuilder> {
    match kind {
        NeighborhoodIndexKind::BruteForce => Box::new(BruteForceBuilder::new()),
        NeighborhoodIndexKind::RTree => Box::new(RTreeBuilder::new()),
    }
}

/// Builds neighborhoods with `builder`, logging timing and absorbed
/// convergence failures.
#[must_use]
pub fn build_neighborhoods(
    builder: &dyn NeighborhoodBuilder,
    locations: &[Location],
    radius_miles: f64,
    progress: &Arc<dyn ProgressCallback>,
) -> Neighborhoods {
    let start = Instant::now();
    progress.set_total(locations.len() as u64);
    progress.set_message(format!("Building neighborhoods ({})", builder.name()));

    let neighborhoods = builder.build(locations, radius_miles, progress);

    let memberships: usize = neighborhoods.iter().map(|n| n.members.len()).sum();
    log::info!(
        "Built {} neighborhoods ({} memberships, radius {radius_miles} mi) with {} in {:.2?}",
        neighborhoods.len(),
        memberships,
        builder.name(),
        start.elapsed()
    );
    if neighborhoods.undefined_pairs > 0 {
        log::warn!(
            "{} location pairs had no converged geodesic distance and were treated as out of range",
            neighborhoods.undefined_pairs
        );
    }
    progress.finish(format!("{} neighborhoods built", neighborhoods.len()));

    neighborhoods
}

/// Unique observation locations in first-seen order.
#[must_use]
pub fn unique_locations(observations: &[Observation]) -> Vec<Location> {
    let mut seen = HashSet::new();
    observations
        .iter()
        .map(|observation| observation.location)
        .filter(|location| seen.insert(*location))
        .collect()
}

/// Collects the candidates within `radius_miles` of `center`.
///
/// Returns the members (center always included) and the number of
/// candidates whose distance was undefined.
fn members_within<D, I>(
    provider: &D,
    center: Location,
    candidates: I,
    radius_miles: f64,
) -> (BTreeSet<Location>, u64)
where
    D: DistanceProvider + ?Sized,
    I: IntoIterator<Item = Location>,
{
    let mut members = BTreeSet::from([center]);
    let mut undefined = 0;

    for candidate in candidates {
        if candidate == center {
            continue;
        }
        match provider.distance(center, candidate) {
            d @ Distance::Miles(_) if d.is_within(radius_miles) => {
                members.insert(candidate);
            }
            Distance::Miles(_) => {}
            Distance::Undefined => undefined += 1,
        }
    }

    (members, undefined)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn observation_at(location: Location) -> Observation {
        Observation {
            submission_id: "S1".to_string(),
            common_name: "Mallard".to_string(),
            scientific_name: None,
            location,
            date: NaiveDate::from_ymd_opt(2019, 5, 1).unwrap(),
            count: 1,
        }
    }

    #[test]
    fn unique_locations_keep_first_seen_order() {
        let a = Location::new(40.0, -75.0);
        let b = Location::new(41.0, -75.0);
        let observations: Vec<Observation> =
            [b, a, b, a, b].into_iter().map(observation_at).collect();
        assert_eq!(unique_locations(&observations), vec![b, a]);
    }

    #[test]
    fn builder_for_returns_requested_kind() {
        assert_eq!(
            builder_for(NeighborhoodIndexKind::BruteForce).name(),
            "brute_force"
        );
        assert_eq!(builder_for(NeighborhoodIndexKind::RTree).name(), "rtree");
    }

    #[test]
    fn empty_input_builds_nothing() {
        let neighborhoods = build_neighborhoods(
            builder_for(NeighborhoodIndexKind::RTree).as_ref(),
            &[],
            5.0,
            &null_progress(),
        );
        assert!(neighborhoods.is_empty());
    }
}

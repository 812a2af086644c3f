//! All-pairs neighborhood construction.
//!
//! Compares every center against every location. Quadratic in the number
//! of unique locations; parallelized over centers.

use std::sync::Arc;

use lifer_chaser_geodesic::{DistanceProvider, Vincenty};
use lifer_chaser_observation_models::Location;
use rayon::prelude::*;

use crate::{Neighborhood, NeighborhoodBuilder, Neighborhoods, ProgressCallback, members_within};

/// Brute-force builder.
#[derive(Debug, Clone, Default)]
pub struct BruteForceBuilder<D = Vincenty> {
    provider: D,
}

impl BruteForceBuilder {
    /// Creates a builder measuring with [`Vincenty`].
    #[must_use]
    pub const fn new() -> Self {
        Self { provider: Vincenty }
    }
}

impl<D: DistanceProvider> BruteForceBuilder<D> {
    /// Creates a builder measuring with `provider`.
    #[must_use]
    pub const fn with_provider(provider: D) -> Self {
        Self { provider }
    }
}

impl<D: DistanceProvider> NeighborhoodBuilder for BruteForceBuilder<D> {
    fn name(&self) -> &'static str {
        "brute_force"
    }

    fn build(
        &self,
        locations: &[Location],
        radius_miles: f64,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Neighborhoods {
        let results: Vec<(Neighborhood, u64)> = locations
            .par_iter()
            .map(|&center| {
                let (members, undefined) = members_within(
                    &self.provider,
                    center,
                    locations.iter().copied(),
                    radius_miles,
                );
                progress.inc(1);
                (Neighborhood { center, members }, undefined)
            })
            .collect();

        Neighborhoods::from_results(results)
    }
}

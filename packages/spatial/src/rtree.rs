//! R-tree prefiltered neighborhood construction.
//!
//! Locations are bulk-loaded into an R-tree keyed by `[longitude, latitude]`.
//! For each center a degree-space box that is guaranteed to contain every
//! location within the radius is queried first, and only those candidates
//! are measured with the exact geodesic. Boxes crossing the antimeridian are
//! split in two; boxes reaching the poles span every longitude.

use std::collections::BTreeSet;
use std::sync::Arc;

use lifer_chaser_geodesic::{DistanceProvider, Vincenty};
use lifer_chaser_observation_models::Location;
use rayon::prelude::*;
use rstar::{AABB, RTree, RTreeObject};

use crate::{Neighborhood, NeighborhoodBuilder, Neighborhoods, ProgressCallback, members_within};

/// Shortest WGS-84 degree of latitude (at the equator), in miles.
const MIN_MILES_PER_DEGREE_LATITUDE: f64 = 68.7;

/// WGS-84 equatorial degree of longitude, in miles. A degree of longitude at
/// latitude φ is never shorter than this times `cos φ`.
const EQUATORIAL_MILES_PER_DEGREE_LONGITUDE: f64 = 69.172;

/// Slack applied to both box half-widths.
const BOX_MARGIN: f64 = 1.05;

/// Boxes reaching past this latitude span the full longitude range.
const POLAR_LATITUDE: f64 = 89.0;

/// A location stored in the R-tree with its position in the input slice.
struct IndexedLocation {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedLocation {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree builder.
///
/// Produces the same neighborhoods as [`crate::BruteForceBuilder`].
/// `undefined_pairs` only counts pairs that survived the prefilter.
#[derive(Debug, Clone, Default)]
pub struct RTreeBuilder<D = Vincenty> {
    provider: D,
}

impl RTreeBuilder {
    /// Creates a builder measuring with [`Vincenty`].
    #[must_use]
    pub const fn new() -> Self {
        Self { provider: Vincenty }
    }
}

impl<D: DistanceProvider> RTreeBuilder<D> {
    /// Creates a builder measuring with `provider`.
    #[must_use]
    pub const fn with_provider(provider: D) -> Self {
        Self { provider }
    }
}

impl<D: DistanceProvider> NeighborhoodBuilder for RTreeBuilder<D> {
    fn name(&self) -> &'static str {
        "rtree"
    }

    fn build(
        &self,
        locations: &[Location],
        radius_miles: f64,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Neighborhoods {
        let tree = RTree::bulk_load(
            locations
                .iter()
                .enumerate()
                .map(|(index, location)| IndexedLocation {
                    index,
                    envelope: AABB::from_point([location.longitude, location.latitude]),
                })
                .collect(),
        );
        log::debug!("Indexed {} locations into R-tree", tree.size());

        let results: Vec<(Neighborhood, u64)> = locations
            .par_iter()
            .map(|&center| {
                let candidates: BTreeSet<usize> = search_boxes(center, radius_miles)
                    .iter()
                    .flat_map(|query_env| tree.locate_in_envelope_intersecting(query_env))
                    .map(|entry| entry.index)
                    .collect();
                let (members, undefined) = members_within(
                    &self.provider,
                    center,
                    candidates.into_iter().map(|i| locations[i]),
                    radius_miles,
                );
                progress.inc(1);
                (Neighborhood { center, members }, undefined)
            })
            .collect();

        Neighborhoods::from_results(results)
    }
}

/// Degree-space boxes that together cover every point within
/// `radius_miles` of `center`.
fn search_boxes(center: Location, radius_miles: f64) -> Vec<AABB<[f64; 2]>> {
    let lat_delta = radius_miles / MIN_MILES_PER_DEGREE_LATITUDE * BOX_MARGIN;
    let south = (center.latitude - lat_delta).max(-90.0);
    let north = (center.latitude + lat_delta).min(90.0);
    let widest = south.abs().max(north.abs());

    let lon_delta = if widest >= POLAR_LATITUDE {
        f64::INFINITY
    } else {
        radius_miles / (EQUATORIAL_MILES_PER_DEGREE_LONGITUDE * widest.to_radians().cos())
            * BOX_MARGIN
    };

    if lon_delta >= 180.0 {
        return vec![AABB::from_corners([-180.0, south], [180.0, north])];
    }

    let west = center.longitude - lon_delta;
    let east = center.longitude + lon_delta;
    let mut boxes = vec![AABB::from_corners([west.max(-180.0), south], [east.min(180.0), north])];
    if west < -180.0 {
        boxes.push(AABB::from_corners([west + 360.0, south], [180.0, north]));
    }
    if east > 180.0 {
        boxes.push(AABB::from_corners([-180.0, south], [east - 360.0, north]));
    }
    boxes
}

#[cfg(test)]
mod tests {
    use rstar::Envelope as _;

    use super::*;
    use crate::{BruteForceBuilder, null_progress};

    fn sample_locations() -> Vec<Location> {
        let mut locations = vec![
            // Antimeridian neighbors, about 1.4 mi apart.
            Location::new(10.0, 179.99),
            Location::new(10.0, -179.99),
            // Near the pole, far apart in longitude but close on the ground.
            Location::new(89.95, 0.0),
            Location::new(89.95, 120.0),
            Location::new(89.95, -120.0),
            Location::new(-89.99, 45.0),
            Location::new(-89.99, -135.0),
        ];
        for i in 0..12 {
            for j in 0..12 {
                locations.push(Location::new(
                    40.0 + f64::from(i) * 0.037,
                    -75.0 + f64::from(j) * 0.041,
                ));
            }
        }
        locations
    }

    #[test]
    fn matches_brute_force() {
        let locations = sample_locations();
        for radius in [0.5, 2.0, 5.0, 25.0, 500.0] {
            let brute = BruteForceBuilder::new().build(&locations, radius, &null_progress());
            let indexed = RTreeBuilder::new().build(&locations, radius, &null_progress());

            assert_eq!(brute.len(), indexed.len());
            for (expected, actual) in brute.iter().zip(indexed.iter()) {
                assert_eq!(expected, actual, "radius {radius}");
            }
        }
    }

    #[test]
    fn finds_neighbors_across_antimeridian() {
        let east = Location::new(10.0, 179.99);
        let west = Location::new(10.0, -179.99);
        let neighborhoods = RTreeBuilder::new().build(&[east, west], 5.0, &null_progress());
        assert!(neighborhoods.get(&east).unwrap().contains(&west));
        assert!(neighborhoods.get(&west).unwrap().contains(&east));
    }

    #[test]
    fn finds_neighbors_around_the_pole() {
        let a = Location::new(89.95, 0.0);
        let b = Location::new(89.95, 179.0);
        let neighborhoods = RTreeBuilder::new().build(&[a, b], 10.0, &null_progress());
        assert!(neighborhoods.get(&a).unwrap().contains(&b));
    }

    #[test]
    fn polar_boxes_span_all_longitudes() {
        let boxes = search_boxes(Location::new(88.9, 10.0), 100.0);
        assert_eq!(boxes.len(), 1);
        assert!(boxes[0].contains_point(&[-180.0, 89.5]));
        assert!(boxes[0].contains_point(&[180.0, 89.5]));
    }

    #[test]
    fn antimeridian_boxes_are_split() {
        let boxes = search_boxes(Location::new(0.0, 179.95), 10.0);
        assert_eq!(boxes.len(), 2);
        assert!(boxes.iter().any(|b| b.contains_point(&[-179.95, 0.0])));
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Geodesic distances on the WGS-84 ellipsoid.
//!
//! Implements the iterative Vincenty inverse formula. The iteration does not
//! converge for antipodal and nearly-antipodal point pairs; those come back
//! as [`Distance::Undefined`] instead of a NaN so that a failed pair can
//! never leak into a radius comparison.

use std::f64::consts::PI;

use lifer_chaser_observation_models::Location;

/// WGS-84 semi-major axis in meters.
const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// WGS-84 flattening.
const FLATTENING: f64 = 1.0 / 298.257_223_563;

/// WGS-84 semi-minor axis in meters.
const SEMI_MINOR_AXIS: f64 = (1.0 - FLATTENING) * SEMI_MAJOR_AXIS;

const MAX_ITERATIONS: usize = 200;
const CONVERGENCE_THRESHOLD: f64 = 1e-12;

/// Meters in one international mile.
pub const METERS_PER_MILE: f64 = 1_609.344;

/// The Vincenty iteration ran out of budget (or diverged) for a point pair.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("Vincenty formula failed to converge between {from} and {to}")]
pub struct FailedToConverge {
    /// First point of the pair.
    pub from: Location,
    /// Second point of the pair.
    pub to: Location,
}

/// Result of a distance computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distance {
    /// A converged distance in miles.
    Miles(f64),
    /// The formula did not converge. Never within any finite radius.
    Undefined,
}

impl Distance {
    /// Returns the distance in miles, or `None` if undefined.
    #[must_use]
    pub const fn miles(self) -> Option<f64> {
        match self {
            Self::Miles(miles) => Some(miles),
            Self::Undefined => None,
        }
    }

    /// Returns `true` if the distance is defined and strictly less than
    /// `radius_miles`.
    #[must_use]
    pub fn is_within(self, radius_miles: f64) -> bool {
        matches!(self, Self::Miles(miles) if miles < radius_miles)
    }

    /// Returns `true` if the formula did not converge.
    #[must_use]
    pub const fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl From<Result<f64, FailedToConverge>> for Distance {
    fn from(result: Result<f64, FailedToConverge>) -> Self {
        result.map_or(Self::Undefined, |meters| Self::Miles(meters / METERS_PER_MILE))
    }
}

/// Anything that can measure the distance between two locations.
///
/// The neighborhood builders are generic over this so tests can substitute
/// a provider with known answers.
pub trait DistanceProvider: Send + Sync {
    /// Distance between `a` and `b`.
    fn distance(&self, a: Location, b: Location) -> Distance;
}

/// The ellipsoidal Vincenty provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vincenty;

impl DistanceProvider for Vincenty {
    fn distance(&self, a: Location, b: Location) -> Distance {
        distance_miles(a, b)
    }
}

/// Geodesic distance in miles between two locations.
///
/// The pair is put in canonical order before computing so the result is
/// exactly symmetric.
#[must_use]
pub fn distance_miles(a: Location, b: Location) -> Distance {
    let (from, to) = if a <= b { (a, b) } else { (b, a) };
    let result = vincenty_meters(from, to);
    if let Err(e) = &result {
        log::trace!("{e}");
    }
    result.into()
}

/// Geodesic distance in meters via the Vincenty inverse formula.
///
/// # Errors
///
/// Returns [`FailedToConverge`] if the iteration on lambda does not settle
/// within the iteration budget or diverges, which happens for antipodal
/// and nearly-antipodal pairs.
#[allow(clippy::many_single_char_names, clippy::similar_names)]
pub fn vincenty_meters(from: Location, to: Location) -> Result<f64, FailedToConverge> {
    if from == to {
        return Ok(0.0);
    }

    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let l = wrap_longitude_delta(to.longitude - from.longitude).to_radians();

    let u1 = ((1.0 - FLATTENING) * phi1.tan()).atan();
    let u2 = ((1.0 - FLATTENING) * phi2.tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let antipodal = l.abs() > PI / 2.0 || (phi2 - phi1).abs() > PI / 2.0;
    let failed = FailedToConverge { from, to };

    let mut lambda = l;

    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        let sin_sigma = (cos_u2 * sin_lambda)
            .hypot(cos_u1.mul_add(sin_u2, -(sin_u1 * cos_u2 * cos_lambda)));
        if sin_sigma == 0.0 {
            // Coincident points.
            return Ok(0.0);
        }

        let cos_sigma = (cos_u1 * cos_u2).mul_add(cos_lambda, sin_u1 * sin_u2);
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = sin_alpha.mul_add(-sin_alpha, 1.0);

        // Both points on the equator leave cos²α at zero.
        let cos_2sigma_m = if cos_sq_alpha == 0.0 {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };

        let c = FLATTENING / 16.0
            * cos_sq_alpha
            * FLATTENING.mul_add(3.0f64.mul_add(-cos_sq_alpha, 4.0), 4.0);

        let previous = lambda;
        lambda = ((1.0 - c) * FLATTENING * sin_alpha).mul_add(
            (c * sin_sigma).mul_add(
                (c * cos_sigma).mul_add(
                    (2.0 * cos_2sigma_m).mul_add(cos_2sigma_m, -1.0),
                    cos_2sigma_m,
                ),
                sigma,
            ),
            l,
        );

        let iteration_check = if antipodal {
            lambda.abs() - PI
        } else {
            lambda.abs()
        };
        if !lambda.is_finite() || iteration_check > PI {
            return Err(failed);
        }

        if (lambda - previous).abs() < CONVERGENCE_THRESHOLD {
            let meters = ellipsoidal_arc(sigma, sin_sigma, cos_sigma, cos_sq_alpha, cos_2sigma_m);
            return if meters.is_finite() {
                Ok(meters)
            } else {
                Err(failed)
            };
        }
    }

    Err(failed)
}

/// Wraps a longitude difference in degrees into `[-180, 180]`.
fn wrap_longitude_delta(delta: f64) -> f64 {
    if delta > 180.0 {
        delta - 360.0
    } else if delta < -180.0 {
        delta + 360.0
    } else {
        delta
    }
}

/// Final step of the inverse formula: arc length on the ellipsoid from the
/// converged auxiliary-sphere quantities.
fn ellipsoidal_arc(
    sigma: f64,
    sin_sigma: f64,
    cos_sigma: f64,
    cos_sq_alpha: f64,
    cos_2sigma_m: f64,
) -> f64 {
    let a_sq = SEMI_MAJOR_AXIS * SEMI_MAJOR_AXIS;
    let b_sq = SEMI_MINOR_AXIS * SEMI_MINOR_AXIS;
    let u_sq = cos_sq_alpha * (a_sq - b_sq) / b_sq;

    let big_a = 1.0
        + u_sq / 16384.0 * u_sq.mul_add(u_sq.mul_add(175.0f64.mul_add(-u_sq, 320.0), -768.0), 4096.0);
    let big_b = u_sq / 1024.0 * u_sq.mul_add(u_sq.mul_add(47.0f64.mul_add(-u_sq, 74.0), -128.0), 256.0);

    let cos_2sigma_m_sq = cos_2sigma_m * cos_2sigma_m;
    let delta_sigma = big_b
        * sin_sigma
        * (big_b / 4.0).mul_add(
            cos_sigma.mul_add(
                2.0f64.mul_add(cos_2sigma_m_sq, -1.0),
                -(big_b / 6.0
                    * cos_2sigma_m
                    * (4.0 * sin_sigma).mul_add(sin_sigma, -3.0)
                    * 4.0f64.mul_add(cos_2sigma_m_sq, -3.0)),
            ),
            cos_2sigma_m,
        );

    SEMI_MINOR_AXIS * big_a * (sigma - delta_sigma)
}

//! Geographic coordinates and geodesic distance.
//!
//! Distances are measured on the WGS-84 ellipsoid with Vincenty's inverse
//! formula. Near-antipodal pairs, where the iteration does not converge,
//! fall back to the great-circle (haversine) distance on the mean sphere.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// WGS-84 semi-major axis in metres.
const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 flattening.
const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// IUGG mean earth radius in kilometres.
const MEAN_EARTH_RADIUS_KM: f64 = 6_371.008_8;

const VINCENTY_MAX_ITERATIONS: usize = 200;
const VINCENTY_TOLERANCE: f64 = 1e-12;

/// A point on the earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Creates coordinates, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !latitude.is_finite() {
            return Err(ValidationError::invalid_format("latitude", "must be finite"));
        }
        if !longitude.is_finite() {
            return Err(ValidationError::invalid_format("longitude", "must be finite"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::out_of_range("latitude", -90.0, 90.0, latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::out_of_range("longitude", -180.0, 180.0, longitude));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Distance to another point in kilometres.
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        geodesic_distance_km(self, other)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Geodesic distance between two points in kilometres.
pub fn geodesic_distance_km(from: &Coordinates, to: &Coordinates) -> f64 {
    match vincenty_inverse_m(from, to) {
        Some(metres) => metres / 1000.0,
        None => {
            tracing::debug!(%from, %to, "Vincenty did not converge, using great-circle distance");
            great_circle_distance_km(from, to)
        }
    }
}

/// Haversine distance on a sphere of the mean earth radius.
pub fn great_circle_distance_km(from: &Coordinates, to: &Coordinates) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let d_phi = (to.latitude - from.latitude).to_radians();
    let d_lambda = (to.longitude - from.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Vincenty's inverse solution. `None` when the iteration fails to converge.
fn vincenty_inverse_m(from: &Coordinates, to: &Coordinates) -> Option<f64> {
    let b = (1.0 - WGS84_F) * WGS84_A;

    let l = (to.longitude - from.longitude).to_radians();
    let u1 = ((1.0 - WGS84_F) * from.latitude.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * to.latitude.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..VINCENTY_MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            // coincident points
            return Some(0.0);
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        let cos_2sigma_m = if cos_sq_alpha == 0.0 {
            // equatorial line
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));

        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if lambda.abs() > std::f64::consts::PI {
            return None;
        }

        if (lambda - previous).abs() < VINCENTY_TOLERANCE {
            let u_sq = cos_sq_alpha * (WGS84_A.powi(2) - b.powi(2)) / b.powi(2);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma.powi(2))
                                * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));
            return Some(b * big_a * (sigma - delta_sigma));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> Coordinates {
        Coordinates::new(lat, lon).unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn accepts_valid_range() {
            let c = point(55.75, 37.62);
            assert_eq!(c.latitude(), 55.75);
            assert_eq!(c.longitude(), 37.62);
        }

        #[test]
        fn accepts_poles_and_antimeridian() {
            assert!(Coordinates::new(90.0, 180.0).is_ok());
            assert!(Coordinates::new(-90.0, -180.0).is_ok());
        }

        #[test]
        fn rejects_latitude_out_of_range() {
            let err = Coordinates::new(91.0, 0.0).unwrap_err();
            assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "latitude"));
        }

        #[test]
        fn rejects_longitude_out_of_range() {
            let err = Coordinates::new(0.0, -181.0).unwrap_err();
            assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "longitude"));
        }

        #[test]
        fn rejects_nan() {
            assert!(Coordinates::new(f64::NAN, 0.0).is_err());
            assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
        }
    }

    mod distance {
        use super::*;

        #[test]
        fn identical_points_are_zero_apart() {
            let c = point(55.7539, 37.6208);
            assert_eq!(geodesic_distance_km(&c, &c), 0.0);
        }

        #[test]
        fn one_degree_along_equator_is_semi_major_arc() {
            let d = geodesic_distance_km(&point(0.0, 0.0), &point(0.0, 1.0));
            assert!((d - 111.319_49).abs() < 0.001, "got {d}");
        }

        #[test]
        fn one_degree_of_latitude_at_equator() {
            let d = geodesic_distance_km(&point(0.0, 0.0), &point(1.0, 0.0));
            assert!((d - 110.574).abs() < 0.05, "got {d}");
        }

        #[test]
        fn distance_is_symmetric() {
            let a = point(55.7539, 37.6208);
            let b = point(55.7963, 37.5383);
            let ab = geodesic_distance_km(&a, &b);
            let ba = geodesic_distance_km(&b, &a);
            assert!((ab - ba).abs() < 1e-9);
        }

        #[test]
        fn close_to_great_circle_for_city_scale() {
            let a = point(55.7539, 37.6208);
            let b = point(55.7963, 37.5383);
            let ellipsoid = geodesic_distance_km(&a, &b);
            let sphere = great_circle_distance_km(&a, &b);
            assert!((ellipsoid - sphere).abs() / sphere < 0.005);
        }

        #[test]
        fn antipodal_points_fall_back_to_great_circle() {
            let d = geodesic_distance_km(&point(0.0, 0.0), &point(0.0, 180.0));
            assert!(d.is_finite());
            assert!(d > 19_900.0 && d < 20_100.0, "got {d}");
        }
    }
}

//! Great-circle geodesy for route navigation.
//!
//! Provides the spherical distance and bearing primitives used by the
//! progress tracker and VNAV calculator. All functions here are pure and
//! total: malformed input degrades to a sentinel value instead of
//! propagating a fault, so downstream arithmetic stays well-defined even
//! while the position source has no fix.

/// Mean Earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Distance returned when either endpoint is a degenerate "no fix" position.
///
/// A point with both coordinates near zero is the idle value emitted by a
/// position source that has not acquired a fix yet; treating it as a real
/// location off the west-African coast would produce wild distances.
pub const NO_FIX_DISTANCE_NM: f64 = 999.0;

/// Threshold below which a coordinate pair is considered "no fix".
const DEGENERATE_COORD_DEG: f64 = 0.1;

/// Returns true if the position looks like an unset "no fix" value.
#[inline]
pub fn is_degenerate(lat: f64, lon: f64) -> bool {
    lat.abs() < DEGENERATE_COORD_DEG && lon.abs() < DEGENERATE_COORD_DEG
}

/// Great-circle distance between two points in nautical miles (haversine).
///
/// Returns [`NO_FIX_DISTANCE_NM`] if either point is degenerate or any
/// input is non-finite. Never panics.
pub fn distance_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if !(lat1.is_finite() && lon1.is_finite() && lat2.is_finite() && lon2.is_finite()) {
        return NO_FIX_DISTANCE_NM;
    }
    if is_degenerate(lat1, lon1) || is_degenerate(lat2, lon2) {
        return NO_FIX_DISTANCE_NM;
    }

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // Clamp guards against a fractionally > 1.0 from rounding.
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());

    EARTH_RADIUS_NM * c
}

/// Initial great-circle bearing from point 1 to point 2.
///
/// Returns degrees in [0, 360), where 0 = North, 90 = East. Non-finite
/// input yields 0.0 rather than an error; the bearing of a zero-length
/// segment is also 0.0.
pub fn bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if !(lat1.is_finite() && lon1.is_finite() && lat2.is_finite() && lon2.is_finite()) {
        return 0.0;
    }

    let lat1_r = lat1.to_radians();
    let lat2_r = lat2.to_radians();
    let dlon_r = (lon2 - lon1).to_radians();

    let y = dlon_r.sin() * lat2_r.cos();
    let x = lat1_r.cos() * lat2_r.sin() - lat1_r.sin() * lat2_r.cos() * dlon_r.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Absolute angular difference between two bearings, folded to [0, 180].
pub fn angle_difference_deg(a: f64, b: f64) -> f64 {
    let mut diff = (a - b).abs() % 360.0;
    if diff > 180.0 {
        diff = 360.0 - diff;
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_zero_for_identical_points() {
        let d = distance_nm(53.6304, 9.9882, 53.6304, 9.9882);
        assert!(d.abs() < 1e-9, "Identical points should be 0 NM apart, got {}", d);
    }

    #[test]
    fn test_distance_known_city_pair() {
        // Hamburg (EDDH) to Munich (EDDM): roughly 327 NM
        let d = distance_nm(53.6304, 9.9882, 48.3538, 11.7861);
        assert!(
            (d - 327.0).abs() < 5.0,
            "EDDH-EDDM should be ~327 NM, got {:.1}",
            d
        );
    }

    #[test]
    fn test_distance_degenerate_point_yields_sentinel() {
        // A "no fix" origin must not look like a position near (0, 0)
        assert_eq!(distance_nm(0.0, 0.0, 48.0, 11.0), NO_FIX_DISTANCE_NM);
        assert_eq!(distance_nm(48.0, 11.0, 0.05, -0.05), NO_FIX_DISTANCE_NM);
    }

    #[test]
    fn test_distance_non_finite_yields_sentinel() {
        assert_eq!(distance_nm(f64::NAN, 10.0, 48.0, 11.0), NO_FIX_DISTANCE_NM);
        assert_eq!(distance_nm(48.0, f64::INFINITY, 48.0, 11.0), NO_FIX_DISTANCE_NM);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        // Due north
        assert!((bearing_deg(50.0, 10.0, 51.0, 10.0) - 0.0).abs() < 0.1);
        // Due south
        assert!((bearing_deg(51.0, 10.0, 50.0, 10.0) - 180.0).abs() < 0.1);
        // Due east (at the equator region bearings stay closest to 90)
        assert!((bearing_deg(10.0, 10.0, 10.0, 11.0) - 90.0).abs() < 0.5);
        // Due west
        assert!((bearing_deg(10.0, 11.0, 10.0, 10.0) - 270.0).abs() < 0.5);
    }

    #[test]
    fn test_bearing_non_finite_yields_zero() {
        assert_eq!(bearing_deg(f64::NAN, 0.0, 1.0, 1.0), 0.0);
    }

    #[test]
    fn test_angle_difference_folding() {
        assert!((angle_difference_deg(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((angle_difference_deg(10.0, 350.0) - 20.0).abs() < 1e-9);
        assert!((angle_difference_deg(90.0, 270.0) - 180.0).abs() < 1e-9);
        assert!((angle_difference_deg(45.0, 45.0)).abs() < 1e-9);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_distance_is_symmetric(
                lat1 in -80.0..80.0_f64,
                lon1 in -179.0..179.0_f64,
                lat2 in -80.0..80.0_f64,
                lon2 in -179.0..179.0_f64,
            ) {
                let d1 = distance_nm(lat1, lon1, lat2, lon2);
                let d2 = distance_nm(lat2, lon2, lat1, lon1);
                prop_assert!(
                    (d1 - d2).abs() < 1e-6,
                    "distance not symmetric: {} vs {}", d1, d2
                );
            }

            #[test]
            fn test_distance_self_is_zero_or_sentinel(
                lat in -80.0..80.0_f64,
                lon in -179.0..179.0_f64,
            ) {
                let d = distance_nm(lat, lon, lat, lon);
                if is_degenerate(lat, lon) {
                    prop_assert_eq!(d, NO_FIX_DISTANCE_NM);
                } else {
                    prop_assert!(d.abs() < 1e-6, "self-distance should be 0, got {}", d);
                }
            }

            #[test]
            fn test_distance_never_negative(
                lat1 in -80.0..80.0_f64,
                lon1 in -179.0..179.0_f64,
                lat2 in -80.0..80.0_f64,
                lon2 in -179.0..179.0_f64,
            ) {
                prop_assert!(distance_nm(lat1, lon1, lat2, lon2) >= 0.0);
            }

            #[test]
            fn test_bearing_in_range(
                lat1 in -80.0..80.0_f64,
                lon1 in -179.0..179.0_f64,
                lat2 in -80.0..80.0_f64,
                lon2 in -179.0..179.0_f64,
            ) {
                let b = bearing_deg(lat1, lon1, lat2, lon2);
                prop_assert!((0.0..360.0).contains(&b), "bearing {} out of [0, 360)", b);
            }

            #[test]
            fn test_angle_difference_in_range(
                a in -720.0..720.0_f64,
                b in -720.0..720.0_f64,
            ) {
                let d = angle_difference_deg(a, b);
                prop_assert!((0.0..=180.0).contains(&d), "difference {} out of [0, 180]", d);
            }
        }
    }
}

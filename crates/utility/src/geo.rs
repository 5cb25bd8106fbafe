pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two points given in degrees.
///
/// Coordinates are not range checked. Identical points yield exactly `0.0`.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    // converted before subtracting, so extreme degrees can not overflow
    let lat1_rad = latitude_1.to_radians();
    let lon1_rad = longitude_1.to_radians();
    let lat2_rad = latitude_2.to_radians();
    let lon2_rad = longitude_2.to_radians();

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    // rounding can push `a` just past 1.0 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE_KM: f64 = 0.01;

    #[test]
    fn identical_points_are_zero() {
        for (lat, lng) in [(0.0, 0.0), (54.32, 10.13), (-89.9, 179.9), (91.0, 200.0)] {
            assert_eq!(haversine_distance(lat, lng, lat, lng), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            ((54.3233, 10.1228), (53.5511, 9.9937)),
            ((0.0, 0.0), (0.0, 1.0)),
            ((-33.86, 151.21), (51.51, -0.13)),
        ];
        for ((lat1, lng1), (lat2, lng2)) in pairs {
            let there = haversine_distance(lat1, lng1, lat2, lng2);
            let back = haversine_distance(lat2, lng2, lat1, lng1);
            assert!((there - back).abs() < 1e-9);
        }
    }

    #[test]
    fn quarter_meridian() {
        let distance = haversine_distance(0.0, 0.0, 0.0, 90.0);
        assert!((distance - 10007.54).abs() < TOLERANCE_KM, "{}", distance);
    }

    #[test]
    fn one_degree_on_the_equator() {
        let distance = haversine_distance(0.0, 0.0, 0.0, 1.0);
        assert!((distance - 111.19).abs() < TOLERANCE_KM, "{}", distance);
    }

    #[test]
    fn antipodal_points_are_half_the_circumference() {
        let distance = haversine_distance(0.0, 0.0, 0.0, 180.0);
        assert!(distance.is_finite());
        assert!((distance - 20015.09).abs() < TOLERANCE_KM, "{}", distance);

        let distance = haversine_distance(90.0, 0.0, -90.0, 0.0);
        assert!((distance - 20015.09).abs() < TOLERANCE_KM, "{}", distance);
    }

    #[test]
    fn extreme_finite_inputs_stay_finite() {
        let extremes = [
            (1e308, 0.0, 0.0, 0.0),
            (0.0, f64::MAX, 0.0, f64::MIN),
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
            (-1e300, 1e300, 1e300, -1e300),
        ];
        for (lat1, lng1, lat2, lng2) in extremes {
            let distance = haversine_distance(lat1, lng1, lat2, lng2);
            assert!(distance.is_finite(), "{} for {:?}", distance, (lat1, lng1, lat2, lng2));
            assert!(distance >= 0.0);
            assert!(distance <= 20015.09 + TOLERANCE_KM);
        }
    }
}

use super::types::{CartesianVector, GeodeticPoint};

/// Wrap a longitude in degrees into `(-180, 180]`.
pub fn normalize_longitude(longitude_deg: f64) -> f64 {
    let wrapped = longitude_deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Place a geodetic point on a sphere of the given radius.
///
/// Every scene consumer goes through this one function so the tracked object
/// and the light direction share a basis:
///
/// * latitude 90° maps to `+Y`
/// * latitude 0°, longitude 0° maps to `+X`
/// * latitude 0°, longitude 90° E maps to `-Z`
///
/// The point's own altitude is ignored; `radius` is the full distance from the
/// origin. Longitude may be any real value.
pub fn to_cartesian(point: &GeodeticPoint, radius: f64) -> CartesianVector {
    let lat = point.lat_rad();
    let lon = point.lon_rad();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    CartesianVector {
        x: radius * cos_lat * cos_lon,
        y: radius * sin_lat,
        z: -radius * cos_lat * sin_lon,
    }
}

/// Inverse of [`to_cartesian`]. The returned altitude is the vector's distance
/// from the origin; the origin itself maps to `(0, 0, 0)`.
pub fn from_cartesian(vector: &CartesianVector) -> GeodeticPoint {
    let radius = vector.norm();
    if radius == 0.0 {
        return GeodeticPoint::new(0.0, 0.0, 0.0);
    }

    let latitude = (vector.y / radius).clamp(-1.0, 1.0).asin().to_degrees();
    let longitude = (-vector.z).atan2(vector.x).to_degrees();
    GeodeticPoint::new(latitude, longitude, radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{a} != {b} (tol {tol})");
    }

    fn assert_vec_close(a: CartesianVector, b: CartesianVector, tol: f64) {
        assert!(a.distance(&b) <= tol, "{a:?} != {b:?}");
    }

    #[test]
    fn normalize_longitude_range() {
        assert_eq!(normalize_longitude(0.0), 0.0);
        assert_eq!(normalize_longitude(180.0), 180.0);
        assert_eq!(normalize_longitude(-180.0), 180.0);
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(720.0), 0.0);
        assert_close(normalize_longitude(-359.5), 0.5, 1e-12);
    }

    #[test]
    fn norm_equals_radius() {
        for lat in (-90..=90).step_by(15) {
            for lon in (-180..=180).step_by(20) {
                for radius in [0.5, 1.0, 5.0, 5.2, 50.0] {
                    let p = GeodeticPoint::surface(lat as f64, lon as f64);
                    let v = to_cartesian(&p, radius);
                    assert_close(v.norm(), radius, 1e-9 * radius);
                }
            }
        }
    }

    #[test]
    fn zero_radius_is_origin() {
        let v = to_cartesian(&GeodeticPoint::surface(42.0, -71.0), 0.0);
        assert_eq!(v.norm(), 0.0);
    }

    #[test]
    fn axis_convention() {
        let r = 2.0;
        assert_vec_close(
            to_cartesian(&GeodeticPoint::surface(0.0, 0.0), r),
            CartesianVector::new(r, 0.0, 0.0),
            1e-12,
        );
        assert_vec_close(
            to_cartesian(&GeodeticPoint::surface(90.0, 0.0), r),
            CartesianVector::new(0.0, r, 0.0),
            1e-12,
        );
        assert_vec_close(
            to_cartesian(&GeodeticPoint::surface(0.0, 90.0), r),
            CartesianVector::new(0.0, 0.0, -r),
            1e-12,
        );
        assert_vec_close(
            to_cartesian(&GeodeticPoint::surface(0.0, 180.0), r),
            CartesianVector::new(-r, 0.0, 0.0),
            1e-12,
        );
    }

    #[test]
    fn pole_is_independent_of_longitude() {
        let reference = to_cartesian(&GeodeticPoint::surface(90.0, 0.0), 5.0);
        for lon in (-179..=180).step_by(7) {
            let v = to_cartesian(&GeodeticPoint::surface(90.0, lon as f64), 5.0);
            assert_vec_close(v, reference, 1e-12);
        }
    }

    #[test]
    fn small_perturbations_give_small_changes() {
        let radius = 5.0;
        let step = 1e-6_f64;
        let bound = radius * step.to_radians() * 2.0;
        for lat in [-60.0, -1.0, 0.0, 33.3, 89.0] {
            for lon in [-179.0, -45.0, 0.0, 12.5, 179.0] {
                let base = to_cartesian(&GeodeticPoint::surface(lat, lon), radius);
                let dlat = to_cartesian(&GeodeticPoint::surface(lat + step, lon), radius);
                let dlon = to_cartesian(&GeodeticPoint::surface(lat, lon + step), radius);
                assert!(base.distance(&dlat) <= bound);
                assert!(base.distance(&dlon) <= bound);
            }
        }
    }

    #[test]
    fn antimeridian_wrap_is_continuous() {
        let east = to_cartesian(&GeodeticPoint::surface(10.0, 179.9999), 5.0);
        let west = to_cartesian(&GeodeticPoint::surface(10.0, -179.9999), 5.0);
        assert!(east.distance(&west) < 1e-4);
    }

    #[test]
    fn from_cartesian_inverts() {
        for (lat, lon) in [(0.0, 0.0), (45.0, 90.0), (-30.0, -120.0), (12.0, 180.0)] {
            let v = to_cartesian(&GeodeticPoint::surface(lat, lon), 5.2);
            let p = from_cartesian(&v);
            assert_close(p.latitude_deg(), lat, 1e-9);
            assert_close(p.longitude_deg(), lon, 1e-9);
            assert_close(p.altitude(), 5.2, 1e-9);
        }
        assert_eq!(
            from_cartesian(&CartesianVector::ORIGIN),
            GeodeticPoint::new(0.0, 0.0, 0.0)
        );
    }
}

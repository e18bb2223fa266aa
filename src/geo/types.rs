use serde::Serialize;
use utoipa::ToSchema;

use super::transform::normalize_longitude;

/// Latitude/longitude/altitude relative to the model body.
///
/// Latitude is clamped into `[-90, 90]`, longitude is normalised into
/// `(-180, 180]` and altitude is floored at zero. Altitude is in scene units,
/// not kilometres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GeodeticPoint {
    latitude_deg: f64,
    longitude_deg: f64,
    altitude: f64,
}

impl GeodeticPoint {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude: f64) -> Self {
        Self {
            latitude_deg: latitude_deg.clamp(-90.0, 90.0),
            longitude_deg: normalize_longitude(longitude_deg),
            altitude: altitude.max(0.0),
        }
    }

    /// A point on the surface (altitude zero).
    pub fn surface(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self::new(latitude_deg, longitude_deg, 0.0)
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude_deg
    }

    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }
}

/// Position in scene space. `+Y` is up (north pole), `+X` points at
/// latitude 0 / longitude 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, ToSchema)]
pub struct CartesianVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianVector {
    pub const ORIGIN: CartesianVector = CartesianVector {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(&self, other: &CartesianVector) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Unit vector in the same direction. The origin stays at the origin.
    pub fn normalized(&self) -> Self {
        let n = self.norm();
        if n > 0.0 {
            Self::new(self.x / n, self.y / n, self.z / n)
        } else {
            Self::ORIGIN
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

mod transform;
mod types;

pub use transform::{from_cartesian, normalize_longitude, to_cartesian};
pub use types::{CartesianVector, GeodeticPoint};

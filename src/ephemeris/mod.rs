mod solar;

pub use solar::{
    declination_deg, sub_solar_point, subsolar_longitude_deg, AXIAL_TILT_DEG,
    SOLSTICE_PHASE_OFFSET_DAYS,
};

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::geo::{normalize_longitude, GeodeticPoint};

/// Amplitude of the declination curve.
pub const AXIAL_TILT_DEG: f64 = 23.45;
/// Shifts the cosine so its minimum lands on the December solstice
/// with a Jan-1 = 1 day count.
pub const SOLSTICE_PHASE_OFFSET_DAYS: f64 = 10.0;

const DAYS_PER_YEAR: f64 = 365.0;
const DEGREES_PER_HOUR: f64 = 15.0;
const SOLAR_NOON_UTC_HOURS: f64 = 12.0;

/// Approximate point where the sun is overhead at `at`.
///
/// Declination comes from a cosine fit over the day of year, longitude from
/// UTC time of day alone (no equation of time, so up to ~16 minutes off).
/// The result is directional; its altitude is zero.
pub fn sub_solar_point(at: DateTime<Utc>) -> GeodeticPoint {
    let declination = declination_deg(at.ordinal());
    let longitude = subsolar_longitude_deg(utc_hours(&at));
    GeodeticPoint::surface(declination, longitude)
}

/// Sun declination for a 1-based day of year.
pub fn declination_deg(day_of_year: u32) -> f64 {
    let phase = (360.0 / DAYS_PER_YEAR) * (day_of_year as f64 + SOLSTICE_PHASE_OFFSET_DAYS);
    -AXIAL_TILT_DEG * phase.to_radians().cos()
}

/// Longitude of the sub-solar meridian: 0° at 12:00 UTC, moving 15°/h west.
pub fn subsolar_longitude_deg(utc_hours: f64) -> f64 {
    normalize_longitude((SOLAR_NOON_UTC_HOURS - utc_hours) * DEGREES_PER_HOUR)
}

fn utc_hours(at: &DateTime<Utc>) -> f64 {
    let seconds = at.num_seconds_from_midnight() as f64;
    // leap seconds report nanoseconds >= 1e9; keep them inside the same second
    let fraction = (at.nanosecond() % 1_000_000_000) as f64 / 1e9;
    (seconds + fraction) / 3600.0
}

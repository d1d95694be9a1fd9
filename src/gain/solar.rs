//! Solar geometry.

use std::f32::consts::TAU;

/// Amplitude of the seasonal declination cycle, in degrees.
const OBLIQUITY: f32 = 23.4417;

/// Length of the year used by the declination model, in days.
const DAYS_PER_YEAR: f32 = 365.0;

/// Declination of the sun (the latitude of the subsolar point) in degrees.
///
/// `doy` is the day of year with Jan 1 = 1, and may be fractional. The
/// eccentricity of the Earth's orbit is ignored, so the error is on the order
/// of a degree.
pub fn declination(doy: f32) -> f32 {
    -OBLIQUITY * f32::cos(TAU * (doy + 10.0) / DAYS_PER_YEAR)
}

//! Solar incidence angle at the time the satellite passes over the target.

use std::f32::consts::PI;

use log::debug;

use super::{orbit::OrbitParameters, solar::declination, Node};
use crate::error::GainError;

/// Cosine of the solar incidence angle (measured from vertical).
///
/// For a day of year `doy`, target latitude `lat` in degrees, and the `node`
/// on which the target is imaged, find the local time at which the orbit
/// crosses `lat` and compute the incidence angle of the sun at that time.
/// The result is negative when the sun is below the horizon.
pub fn cos_incidence(
    doy: f32,
    lat: f32,
    node: Node,
    orbit: &OrbitParameters,
) -> Result<f32, GainError> {
    let crossing = orbit.crossing(node, lat).ok_or_else(|| {
        debug!("latitude {lat} is outside the orbit's reach");
        GainError::UnreachableLatitude(lat)
    })?;

    let dec = declination(doy).to_radians();
    let rad_lat = lat.to_radians();
    let time_angle = PI * (crossing.local_time / 12.0 - 1.0);

    Ok(dec.cos() * rad_lat.cos() * time_angle.cos() + dec.sin() * rad_lat.sin())
}

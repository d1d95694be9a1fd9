//! Gains for GLIMS Science Team Acquisition Requests (STARs).
//!
//! A STAR row carries the acquisition window as two date fields and the
//! target outline as corner points. The gains for the three VNIR bands are
//! chosen for the middle of the window at the mean latitude of the corners,
//! and recorded in the STAR gain coding.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use log::debug;
use smallvec::SmallVec;

use crate::error::GainError;
use crate::gain::{orbit::OrbitParameters, select_gain, Band, GainResult, Node};

/// How far a gain number is pushed toward the lower gains before it's
/// truncated, to stay clear of saturation.
const SATURATION_ADJUSTMENT: f32 = 0.2;

/// Gain setting as coded in a STAR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StarGain {
    /// Low gain
    Low = 1,
    /// Normal gain
    Normal = 3,
    /// High gain
    High = 4,
}

impl StarGain {
    /// The numeric STAR code.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// STAR gain for a selected gain.
///
/// Anything within [`SATURATION_ADJUSTMENT`] of the top of a level is bumped
/// to the next lower gain. Dark scenes get high gain and bright ones low gain.
pub fn star_gain(result: &GainResult) -> StarGain {
    match (result.gain_number() + SATURATION_ADJUSTMENT) as u8 {
        0 | 1 => StarGain::High,
        2 => StarGain::Normal,
        _ => StarGain::Low,
    }
}

/// Parse a STAR date field such as `07/05/2023 00:00:00`. The time of day is
/// dropped.
pub fn parse_date_field(field: &str) -> Result<NaiveDate, GainError> {
    NaiveDateTime::parse_from_str(field.trim(), "%m/%d/%Y %H:%M:%S")
        .map(|datetime| datetime.date())
        .map_err(|_| GainError::InvalidDate(field.to_string()))
}

/// Day of year of the date halfway between `start` and `end`, rounding down
/// to a whole day.
pub fn mid_day_of_year(start: NaiveDate, end: NaiveDate) -> u32 {
    let half = (end - start).num_days().div_euclid(2);
    (start + TimeDelta::days(half)).ordinal()
}

/// Latitude in degrees of a corner point.
///
/// Points are written as `lon_deg lon_min'lon_sec" lat_deg lat_min'lat_sec"`,
/// e.g. `-139 47'49.19"  61 17'07.08"`. Minutes and seconds are added to the
/// degrees whatever their sign.
pub fn parse_point(point: &str) -> Result<f64, GainError> {
    let invalid = || GainError::InvalidPoint(point.to_string());

    let mut fields = point.split_whitespace();
    let (Some(_lon_deg), Some(_lon_ms), Some(lat_deg), Some(lat_ms), None) = (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) else {
        return Err(invalid());
    };

    let (lat_min, lat_sec) = lat_ms.split_once('\'').ok_or_else(invalid)?;
    let lat_sec = lat_sec.trim_matches('"');

    let parse = |s: &str| s.parse::<f64>().map_err(|_| invalid());
    Ok(parse(lat_deg)? + parse(lat_min)? / 60.0 + parse(lat_sec)? / 3600.0)
}

/// Mean latitude of the corner points, up to the first empty one.
pub fn average_latitude<S: AsRef<str>>(points: &[S]) -> Result<f64, GainError> {
    let lats: SmallVec<[f64; 8]> = points
        .iter()
        .map(|point| -> &str { point.as_ref() })
        .take_while(|point| !point.is_empty())
        .map(parse_point)
        .collect::<Result<_, _>>()?;

    if lats.is_empty() {
        return Err(GainError::InvalidPoint(String::new()));
    }
    Ok(lats.iter().sum::<f64>() / lats.len() as f64)
}

/// STAR gains for VNIR bands 1, 2, and 3 of a request.
///
/// `start` and `end` are the date fields of the acquisition window and
/// `points` the corner points of the target.
pub fn request_gains<S: AsRef<str>>(
    start: &str,
    end: &str,
    points: &[S],
    orbit: &OrbitParameters,
) -> Result<[StarGain; 3], GainError> {
    let doy = mid_day_of_year(parse_date_field(start)?, parse_date_field(end)?);
    let lat = average_latitude(points)? as f32;
    debug!("STAR window centred on day {doy}, mean latitude {lat}");

    let mut gains = [StarGain::Normal; 3];
    for (gain, band) in gains.iter_mut().zip(&Band::ALL[..3]) {
        let result = select_gain(doy as f32, lat, *band, Node::Descending, orbit)?;
        *gain = star_gain(&result);
    }
    Ok(gains)
}

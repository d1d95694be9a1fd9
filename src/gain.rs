//! ASTER gain selection for snow and ice targets.
//!
//! The reflected radiance from the ground is modelled as
//!
//! L = S r P / π
//!
//! where `S` is the band-integrated solar irradiance (W/m²/µm), `r` the
//! ground reflectance in the band, and `P` a phase function of the solar
//! incidence angle, look angle, and sun/observer azimuth. The surface is taken
//! to be Lambertian, so `P = cos(i)`. See Raup, "Calculation of ASTER Gain
//! Settings for the GLIMS Project".

pub mod bands;
pub mod incidence;
pub mod orbit;
pub mod solar;

#[cfg(test)]
mod tests;

use std::f32::consts::PI;

use self::{
    bands::{constants, NUM_GAIN_LEVELS},
    incidence::cos_incidence,
    orbit::OrbitParameters,
};
use crate::error::GainError;

/// An ASTER VNIR or SWIR band, numbered 1 through 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Band(u8);

impl Band {
    /// All of the bands, in order.
    pub const ALL: [Band; 9] = [
        Band(1),
        Band(2),
        Band(3),
        Band(4),
        Band(5),
        Band(6),
        Band(7),
        Band(8),
        Band(9),
    ];

    /// Validate a band number.
    pub fn new(band: i64) -> Result<Self, GainError> {
        match band {
            1..=9 => Ok(Self(band as u8)),
            _ => Err(GainError::InvalidBand(band)),
        }
    }

    /// The band number.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Band {
    type Error = GainError;

    fn try_from(band: i64) -> Result<Self, Self::Error> {
        Self::new(band)
    }
}

/// Which half of the orbit images the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    /// Northbound, crossing the equator at the ascending node
    Ascending,
    /// Southbound. ASTER daytime scenes are all descending.
    Descending,
}

impl Node {
    /// The +1/-1 encoding of the node.
    pub fn sign(self) -> i8 {
        match self {
            Node::Ascending => 1,
            Node::Descending => -1,
        }
    }
}

impl TryFrom<i64> for Node {
    type Error = GainError;

    fn try_from(node: i64) -> Result<Self, Self::Error> {
        match node {
            1 => Ok(Node::Ascending),
            -1 => Ok(Node::Descending),
            _ => Err(GainError::InvalidNode(node)),
        }
    }
}

/// A gain setting, from most to least sensitive, plus the two cases where no
/// finite setting applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum GainLevel {
    /// High gain
    High = 0,
    /// Normal gain
    Normal = 1,
    /// Low gain 1
    Low1 = 2,
    /// Low gain 2
    Low2 = 3,
    /// Saturated at every gain setting
    Bright = 4,
    /// No reflected sunlight
    Dark = 5,
}

impl GainLevel {
    /// Index of the level: 0 to 3 for the gain ladder, 4 for bright, 5 for
    /// dark.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Short name of the level.
    pub fn label(self) -> &'static str {
        match self {
            GainLevel::High => "high",
            GainLevel::Normal => "norm",
            GainLevel::Low1 => "low1",
            GainLevel::Low2 => "low2",
            GainLevel::Bright => "bright",
            GainLevel::Dark => "dark",
        }
    }

    /// Level for a position in a band's gain ladder.
    fn from_ladder_index(index: usize) -> Self {
        match index {
            0 => GainLevel::High,
            1 => GainLevel::Normal,
            2 => GainLevel::Low1,
            _ => GainLevel::Low2,
        }
    }
}

impl TryFrom<u8> for GainLevel {
    type Error = u8;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(GainLevel::High),
            1 => Ok(GainLevel::Normal),
            2 => Ok(GainLevel::Low1),
            3 => Ok(GainLevel::Low2),
            4 => Ok(GainLevel::Bright),
            5 => Ok(GainLevel::Dark),
            _ => Err(index),
        }
    }
}

/// The selected gain and how close the scene gets to saturating it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainResult {
    /// Selected gain level.
    pub level: GainLevel,
    /// Radiance as a fraction of the saturation radiance at `level`, in
    /// [0, 1). Always 0 for [`GainLevel::Bright`] and [`GainLevel::Dark`].
    pub fraction: f32,
}

impl GainResult {
    /// Level and fraction packed into one number, the way the GLIMS gain
    /// service reports it: 0 for dark, 1.x to 4.x for high to low2 at x
    /// saturation, and 5 for bright.
    pub fn gain_number(&self) -> f32 {
        match self.level {
            GainLevel::Dark => 0.0,
            GainLevel::Bright => 5.0,
            level => f32::from(level.index() + 1) + self.fraction,
        }
    }
}

impl std::fmt::Display for GainResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} gain at {:.2}% saturation",
            self.level.label(),
            100.0 * self.fraction
        )
    }
}

/// Recommended gain for imaging snow in `band` on day of year `doy` at
/// latitude `lat` (degrees), on the given `node` of `orbit`.
pub fn select_gain(
    doy: f32,
    lat: f32,
    band: Band,
    node: Node,
    orbit: &OrbitParameters,
) -> Result<GainResult, GainError> {
    let band_constants = constants(band);

    // No sunlight reaches the surface with the sun below the horizon
    let cosi = cos_incidence(doy, lat, node, orbit)?.max(0.0);
    let radiance =
        band_constants.solar_irradiance * band_constants.snow_reflectance * cosi / PI;

    Ok(select_level(
        radiance,
        band_constants.saturation_radiance,
        &band_constants.gain_ladder,
    ))
}

/// Like [`select_gain`], but with an unvalidated band number.
pub fn select_gain_raw(
    doy: f32,
    lat: f32,
    band: i64,
    node: Node,
    orbit: &OrbitParameters,
) -> Result<GainResult, GainError> {
    select_gain(doy, lat, Band::new(band)?, node, orbit)
}

/// Pick the most sensitive gain in `ladder` that doesn't saturate at
/// `radiance`.
///
/// The saturation limit of each setting is `saturation / gain`; the radiance
/// has to be strictly below it. Zero radiance is always dark, whatever the
/// ladder says.
pub fn select_level(radiance: f32, saturation: f32, ladder: &[f32; NUM_GAIN_LEVELS]) -> GainResult {
    let found = ladder
        .iter()
        .map(|&gain| saturation / gain)
        .enumerate()
        .find(|&(_, limit)| radiance < limit);

    match found {
        None => GainResult {
            level: GainLevel::Bright,
            fraction: 0.0,
        },
        Some(_) if radiance == 0.0 => GainResult {
            level: GainLevel::Dark,
            fraction: 0.0,
        },
        Some((index, limit)) => GainResult {
            level: GainLevel::from_ladder_index(index),
            fraction: radiance / limit,
        },
    }
}

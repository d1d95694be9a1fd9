//! Physical constants of the ASTER VNIR and SWIR bands.

use super::Band;

/// Number of gain settings per band.
pub const NUM_GAIN_LEVELS: usize = 4;

/// Constants for a single band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandConstants {
    /// Solar irradiance integrated over the band, in W/m²/µm.
    pub solar_irradiance: f32,
    /// Reflectance of snow in the band (unitless).
    pub snow_reflectance: f32,
    /// Saturation radiance at unit gain, in W/m²/sr/µm.
    pub saturation_radiance: f32,
    /// Gain settings from most to least sensitive. A negative entry marks a
    /// setting the band doesn't have.
    pub gain_ladder: [f32; NUM_GAIN_LEVELS],
}

/// Per-band constants, for bands 1 through 9.
///
/// Saturation radiances are from page 9 of the ASTER Level-1 Data Processing
/// ATBD (v3.0), snow reflectances are read off Steve Warren's graphs.
#[rustfmt::skip]
const BANDS: [BandConstants; 9] = [
    // Band 1 really does start at 2.5
    BandConstants { solar_irradiance: 1845.78, snow_reflectance: 0.95, saturation_radiance: 427.0, gain_ladder: [2.5, 1.0, 0.75, -1.0] },
    BandConstants { solar_irradiance: 1555.93, snow_reflectance: 0.88, saturation_radiance: 358.0, gain_ladder: [2.0, 1.0, 0.75, -1.0] },
    BandConstants { solar_irradiance: 1108.27, snow_reflectance: 0.75, saturation_radiance: 218.0, gain_ladder: [2.0, 1.0, 0.75, -1.0] },
    BandConstants { solar_irradiance: 232.855, snow_reflectance: 0.15, saturation_radiance: 55.0,  gain_ladder: [2.0, 1.0, 0.75, 0.75] },
    BandConstants { solar_irradiance: 80.0975, snow_reflectance: 0.10, saturation_radiance: 17.6,  gain_ladder: [2.0, 1.0, 0.75, 0.17] },
    BandConstants { solar_irradiance: 74.58,   snow_reflectance: 0.20, saturation_radiance: 15.8,  gain_ladder: [2.0, 1.0, 0.75, 0.16] },
    BandConstants { solar_irradiance: 68.5710, snow_reflectance: 0.30, saturation_radiance: 15.1,  gain_ladder: [2.0, 1.0, 0.75, 0.18] },
    BandConstants { solar_irradiance: 59.9514, snow_reflectance: 0.20, saturation_radiance: 10.55, gain_ladder: [2.0, 1.0, 0.75, 0.17] },
    BandConstants { solar_irradiance: 57.2850, snow_reflectance: 0.15, saturation_radiance: 8.04,  gain_ladder: [2.0, 1.0, 0.75, 0.12] },
];

/// Look up the constants for a band.
pub fn constants(band: Band) -> &'static BandConstants {
    &BANDS[usize::from(band.get() - 1)]
}

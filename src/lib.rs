//! Recommended ASTER gain settings for imaging snow and ice.
//!
//! The gain for a band is the most sensitive setting that won't saturate on
//! sunlit snow, given where the sun is when the satellite passes over the
//! target. Single targets go through [`gain::select_gain`], many at once
//! through [`batch::compute_gains`], and GLIMS acquisition requests through
//! [`star::request_gains`].
//!
//! With the `python` feature the crate also builds the `aster_gain` Python
//! extension module.

pub mod batch;
pub mod error;
pub mod gain;
pub mod star;

#[cfg(feature = "python")]
mod python;

pub use error::GainError;
pub use gain::{orbit::OrbitParameters, select_gain, Band, GainLevel, GainResult, Node};

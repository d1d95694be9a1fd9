//! Gain selection for many targets and bands at once.

use std::{
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::Duration,
};

use log::{debug, info};
use ndarray::{Array2, ArrayView1, Axis};
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::error::GainError;
use crate::gain::{orbit::OrbitParameters, select_gain, Band, Node};

/// Inputs that are the same for every target.
#[derive(Debug, Clone)]
pub struct GainParameters {
    /// Bands to select gains for, with a length of `num_bands`.
    bands: SmallVec<[Band; 9]>,
    /// Node the targets are imaged on.
    node: Node,
    /// The satellite's orbit.
    orbit: OrbitParameters,
}

/// Gains for a single target, as a function of band index.
#[derive(Debug)]
pub struct GainOutputs {
    /// Gain level index (see [`crate::gain::GainLevel::index`]).
    pub level: SmallVec<[u8; 9]>,
    /// Fraction of saturation at the selected level.
    pub fraction: SmallVec<[f32; 9]>,
    /// Combined level and fraction (see [`crate::gain::GainResult::gain_number`]).
    pub gain_number: SmallVec<[f32; 9]>,
}

/// Gains for all targets, each dimensioned as (`num_points`, `num_bands`).
#[derive(Debug)]
pub struct GainArrays {
    /// Gain level index.
    pub level: Array2<u8>,
    /// Fraction of saturation at the selected level.
    pub fraction: Array2<f32>,
    /// Combined level and fraction.
    pub gain_number: Array2<f32>,
}

impl GainParameters {
    /// Validate the band numbers. At least one band is needed.
    pub fn new(bands: &[i64], node: Node, orbit: OrbitParameters) -> Result<Self, GainError> {
        if bands.is_empty() {
            return Err(GainError::InconsistentInputs);
        }
        Ok(Self {
            bands: bands
                .iter()
                .map(|&band| Band::new(band))
                .collect::<Result<_, _>>()?,
            node,
            orbit,
        })
    }

    /// Number of bands per target.
    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    /// Select the gains of every band for one target.
    pub fn run(&self, doy: f32, lat: f32) -> Result<GainOutputs, GainError> {
        let mut level = SmallVec::new();
        let mut fraction = SmallVec::new();
        let mut gain_number = SmallVec::new();

        for &band in &self.bands {
            let result = select_gain(doy, lat, band, self.node, &self.orbit)?;
            level.push(result.level.index());
            fraction.push(result.fraction);
            gain_number.push(result.gain_number());
        }

        Ok(GainOutputs {
            level,
            fraction,
            gain_number,
        })
    }
}

impl GainArrays {
    fn new(num_points: usize, num_bands: usize) -> Self {
        Self {
            level: Array2::zeros([num_points, num_bands]),
            fraction: Array2::zeros([num_points, num_bands]),
            gain_number: Array2::zeros([num_points, num_bands]),
        }
    }
}

/// Select gains for targets at day of year `doy` and latitude `lat` (both with
/// length `num_points`).
///
/// The work is split over a thread pool with `num_threads` workers, or an
/// automatic number if `None`. Meanwhile the calling thread reports progress
/// every `poll_interval` and calls `poll`; if that returns an error the
/// remaining targets are skipped and the error is returned.
///
/// If any target fails (e.g., an unreachable latitude), so does the batch.
pub fn compute_gains<E, P>(
    doy: &[f32],
    lat: &[f32],
    parameters: &GainParameters,
    num_threads: Option<usize>,
    poll_interval: Duration,
    mut poll: P,
) -> Result<GainArrays, E>
where
    E: From<GainError>,
    P: FnMut() -> Result<(), E>,
{
    let num_points = doy.len();
    if lat.len() != num_points {
        return Err(GainError::InconsistentInputs.into());
    }
    debug!("input shapes are consistent");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads.unwrap_or(0))
        .build()
        .map_err(|e| GainError::ThreadPool(e.to_string()))?;

    let mut results = Vec::new();

    // These atomics keep track of how many points have finished and whether
    // it's time to cancel the computation or not
    let num_completed = AtomicUsize::new(0);
    let cancelled = AtomicBool::new(false);

    info!(
        "Selecting gains for {num_points} targets and {} bands",
        parameters.num_bands()
    );

    pool.in_place_scope(|s| -> Result<(), E> {
        s.spawn(|_| {
            doy.par_iter()
                .zip(lat)
                .map(|(&doy, &lat)| -> Result<_, GainError> {
                    if cancelled.load(Ordering::Relaxed) {
                        return Err(GainError::Cancelled);
                    }
                    parameters.run(doy, lat).map_err(|e| {
                        // One failure sinks the batch, so don't bother with the rest
                        cancelled.store(true, Ordering::Relaxed);
                        e
                    })
                })
                .inspect(|_| {
                    num_completed.fetch_add(1, Ordering::Relaxed);
                })
                .collect_into_vec(&mut results);
        });

        // The work is done in the thread pool, but back here in the calling
        // thread, handle progress reporting and checking for early
        // cancellation
        while !cancelled.load(Ordering::Relaxed) {
            if let Err(e) = poll() {
                cancelled.store(true, Ordering::Relaxed);
                return Err(e);
            }

            let num_completed = num_completed.load(Ordering::Relaxed);
            if num_points > 0 {
                let progress = num_completed as f32 / num_points as f32 * 100.;
                info!("Selected gains for {num_completed}/{num_points} targets ({progress:0.2}%)");
            }

            // All finished without cancelling early
            if num_completed == num_points {
                break;
            }

            std::thread::sleep(poll_interval);
        }

        Ok(())
    })?;

    // Report the failure that caused any cancellation, not the cancellations
    if let Some(e) = results
        .iter()
        .filter_map(|result| result.as_ref().err())
        .find(|&e| *e != GainError::Cancelled)
    {
        return Err(e.clone().into());
    }

    // Copy the intermediate results to the output arrays
    debug!("copying gain output");
    let mut output = GainArrays::new(num_points, parameters.num_bands());
    results
        .into_iter()
        .enumerate()
        .try_for_each(|(index, gain_output)| -> Result<_, GainError> {
            let GainOutputs {
                level,
                fraction,
                gain_number,
            } = gain_output?;

            let rhs = ArrayView1::from(level.as_slice());
            output.level.index_axis_mut(Axis(0), index).assign(&rhs);

            let rhs = ArrayView1::from(fraction.as_slice());
            output.fraction.index_axis_mut(Axis(0), index).assign(&rhs);

            let rhs = ArrayView1::from(gain_number.as_slice());
            output.gain_number.index_axis_mut(Axis(0), index).assign(&rhs);

            Ok(())
        })?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gain::{select_gain_raw, GainLevel};
    use approx::assert_abs_diff_eq;

    fn no_poll() -> Result<(), GainError> {
        Ok(())
    }

    #[test]
    fn matches_single_selections() {
        let orbit = OrbitParameters::new(21.667);
        let parameters = GainParameters::new(&[1, 2, 3], Node::Descending, orbit).unwrap();
        let doy: Vec<f32> = (0..50).map(|i| 1.0 + 7.3 * i as f32).collect();
        let lat: Vec<f32> = (0..50).map(|i| -75.0 + 3.0 * i as f32).collect();

        let output = compute_gains(
            &doy,
            &lat,
            &parameters,
            Some(2),
            Duration::from_millis(1),
            no_poll,
        )
        .unwrap();
        assert_eq!(output.level.dim(), (50, 3));

        for (point, (&doy, &lat)) in doy.iter().zip(&lat).enumerate() {
            for (band_index, band) in [1, 2, 3].into_iter().enumerate() {
                let expected =
                    select_gain_raw(doy, lat, band, Node::Descending, &orbit).unwrap();
                assert_eq!(output.level[[point, band_index]], expected.level.index());
                assert_abs_diff_eq!(output.fraction[[point, band_index]], expected.fraction);
                assert_abs_diff_eq!(
                    output.gain_number[[point, band_index]],
                    expected.gain_number()
                );
            }
        }
    }

    #[test]
    fn empty_batch() {
        let parameters =
            GainParameters::new(&[4], Node::Descending, OrbitParameters::default()).unwrap();
        let output =
            compute_gains(&[], &[], &parameters, None, Duration::from_millis(1), no_poll).unwrap();
        assert_eq!(output.level.dim(), (0, 1));
    }

    #[test]
    fn mismatched_lengths() {
        let parameters =
            GainParameters::new(&[4], Node::Descending, OrbitParameters::default()).unwrap();
        let output = compute_gains(
            &[1.0, 2.0],
            &[0.0],
            &parameters,
            None,
            Duration::from_millis(1),
            no_poll,
        );
        assert_eq!(output.unwrap_err(), GainError::InconsistentInputs);
    }

    #[test]
    fn bad_parameters() {
        let orbit = OrbitParameters::default();
        assert_eq!(
            GainParameters::new(&[], Node::Descending, orbit).unwrap_err(),
            GainError::InconsistentInputs
        );
        assert_eq!(
            GainParameters::new(&[1, 10], Node::Descending, orbit).unwrap_err(),
            GainError::InvalidBand(10)
        );
    }

    #[test]
    fn one_bad_latitude_fails_the_batch() {
        let parameters =
            GainParameters::new(&[1], Node::Descending, OrbitParameters::default()).unwrap();
        let doy = vec![100.0; 20];
        let mut lat = vec![30.0; 20];
        lat[13] = 88.0;

        let output = compute_gains(
            &doy,
            &lat,
            &parameters,
            Some(4),
            Duration::from_millis(1),
            no_poll,
        );
        assert_eq!(output.unwrap_err(), GainError::UnreachableLatitude(88.0));
    }

    #[test]
    fn poll_error_cancels() {
        let parameters =
            GainParameters::new(&[1, 2, 3], Node::Descending, OrbitParameters::default())
                .unwrap();
        let doy = vec![100.0; 1000];
        let lat = vec![30.0; 1000];

        let output = compute_gains(
            &doy,
            &lat,
            &parameters,
            Some(1),
            Duration::from_millis(1),
            || Err(GainError::Cancelled),
        );
        assert_eq!(output.unwrap_err(), GainError::Cancelled);
    }

    #[test]
    fn dark_targets() {
        let parameters =
            GainParameters::new(&[1, 9], Node::Descending, OrbitParameters::default()).unwrap();
        let output = compute_gains(
            &[180.0],
            &[-80.0],
            &parameters,
            None,
            Duration::from_millis(1),
            no_poll,
        )
        .unwrap();
        assert!(output
            .level
            .iter()
            .all(|&level| level == GainLevel::Dark.index()));
        assert!(output.gain_number.iter().all(|&number| number == 0.0));
    }
}

//! Python bindings.
//!
//! NOTE: this module is only the interface between Rust and Python. The real
//! work happens in the other modules, and they do not use `pyo3`, it's only
//! used here.

use std::time::Duration;

use log::debug;
use numpy::{PyArray2, PyReadonlyArray1, ToPyArray};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::batch::{self, GainArrays, GainParameters};
use crate::error::GainError;
use crate::gain::{
    self,
    orbit::{OrbitParameters, LEGACY_ASCENDING_NODE_TIME},
    Node,
};
use crate::star;

/// How often the batch checks for Ctrl-C and logs progress.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

impl From<GainError> for PyErr {
    fn from(e: GainError) -> Self {
        PyValueError::new_err(e.to_string())
    }
}

/// Gains for many targets.
///
/// This is just a container of multiple numpy arrays, each dimensioned as
/// (`num_points`, `num_bands`).
#[pyclass(name = "GainOutputs")]
struct PyGainArrays(GainArrays);

/// Implement all the "getters" for the Python properties
#[pymethods]
impl PyGainArrays {
    #[getter]
    fn level<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<u8>> {
        self.0.level.to_pyarray(py)
    }

    #[getter]
    fn fraction<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f32>> {
        self.0.fraction.to_pyarray(py)
    }

    #[getter]
    fn gain_number<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f32>> {
        self.0.gain_number.to_pyarray(py)
    }
}

/// Recommended gain for a single target.
///
/// `doy` is the day of year, `lat` the target latitude in degrees, `band` the
/// ASTER band (1 to 9), `ascending_node_time` the local time of the ascending
/// node crossing in hours, and `node` +1 for ascending or -1 for descending.
///
/// Returns the tuple (`level`, `fraction`, `gain_number`, `description`).
#[pyfunction]
#[pyo3(signature = (doy, lat, band, ascending_node_time=LEGACY_ASCENDING_NODE_TIME, node=-1))]
fn select_gain(
    doy: f32,
    lat: f32,
    band: i64,
    ascending_node_time: f32,
    node: i64,
) -> PyResult<(u8, f32, f32, String)> {
    let orbit = OrbitParameters::new(ascending_node_time);
    let result = gain::select_gain_raw(doy, lat, band, Node::try_from(node)?, &orbit)?;
    Ok((
        result.level.index(),
        result.fraction,
        result.gain_number(),
        result.to_string(),
    ))
}

/// Recommended gains for many targets.
///
/// `doy` and `lat` are 1d arrays of shape (`num_points`, ) with the day of
/// year and latitude (degrees) of each target. `bands` is a list of
/// `num_bands` ASTER bands.
///
/// The returned outputs are each dimensioned as (`num_points`, `num_bands`).
///
/// The number of worker threads is controlled by `num_threads`. It must be a
/// positive integer, or `None` to automatically choose the number of threads.
#[pyfunction]
#[pyo3(signature = (doy, lat, bands, ascending_node_time=LEGACY_ASCENDING_NODE_TIME, node=-1, num_threads=None))]
fn compute_gains(
    py: Python<'_>,
    doy: PyReadonlyArray1<'_, f32>,
    lat: PyReadonlyArray1<'_, f32>,
    bands: Vec<i64>,
    ascending_node_time: f32,
    node: i64,
    num_threads: Option<usize>,
) -> PyResult<PyGainArrays> {
    let parameters = GainParameters::new(
        &bands,
        Node::try_from(node)?,
        OrbitParameters::new(ascending_node_time),
    )?;

    // Ensure everything is contiguous
    let doy = doy.as_slice()?;
    let lat = lat.as_slice()?;

    let output = py.allow_threads(|| {
        batch::compute_gains(
            doy,
            lat,
            &parameters,
            num_threads,
            POLL_INTERVAL,
            || Python::with_gil(|py| py.check_signals()),
        )
    })?;
    debug!("batch finished");

    Ok(PyGainArrays(output))
}

/// STAR gain codes for VNIR bands 1, 2, and 3.
///
/// `start` and `end` are the STAR date fields (`MM/DD/YYYY HH:MM:SS`) of the
/// acquisition window and `points` the target's corner points.
#[pyfunction]
#[pyo3(signature = (start, end, points, ascending_node_time=LEGACY_ASCENDING_NODE_TIME))]
fn star_gains(
    start: &str,
    end: &str,
    points: Vec<String>,
    ascending_node_time: f32,
) -> PyResult<Vec<u8>> {
    let orbit = OrbitParameters::new(ascending_node_time);
    let gains = star::request_gains(start, end, &points, &orbit)?;
    Ok(gains.iter().map(|gain| gain.code()).collect())
}

/// A Python module implemented in Rust.
#[pymodule]
fn aster_gain(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_function(wrap_pyfunction!(select_gain, m)?)?;
    m.add_function(wrap_pyfunction!(compute_gains, m)?)?;
    m.add_function(wrap_pyfunction!(star_gains, m)?)?;
    m.add_class::<PyGainArrays>()?;
    Ok(())
}

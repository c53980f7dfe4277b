use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::PartListConfig;
use crate::core::{BoundingBox, FiducialVolume, Origin, PartList, SimParticle, TrajectoryPoint};

/// Columns of a trajectory array: x, y, z, t, px, py, pz, E.
const TRAJ_COLS: usize = 8;

type Extent = (f64, f64, f64);
type PyParticle<'py> = (u32, i32, u32, Vec<u32>, String, PyReadonlyArray2<'py, f64>);

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn trajectory_from_array(arr: &PyReadonlyArray2<'_, f64>) -> PyResult<Vec<TrajectoryPoint>> {
    let view = arr.as_array();
    if view.shape()[1] != TRAJ_COLS {
        return Err(py_err(format!(
            "trajectory must have shape (N, {}), got {:?}",
            TRAJ_COLS,
            view.shape()
        )));
    }
    Ok(view
        .rows()
        .into_iter()
        .map(|r| TrajectoryPoint::new([r[0], r[1], r[2], r[3]], [r[4], r[5], r[6], r[7]]))
        .collect())
}

/// Python-facing wrapper around the Rust particle list.
///
/// API:
/// - PartList(sub_volumes, save_path_pdg_list=None)
///   sub_volumes = [((xmin, ymin, zmin), (xmax, ymax, zmax)), ...]
/// - ingest(particles, origins)
///   particles = [(track_id, pdg, mother, daughters, process, trajectory), ...]
/// - mother_track_id(pos), ancestor_track_id(pos), in_detector(x, y, z)
/// - detector_path(pos) -> np.ndarray of shape (N, 8) or None
#[pyclass(name = "PartList")]
pub struct PyPartList {
    inner: PartList,
}

#[pymethods]
impl PyPartList {
    #[new]
    #[pyo3(signature = (sub_volumes, save_path_pdg_list=None))]
    fn new(
        sub_volumes: Vec<(Extent, Extent)>,
        save_path_pdg_list: Option<Vec<i32>>,
    ) -> PyResult<Self> {
        let boxes = sub_volumes
            .into_iter()
            .map(|(lo, hi)| BoundingBox::new([lo.0, lo.1, lo.2], [hi.0, hi.1, hi.2]))
            .collect::<crate::error::Result<Vec<_>>>()
            .map_err(py_err)?;
        let fv = FiducialVolume::from_sub_volumes(boxes).map_err(py_err)?;
        let config = PartListConfig::new(save_path_pdg_list.unwrap_or_default());
        Ok(Self {
            inner: PartList::new(config, fv),
        })
    }

    /// Replace the event content. Returns the number of stored records.
    fn ingest<'py>(
        &mut self,
        particles: Vec<PyParticle<'py>>,
        origins: Vec<i32>,
    ) -> PyResult<usize> {
        let mut batch = Vec::with_capacity(particles.len());
        for (track_id, pdg_code, mother, daughters, process, traj) in &particles {
            batch.push(SimParticle {
                track_id: *track_id,
                pdg_code: *pdg_code,
                mother: *mother,
                daughters: daughters.clone(),
                process: process.clone(),
                trajectory: trajectory_from_array(traj)?,
            });
        }
        let origins: Vec<Origin> = origins.into_iter().map(Origin::from).collect();
        self.inner
            .add_particles(&batch, &origins, &[])
            .map_err(py_err)?;
        Ok(self.inner.len())
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn mother_track_id(&self, position: usize) -> u32 {
        self.inner.mother_track_id(position)
    }

    fn ancestor_track_id(&mut self, position: usize) -> u32 {
        self.inner.ancestor_track_id(position)
    }

    fn in_detector(&self, x: f64, y: f64, z: f64) -> bool {
        self.inner.in_detector(x, y, z)
    }

    fn track_ids(&self) -> Vec<u32> {
        self.inner.track_ids().into_iter().collect()
    }

    /// Reduced path as an (N, 8) float64 array, or None if the particle has none.
    fn detector_path<'py>(
        &self,
        py: Python<'py>,
        position: usize,
    ) -> PyResult<Option<Py<PyArray2<f64>>>> {
        let Some(record) = self.inner.get(position) else {
            return Err(py_err(format!("position {position} out of range")));
        };
        let Some(path) = record.detector_path.as_ref() else {
            return Ok(None);
        };
        let mut arr = Array2::<f64>::zeros((path.len(), TRAJ_COLS));
        for (i, p) in path.iter().enumerate() {
            for k in 0..4 {
                arr[[i, k]] = p.position[k];
                arr[[i, k + 4]] = p.momentum[k];
            }
        }
        Ok(Some(arr.into_pyarray(py).unbind()))
    }
}

/// The mcreco Python module entry point.
#[pymodule]
fn mcreco(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPartList>()?;
    Ok(())
}

use pyo3::exceptions::{PyIndexError, PyRuntimeError};
use pyo3::prelude::*;

use crate::data::{IndexedDataset, ModelNet40 as RustModelNet40, ModelNet40Options};
use crate::error::ModelNetError;

fn to_py_err(e: ModelNetError) -> PyErr {
    match e {
        ModelNetError::IndexOutOfBounds { .. } => PyIndexError::new_err(e.to_string()),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

/// Map-style dataset usable from a Python training loop.
#[pyclass(name = "ModelNet40")]
struct PyModelNet40 {
    inner: RustModelNet40,
}

#[pymethods]
impl PyModelNet40 {
    #[new]
    #[pyo3(signature = (root, train = true, download = false))]
    fn new(py: Python<'_>, root: String, train: bool, download: bool) -> PyResult<Self> {
        let options = ModelNet40Options::new(root).train(train).download(download);
        let inner = py
            .allow_threads(|| RustModelNet40::new(options))
            .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    /// Returns `(points, label)` with points as a list of `[x, y, z]` rows
    fn __getitem__(&self, index: isize) -> PyResult<(Vec<Vec<f32>>, i64)> {
        let len = self.inner.len();
        let resolved = if index < 0 { index + len as isize } else { index };
        if resolved < 0 {
            return Err(PyIndexError::new_err(format!(
                "Index {} out of bounds for dataset of length {}",
                index, len
            )));
        }
        let (points, label) = self.inner.get(resolved as usize).map_err(to_py_err)?;
        let rows = points.outer_iter().map(|row| row.to_vec()).collect();
        Ok((rows, label))
    }

    #[getter]
    fn categories(&self) -> Vec<String> {
        self.inner.categories().to_vec()
    }

    #[getter]
    fn split(&self) -> &'static str {
        self.inner.split().as_str()
    }
}

/// A Python module implemented in Rust.
#[pymodule]
pub fn modelnet_core(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyModelNet40>()?;
    Ok(())
}

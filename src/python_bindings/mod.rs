//! Python bindings that expose the mask builder via PyO3.
use pyo3::{exceptions::PyValueError, prelude::*, types::PyModule};

use crate::{EdgePolicy, MaskConfig, MaskError, MaskStack, TreeMasker, DEFAULT_N_HEAD};

type PyMasks = (Vec<String>, Vec<Vec<Vec<u8>>>);

fn to_py_err(err: MaskError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn masker_for(min_layer_depth: usize, policy: &str, n_head: usize) -> PyResult<TreeMasker> {
    let policy: EdgePolicy = policy.parse().map_err(to_py_err)?;
    let config = MaskConfig::default()
        .with_min_layer_depth(min_layer_depth)
        .with_policy(policy)
        .with_n_head(n_head);
    TreeMasker::new(config).map_err(to_py_err)
}

fn into_py_masks(stack: MaskStack) -> PyMasks {
    let masks = stack.masks().iter().map(|mask| mask.to_rows()).collect();
    (stack.tags().to_vec(), masks)
}

/// Python-facing mask builder with a fixed configuration.
#[pyclass]
#[derive(Debug)]
pub struct PyTreeMasker {
    masker: TreeMasker,
}

#[pymethods]
impl PyTreeMasker {
    #[new]
    #[pyo3(signature = (min_layer_depth = 12, policy = "parent-height", n_head = 5))]
    /// Create a masker.
    ///
    /// Args:
    ///     min_layer_depth: Minimum number of mask layers.
    ///     policy: `"parent-height"` or `"self-height"`.
    ///     n_head: Attention heads of the consuming encoder.
    pub fn new(min_layer_depth: usize, policy: &str, n_head: usize) -> PyResult<Self> {
        Ok(Self {
            masker: masker_for(min_layer_depth, policy, n_head)?,
        })
    }

    /// Build masks for one bracketed tree.
    ///
    /// Returns:
    ///     `(tags, masks)` where `masks[layer][i][j]` is 0 or 1.
    pub fn tree_masks(&self, bracketed: &str) -> PyResult<PyMasks> {
        let stack = self.masker.build_bracketed(bracketed).map_err(to_py_err)?;
        Ok(into_py_masks(stack))
    }

    /// Heads the consumer should broadcast each layer over.
    #[getter]
    pub fn n_head(&self) -> usize {
        self.masker.config().n_head
    }
}

/// Build masks for one bracketed tree without keeping a masker around.
///
/// Returns:
///     `(tags, masks)` where `masks[layer][i][j]` is 0 or 1.
#[pyfunction]
#[pyo3(signature = (bracketed, min_layer_depth = 12, policy = "parent-height"))]
pub fn tree_masks(bracketed: &str, min_layer_depth: usize, policy: &str) -> PyResult<PyMasks> {
    let masker = masker_for(min_layer_depth, policy, DEFAULT_N_HEAD)?;
    let stack = masker.build_bracketed(bracketed).map_err(to_py_err)?;
    Ok(into_py_masks(stack))
}

/// Create Python module.
#[pymodule]
pub fn treemask_py(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTreeMasker>()?;
    m.add_function(wrap_pyfunction!(tree_masks, m)?)?;
    Ok(())
}

//! Python bindings that expose the matching engine via PyO3.
use pyo3::{exceptions::PyValueError, prelude::*, types::PyModule};

use crate::breakpoint::{BreakpointRecord, MatchWindow};
use crate::config::MatchConfig;
use crate::consensus;

/// `(id, caller, chrom_1, pos_1, strand_1, chrom_2, pos_2, strand_2, sv_type)`
type PyBreakpoint = (
    String,
    String,
    String,
    u64,
    String,
    String,
    u64,
    String,
    String,
);

/// Python-facing entry point for consensus and pairwise matching.
#[pyclass]
#[derive(Debug)]
pub struct PyConsensusEngine {
    parallel: bool,
}

#[pymethods]
impl PyConsensusEngine {
    #[new]
    #[pyo3(signature = (parallel = true))]
    /// Create the engine; `parallel` toggles multi-threaded querying.
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    /// Cluster breakpoints from several callers and return consensus calls.
    ///
    /// Args:
    ///     records: List of breakpoint tuples.
    ///     window: Extension radius applied to each breakend.
    ///
    /// Returns:
    ///     List of breakpoint tuples whose caller field holds the joined
    ///     caller list, each paired with its group id.
    #[pyo3(signature = (records, window = 500))]
    pub fn consensus(
        &self,
        records: Vec<PyBreakpoint>,
        window: u64,
    ) -> PyResult<Vec<(PyBreakpoint, usize)>> {
        let records = build_records(records)?;
        let table = consensus::consensus(&records, self.config(window))
            .map_err(|err| PyValueError::new_err(err.to_string()))?;

        Ok(table
            .into_rows()
            .into_iter()
            .map(|call| {
                let mut row = to_tuple(&call.record);
                row.1 = call.callers;
                (row, call.group)
            })
            .collect())
    }

    /// Match `query` against `reference` and return `(reference_id, query_id)` pairs.
    #[pyo3(signature = (reference, query, window = 200))]
    pub fn match_pairs(
        &self,
        reference: Vec<PyBreakpoint>,
        query: Vec<PyBreakpoint>,
        window: u64,
    ) -> PyResult<Vec<(String, String)>> {
        let reference = build_records(reference)?;
        let query = build_records(query)?;
        let table = consensus::match_pairs(&reference, &query, self.config(window))
            .map_err(|err| PyValueError::new_err(err.to_string()))?;

        Ok(table
            .into_pairs()
            .into_iter()
            .map(|pair| (pair.reference_id, pair.query_id))
            .collect())
    }
}

impl Default for PyConsensusEngine {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PyConsensusEngine {
    fn config(&self, window: u64) -> MatchConfig {
        MatchConfig::multi_way()
            .with_window(MatchWindow::new(window))
            .with_parallel(self.parallel)
    }
}

fn build_records(rows: Vec<PyBreakpoint>) -> PyResult<Vec<BreakpointRecord>> {
    rows.into_iter()
        .map(|(id, caller, c1, p1, s1, c2, p2, s2, sv_type)| {
            BreakpointRecord::builder()
                .id(id)
                .caller(caller)
                .first_str(&c1, &p1.to_string(), &s1)
                .second_str(&c2, &p2.to_string(), &s2)
                .sv_type(sv_type)
                .build()
                .map_err(|err| PyValueError::new_err(err.to_string()))
        })
        .collect()
}

fn to_tuple(record: &BreakpointRecord) -> PyBreakpoint {
    (
        record.id().to_string(),
        record.caller().to_string(),
        record.chrom_1().to_string(),
        record.pos_1(),
        record.strand_1().to_string(),
        record.chrom_2().to_string(),
        record.pos_2(),
        record.strand_2().to_string(),
        record.sv_type().to_string(),
    )
}

/// Create Python module.
#[pymodule]
pub fn bkpconsensus_py(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyConsensusEngine>()?;
    Ok(())
}

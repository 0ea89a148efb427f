//! Multi-way consensus and two-way comparison of breakpoint call sets.
//!
//! The multi-way path clusters a concatenated collection from several callers
//! and keeps one representative per cluster confirmed by at least two callers.
//! The two-way path lists every reference/query match without clustering.

mod cluster;
mod pairwise;
mod select;

pub use cluster::{ClusterAssignment, ClusterBuilder};
pub use pairwise::{BreakpointPair, PairTable, PairwiseMatcher};
pub use select::{ConsensusCall, ConsensusSelector, ConsensusTable};

use tracing::info;

use crate::breakpoint::{BreakpointRecord, IndexError};
use crate::config::MatchConfig;

/// Cluster `records` and reduce them to consensus calls.
pub fn consensus(
    records: &[BreakpointRecord],
    config: MatchConfig,
) -> Result<ConsensusTable, IndexError> {
    let assignment = ClusterBuilder::new(config).cluster(records)?;
    let table = ConsensusSelector::new().select(records, &assignment);
    info!(
        records = records.len(),
        clustered = assignment.len(),
        consensus = table.len(),
        window = config.window.radius(),
        "built consensus call set"
    );
    Ok(table)
}

/// Match `query` against `reference` and list every pair.
pub fn match_pairs(
    reference: &[BreakpointRecord],
    query: &[BreakpointRecord],
    config: MatchConfig,
) -> Result<PairTable, IndexError> {
    let table = PairwiseMatcher::new(config).match_pairs(reference, query)?;
    info!(
        pairs = table.len(),
        window = config.window.radius(),
        "matched call sets"
    );
    Ok(table)
}

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::breakpoint::{BreakpointIndex, BreakpointRecord, IndexError, Matcher};
use crate::config::MatchConfig;

/// A reference call matched to a query call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakpointPair {
    /// Id from the reference collection.
    #[serde(rename = "breakpoint_id_1")]
    pub reference_id: String,
    /// Id from the query collection.
    #[serde(rename = "breakpoint_id_2")]
    pub query_id: String,
}

/// Every cross-match between two collections, in query input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairTable {
    pairs: Vec<BreakpointPair>,
}

impl PairTable {
    /// Column names of the rendered table, present even when there are no rows.
    pub const COLUMNS: [&'static str; 2] = ["breakpoint_id_1", "breakpoint_id_2"];

    /// Pairs in output order.
    pub fn pairs(&self) -> &[BreakpointPair] {
        &self.pairs
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Consume into the pair vector.
    pub fn into_pairs(self) -> Vec<BreakpointPair> {
        self.pairs
    }
}

/// Matches a query collection against a reference collection without clustering.
#[derive(Debug, Clone)]
pub struct PairwiseMatcher {
    config: MatchConfig,
}

impl PairwiseMatcher {
    /// Create a matcher with the given configuration.
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Emit `(reference, query)` for every reference hit of every query record.
    ///
    /// Pairs follow query input order, then ascending reference id. A query
    /// record may contribute any number of pairs.
    pub fn match_pairs(
        &self,
        reference: &[BreakpointRecord],
        query: &[BreakpointRecord],
    ) -> Result<PairTable, IndexError> {
        let index = BreakpointIndex::build(reference)?;
        let matcher = Matcher::new(&index, self.config.window);

        let pair_for = |record: &BreakpointRecord| -> Vec<BreakpointPair> {
            matcher
                .matches(record)
                .into_iter()
                .map(|reference_id| BreakpointPair {
                    reference_id: reference_id.to_string(),
                    query_id: record.id().to_string(),
                })
                .collect()
        };

        let per_query: Vec<Vec<BreakpointPair>> = if self.config.parallel {
            query.par_iter().map(pair_for).collect()
        } else {
            query.iter().map(pair_for).collect()
        };
        let pairs: Vec<BreakpointPair> = per_query.into_iter().flatten().collect();

        debug!(
            reference = reference.len(),
            query = query.len(),
            pairs = pairs.len(),
            "matched breakpoint collections"
        );

        Ok(PairTable { pairs })
    }
}

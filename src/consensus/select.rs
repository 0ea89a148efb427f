use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::breakpoint::BreakpointRecord;
use crate::consensus::ClusterAssignment;

/// Representative call for a cluster supported by at least two callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusCall {
    /// First record of the cluster in input order.
    pub record: BreakpointRecord,
    /// Every member's caller, comma-joined in input order.
    pub callers: String,
    /// Group id the cluster was assigned.
    pub group: usize,
}

/// Consensus output rows, ascending by group id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsensusTable {
    rows: Vec<ConsensusCall>,
}

impl ConsensusTable {
    /// Column names of the rendered table, present even when there are no rows.
    pub const COLUMNS: [&'static str; 10] = [
        "breakpoint_id",
        "chromosome_1",
        "position_1",
        "strand_1",
        "chromosome_2",
        "position_2",
        "strand_2",
        "type",
        "caller",
        "grouped_breakpoint_id",
    ];

    /// Rows in output order.
    pub fn rows(&self) -> &[ConsensusCall] {
        &self.rows
    }

    /// Number of consensus calls.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no cluster survived.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consume into the row vector.
    pub fn into_rows(self) -> Vec<ConsensusCall> {
        self.rows
    }
}

/// Reduces clustered records to one call per cross-caller cluster.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsensusSelector;

impl ConsensusSelector {
    /// Create a selector.
    pub fn new() -> Self {
        Self
    }

    /// Build consensus rows from `records` and their cluster assignment.
    ///
    /// Unassigned records are ignored. Clusters whose members all come from
    /// one caller are dropped.
    pub fn select(
        &self,
        records: &[BreakpointRecord],
        assignment: &ClusterAssignment,
    ) -> ConsensusTable {
        let mut clusters: BTreeMap<usize, Vec<&BreakpointRecord>> = BTreeMap::new();
        for record in records {
            if let Some(group) = assignment.group_of(record.id()) {
                clusters.entry(group).or_default().push(record);
            }
        }

        let total = clusters.len();
        let rows: Vec<ConsensusCall> = clusters
            .into_iter()
            .filter_map(|(group, members)| {
                let distinct: HashSet<&str> = members.iter().map(|r| r.caller()).collect();
                if distinct.len() < 2 {
                    return None;
                }
                let callers = members
                    .iter()
                    .map(|r| r.caller())
                    .collect::<Vec<_>>()
                    .join(",");
                Some(ConsensusCall {
                    record: members[0].clone(),
                    callers,
                    group,
                })
            })
            .collect();

        debug!(
            clusters = total,
            consensus = rows.len(),
            "dropped {} single-caller clusters",
            total - rows.len()
        );

        ConsensusTable { rows }
    }
}

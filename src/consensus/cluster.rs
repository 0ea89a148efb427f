use std::collections::{BTreeSet, HashMap};

use rayon::prelude::*;
use tracing::debug;

use crate::breakpoint::{BreakpointIndex, BreakpointRecord, IndexError, Matcher};
use crate::config::MatchConfig;

/// Group id assigned to each clustered record.
///
/// Records that only matched themselves are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterAssignment {
    groups: HashMap<String, usize>,
    group_count: usize,
}

impl ClusterAssignment {
    /// Group id of `id`, if it was clustered.
    pub fn group_of(&self, id: &str) -> Option<usize> {
        self.groups.get(id).copied()
    }

    /// Number of clustered records.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no record was clustered.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of group ids handed out.
    ///
    /// A group id can end up with no members when all of them were claimed by
    /// a later lead.
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// `(id, group)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.groups.iter().map(|(id, &group)| (id.as_str(), group))
    }
}

/// Single-pass grouping of a mixed-caller collection.
///
/// Every record is queried against an index over the whole collection. The
/// smallest id in each match set becomes the lead and collects the other ids
/// of that set. Leads are then numbered in first-seen order and each lead's
/// ids take its number; an id listed under several leads keeps the number of
/// the last one. Leads that only meet through a third record are not merged.
#[derive(Debug, Clone)]
pub struct ClusterBuilder {
    config: MatchConfig,
}

impl ClusterBuilder {
    /// Create a builder with the given matching configuration.
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Assign group ids to every record that matched at least one other.
    pub fn cluster(&self, records: &[BreakpointRecord]) -> Result<ClusterAssignment, IndexError> {
        let index = BreakpointIndex::build(records)?;
        let matcher = Matcher::new(&index, self.config.window);

        // Collected in input order either way, so the fold below is unaffected.
        let match_sets: Vec<Vec<&str>> = if self.config.parallel {
            records.par_iter().map(|record| matcher.matches(record)).collect()
        } else {
            records.iter().map(|record| matcher.matches(record)).collect()
        };

        let mut leads: Vec<(&str, BTreeSet<&str>)> = Vec::new();
        let mut lead_slots: HashMap<&str, usize> = HashMap::new();

        for matches in &match_sets {
            let Some((&lead, rest)) = matches.split_first() else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            let slot = *lead_slots.entry(lead).or_insert_with(|| {
                leads.push((lead, BTreeSet::new()));
                leads.len() - 1
            });
            leads[slot].1.extend(rest.iter().copied());
        }

        let mut groups = HashMap::new();
        for (group, (lead, members)) in leads.iter().enumerate() {
            groups.insert(lead.to_string(), group);
            for member in members {
                groups.insert(member.to_string(), group);
            }
        }

        debug!(
            records = records.len(),
            buckets = index.bucket_count(),
            groups = leads.len(),
            clustered = groups.len(),
            "clustered breakpoints"
        );

        Ok(ClusterAssignment {
            groups,
            group_count: leads.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoint::{MatchWindow, Strand};

    fn record(id: &str, caller: &str, pos_1: u64, pos_2: u64) -> BreakpointRecord {
        BreakpointRecord::builder()
            .id(id)
            .caller(caller)
            .first("1", pos_1, Strand::Plus)
            .second("2", pos_2, Strand::Minus)
            .build()
            .unwrap()
    }

    fn builder(window: u64) -> ClusterBuilder {
        ClusterBuilder::new(MatchConfig::multi_way().with_window(window))
    }

    #[test]
    fn empty_collection_yields_empty_mapping() {
        let assignment = builder(500).cluster(&[]).unwrap();
        assert!(assignment.is_empty());
        assert_eq!(assignment.group_count(), 0);
    }

    #[test]
    fn singletons_are_absent() {
        let records = vec![record("a", "x", 100, 500), record("b", "y", 10_000, 50_000)];
        let assignment = builder(500).cluster(&records).unwrap();
        assert!(assignment.is_empty());
    }

    #[test]
    fn close_pair_shares_a_group() {
        let records = vec![record("a", "x", 100, 500), record("b", "y", 110, 505)];
        let assignment = builder(500).cluster(&records).unwrap();

        assert_eq!(assignment.group_of("a"), Some(0));
        assert_eq!(assignment.group_of("b"), Some(0));
        assert_eq!(assignment.group_count(), 1);
    }

    #[test]
    fn chain_is_not_merged_transitively() {
        // a-b and b-c are within 100, a-c is not.
        let records = vec![
            record("a", "x", 1_000, 5_000),
            record("b", "y", 1_080, 5_080),
            record("c", "z", 1_160, 5_160),
        ];
        let assignment = builder(100).cluster(&records).unwrap();

        // Queries: a -> {a,b} lead a; b -> {a,b,c} lead a; c -> {b,c} lead b.
        // Group 0 (lead a) = {a,b,c}, then group 1 (lead b) = {b,c} overwrites.
        assert_eq!(assignment.group_count(), 2);
        assert_eq!(assignment.group_of("a"), Some(0));
        assert_eq!(assignment.group_of("b"), Some(1));
        assert_eq!(assignment.group_of("c"), Some(1));

        let mut members: Vec<_> = assignment.iter().collect();
        members.sort();
        assert_eq!(members, vec![("a", 0), ("b", 1), ("c", 1)]);
    }

    #[test]
    fn builder_keeps_its_config() {
        let config = MatchConfig::multi_way().with_window(250).with_parallel(false);
        assert_eq!(ClusterBuilder::new(config).config(), &config);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let records: Vec<_> = (0..200u64)
            .map(|i| record(&format!("r{i:03}"), "x", 1_000 + i * 37, 9_000 + (i % 7) * 41))
            .collect();

        let parallel = ClusterBuilder::new(MatchConfig::multi_way().with_window(150))
            .cluster(&records)
            .unwrap();
        let sequential = ClusterBuilder::new(
            MatchConfig::multi_way()
                .with_window(MatchWindow::new(150))
                .with_parallel(false),
        )
        .cluster(&records)
        .unwrap();

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn duplicate_ids_surface_as_error() {
        let records = vec![record("a", "x", 1, 2), record("a", "y", 1, 2)];
        assert!(matches!(
            builder(500).cluster(&records),
            Err(IndexError::DuplicateId(_))
        ));
    }
}

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;

use crate::breakpoint::{BreakpointRecord, MatchWindow, Strand};

/// Errors raised while building a [`BreakpointIndex`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Two records in one collection share an identifier.
    #[error("duplicate breakpoint id '{0}' in collection")]
    DuplicateId(String),
}

/// Chromosome/strand pair a bucket is keyed on, in stored orientation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BucketKey {
    chrom_1: Arc<str>,
    strand_1: Strand,
    chrom_2: Arc<str>,
    strand_2: Strand,
}

impl BucketKey {
    fn forward(record: &BreakpointRecord) -> Self {
        Self {
            chrom_1: Arc::clone(&record.first().chrom),
            strand_1: record.strand_1(),
            chrom_2: Arc::clone(&record.second().chrom),
            strand_2: record.strand_2(),
        }
    }

    fn swapped(record: &BreakpointRecord) -> Self {
        Self {
            chrom_1: Arc::clone(&record.second().chrom),
            strand_1: record.strand_2(),
            chrom_2: Arc::clone(&record.first().chrom),
            strand_2: record.strand_1(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BucketEntry {
    pos_1: u64,
    pos_2: u64,
    slot: usize,
}

/// Positional index over a collection of breakpoint records.
///
/// Records are bucketed by their `(chrom_1, strand_1, chrom_2, strand_2)`
/// tuple as reported. Each bucket is sorted by `pos_1`, so a query binary
/// searches the window bounds on the first breakend and filters the resulting
/// run on `pos_2`. Queries probe both the record's own orientation and the
/// swapped one, which catches callers that report the breakends in the
/// opposite order.
///
/// The index borrows the records and is read-only once built, so it can be
/// queried from several threads at once.
#[derive(Debug)]
pub struct BreakpointIndex<'a> {
    records: &'a [BreakpointRecord],
    buckets: HashMap<BucketKey, Vec<BucketEntry>>,
    slots_by_id: HashMap<&'a str, usize>,
}

impl<'a> BreakpointIndex<'a> {
    /// Build the index in `O(n log n)`.
    pub fn build(records: &'a [BreakpointRecord]) -> Result<Self, IndexError> {
        let mut buckets: HashMap<BucketKey, Vec<BucketEntry>> = HashMap::new();
        let mut slots_by_id = HashMap::with_capacity(records.len());

        for (slot, record) in records.iter().enumerate() {
            match slots_by_id.entry(record.id()) {
                Entry::Occupied(_) => return Err(IndexError::DuplicateId(record.id().to_string())),
                Entry::Vacant(vacant) => {
                    vacant.insert(slot);
                }
            }
            buckets
                .entry(BucketKey::forward(record))
                .or_default()
                .push(BucketEntry {
                    pos_1: record.pos_1(),
                    pos_2: record.pos_2(),
                    slot,
                });
        }

        // Buckets are independent, so they sort in parallel.
        buckets
            .par_iter_mut()
            .for_each(|(_, bucket)| bucket.sort_unstable_by_key(|entry| (entry.pos_1, entry.slot)));

        Ok(Self {
            records,
            buckets,
            slots_by_id,
        })
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct chromosome/strand buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Records backing the index, in input order.
    pub fn records(&self) -> &'a [BreakpointRecord] {
        self.records
    }

    /// Look up an indexed record by id.
    pub fn get(&self, id: &str) -> Option<&'a BreakpointRecord> {
        self.slots_by_id.get(id).map(|&slot| &self.records[slot])
    }

    /// Ids of every indexed record within `window` of `record` on both
    /// breakends, under either orientation.
    ///
    /// If `record` itself is indexed, its own id is part of the result.
    pub fn query(&self, record: &BreakpointRecord, window: MatchWindow) -> BTreeSet<&'a str> {
        self.query_slots(record, window)
            .into_iter()
            .map(|slot| self.records[slot].id())
            .collect()
    }

    /// Input-order slots of every match, sorted and de-duplicated.
    pub(crate) fn query_slots(&self, record: &BreakpointRecord, window: MatchWindow) -> Vec<usize> {
        let mut slots = Vec::new();
        self.scan(
            &BucketKey::forward(record),
            record.pos_1(),
            record.pos_2(),
            window,
            &mut slots,
        );
        // Runs even when both keys coincide: the coordinates are exchanged.
        self.scan(
            &BucketKey::swapped(record),
            record.pos_2(),
            record.pos_1(),
            window,
            &mut slots,
        );
        slots.sort_unstable();
        slots.dedup();
        slots
    }

    fn scan(
        &self,
        key: &BucketKey,
        pos_1: u64,
        pos_2: u64,
        window: MatchWindow,
        out: &mut Vec<usize>,
    ) {
        let Some(bucket) = self.buckets.get(key) else {
            return;
        };
        let (low, high) = window.bounds(pos_1);
        let start = bucket.partition_point(|entry| entry.pos_1 < low);
        out.extend(
            bucket[start..]
                .iter()
                .take_while(|entry| entry.pos_1 <= high)
                .filter(|entry| window.contains(entry.pos_2, pos_2))
                .map(|entry| entry.slot),
        );
    }
}

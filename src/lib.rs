//! # Structural-variant breakpoint consensus
//!
//! Reconciles breakpoint calls made by several SV callers on the same genome.
//!
//! ## Core Algorithm
//!
//! 1. **Positional index**: records are bucketed by chromosome/strand pair and
//!    sorted by the first breakend, so window lookups are binary searches
//! 2. **Orientation-aware matching**: every query also probes the swapped
//!    breakend order, since callers do not agree on which end comes first
//! 3. **Single-pass clustering**: the smallest id of each match set leads a
//!    group; groups are not merged transitively
//! 4. **Consensus selection**: clusters confirmed by at least two callers
//!    yield one representative call
//!
//! Two-way comparison skips clustering and lists every reference/query match.
//!
//! ## Usage Example
//!
//! ```
//! use bkpconsensus::{consensus, BreakpointRecord, MatchConfig, Strand};
//!
//! let records = vec![
//!     BreakpointRecord::builder()
//!         .id("A").caller("destruct")
//!         .first("1", 100, Strand::Plus).second("2", 500, Strand::Minus)
//!         .build()?,
//!     BreakpointRecord::builder()
//!         .id("B").caller("lumpy")
//!         .first("1", 110, Strand::Plus).second("2", 505, Strand::Minus)
//!         .build()?,
//! ];
//!
//! let table = consensus(&records, MatchConfig::multi_way())?;
//! assert_eq!(table.rows()[0].callers, "destruct,lumpy");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod breakpoint; // Records, windows, positional index
pub mod config;     // Matching parameters
pub mod consensus;  // Clustering, consensus selection, pairwise matching
pub mod io;         // Record sources and output sinks
/// Python bindings for exposing the matching engine to Python pipelines.
#[cfg(feature = "python-bindings")]
pub mod python_bindings;

// Re-exports for convenience
pub use breakpoint::{
    match_record, Breakend, BreakpointIndex, BreakpointRecord, IndexError, InvalidRecordError,
    MatchWindow, Matcher, Strand,
};
pub use config::MatchConfig;
pub use consensus::{
    consensus, match_pairs, BreakpointPair, ClusterAssignment, ClusterBuilder, ConsensusCall,
    ConsensusSelector, ConsensusTable, PairTable, PairwiseMatcher,
};
pub use io::{load_breakpoints, CallerKind, LoadError};

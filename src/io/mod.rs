//! Record sources and output sinks around the matching core.
//!
//! Each supported caller format is turned into [`BreakpointRecord`]s here;
//! consensus and pair tables are written back out as CSV.

mod table;
mod vcf;
mod writer;

pub use table::{TableError, TableLayout, TableReader};
pub use vcf::{SvVcfReader, VcfError};
pub use writer::{
    render_consensus, render_pairs, write_consensus, write_consensus_path, write_pairs,
    write_pairs_path,
};

use std::fmt;
use std::path::Path;

use clap::ValueEnum;
use thiserror::Error;
use tracing::info;

use crate::breakpoint::BreakpointRecord;

/// Source format of a call set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum CallerKind {
    /// destruct breakpoint table.
    Destruct,
    /// Consensus table produced by the multi-way command.
    Consensus,
    /// lumpy VCF.
    Lumpy,
    /// svaba VCF.
    Svaba,
    /// gridss VCF.
    Gridss,
}

impl CallerKind {
    /// Caller name written into each record.
    pub fn name(self) -> &'static str {
        match self {
            CallerKind::Destruct => "destruct",
            CallerKind::Consensus => "consensus",
            CallerKind::Lumpy => "lumpy",
            CallerKind::Svaba => "svaba",
            CallerKind::Gridss => "gridss",
        }
    }

    /// Whether the format is read through htslib.
    pub fn is_vcf(self) -> bool {
        matches!(self, CallerKind::Lumpy | CallerKind::Svaba | CallerKind::Gridss)
    }
}

impl fmt::Display for CallerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure loading a call set of any format.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Delimited-table failure.
    #[error(transparent)]
    Table(#[from] TableError),
    /// VCF failure.
    #[error(transparent)]
    Vcf(#[from] VcfError),
}

/// Load the call set at `path` using the adapter for `kind`.
pub fn load_breakpoints<P: AsRef<Path>>(
    path: P,
    kind: CallerKind,
) -> Result<Vec<BreakpointRecord>, LoadError> {
    let path = path.as_ref();
    let records = match kind {
        CallerKind::Destruct => TableReader::new(TableLayout::Destruct).read_path(path)?,
        CallerKind::Consensus => TableReader::new(TableLayout::Consensus).read_path(path)?,
        CallerKind::Lumpy | CallerKind::Svaba | CallerKind::Gridss => {
            SvVcfReader::new(kind.name()).read_path(path)?
        }
    };
    info!(
        caller = %kind,
        path = %path.display(),
        records = records.len(),
        "loaded call set"
    );
    Ok(records)
}

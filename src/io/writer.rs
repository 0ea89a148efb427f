use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::consensus::{ConsensusCall, ConsensusTable, PairTable};
use crate::io::TableError;

#[derive(Debug, Serialize)]
struct ConsensusRow<'a> {
    breakpoint_id: &'a str,
    chromosome_1: &'a str,
    position_1: u64,
    strand_1: char,
    chromosome_2: &'a str,
    position_2: u64,
    strand_2: char,
    #[serde(rename = "type")]
    sv_type: &'a str,
    caller: &'a str,
    grouped_breakpoint_id: usize,
}

impl<'a> From<&'a ConsensusCall> for ConsensusRow<'a> {
    fn from(call: &'a ConsensusCall) -> Self {
        let record = &call.record;
        Self {
            breakpoint_id: record.id(),
            chromosome_1: record.chrom_1(),
            position_1: record.pos_1(),
            strand_1: record.strand_1().symbol(),
            chromosome_2: record.chrom_2(),
            position_2: record.pos_2(),
            strand_2: record.strand_2().symbol(),
            sv_type: record.sv_type(),
            caller: &call.callers,
            grouped_breakpoint_id: call.group,
        }
    }
}

/// Write the consensus table as CSV. The header is always written.
pub fn write_consensus<W: Write>(writer: W, table: &ConsensusTable) -> Result<(), TableError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(ConsensusTable::COLUMNS)?;
    for call in table.rows() {
        csv.serialize(ConsensusRow::from(call))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the pair table as CSV. The header is always written.
pub fn write_pairs<W: Write>(writer: W, table: &PairTable) -> Result<(), TableError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(PairTable::COLUMNS)?;
    for pair in table.pairs() {
        csv.serialize(pair)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the consensus table to `path`.
pub fn write_consensus_path<P: AsRef<Path>>(path: P, table: &ConsensusTable) -> Result<(), TableError> {
    let file = File::create(path.as_ref())?;
    write_consensus(BufWriter::new(file), table)
}

/// Write the pair table to `path`.
pub fn write_pairs_path<P: AsRef<Path>>(path: P, table: &PairTable) -> Result<(), TableError> {
    let file = File::create(path.as_ref())?;
    write_pairs(BufWriter::new(file), table)
}

/// Render the consensus table into a string (handy for tests and snapshots).
pub fn render_consensus(table: &ConsensusTable) -> Result<String, TableError> {
    let mut buffer = Vec::new();
    write_consensus(&mut buffer, table)?;
    Ok(String::from_utf8(buffer)?)
}

/// Render the pair table into a string.
pub fn render_pairs(table: &PairTable) -> Result<String, TableError> {
    let mut buffer = Vec::new();
    write_pairs(&mut buffer, table)?;
    Ok(String::from_utf8(buffer)?)
}

use std::collections::HashSet;
use std::path::Path;

use rust_htslib::bcf::{self, Read};
use rust_htslib::errors::Error as HtslibError;
use thiserror::Error;
use tracing::{debug, warn};

use crate::breakpoint::{BreakpointRecord, InvalidRecordError, Strand};

const MISSING_INTEGER: i32 = i32::MIN;
const VECTOR_END_INTEGER: i32 = i32::MIN + 1;

/// Errors reading structural-variant VCFs.
#[derive(Debug, Error)]
pub enum VcfError {
    /// htslib failed to open or decode the file.
    #[error("htslib error: {0}")]
    Htslib(#[from] HtslibError),

    /// A record could not be interpreted as a breakpoint.
    #[error("malformed SV record '{id}': {message}")]
    Malformed {
        /// VCF `ID` of the offending record.
        id: String,
        /// What was wrong with it.
        message: String,
    },

    /// The derived breakpoint failed validation.
    #[error("invalid breakpoint: {0}")]
    InvalidRecord(#[from] InvalidRecordError),
}

fn malformed(id: &str, message: impl Into<String>) -> VcfError {
    VcfError::Malformed {
        id: id.to_string(),
        message: message.into(),
    }
}

/// Reads breakpoints from lumpy, svaba or gridss VCF output.
///
/// Paired BND records are reduced to one breakpoint per pair: a BND whose
/// `MATEID` has already been emitted is skipped. Single breakends and
/// non-BND records without a known strand convention are skipped as well.
#[derive(Debug, Clone)]
pub struct SvVcfReader {
    caller: String,
}

impl SvVcfReader {
    /// Reader that labels every record with `caller`.
    pub fn new(caller: impl Into<String>) -> Self {
        Self {
            caller: caller.into(),
        }
    }

    /// Read every breakpoint from a VCF/BCF file (plain or bgzipped).
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<BreakpointRecord>, VcfError> {
        let mut reader = bcf::Reader::from_path(path.as_ref())?;
        let mut emitted: HashSet<String> = HashSet::new();
        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (ordinal, result) in reader.records().enumerate() {
            let record = result?;
            match self.convert(&record, ordinal, &emitted)? {
                Some(breakpoint) => {
                    emitted.insert(breakpoint.id().to_string());
                    records.push(breakpoint);
                }
                None => skipped += 1,
            }
        }

        debug!(
            caller = %self.caller,
            records = records.len(),
            skipped,
            "read SV VCF"
        );
        Ok(records)
    }

    fn convert(
        &self,
        record: &bcf::Record,
        ordinal: usize,
        emitted: &HashSet<String>,
    ) -> Result<Option<BreakpointRecord>, VcfError> {
        let raw_id = String::from_utf8_lossy(&record.id()).into_owned();
        let id = if raw_id.is_empty() || raw_id == "." {
            format!("{}_{}", self.caller, ordinal)
        } else {
            raw_id
        };

        let rid = record
            .rid()
            .ok_or_else(|| malformed(&id, "record has no contig"))?;
        let chrom = String::from_utf8_lossy(record.header().rid2name(rid)?).into_owned();
        let pos = u64::try_from(record.pos() + 1)
            .map_err(|_| malformed(&id, "negative position"))?;

        let sv_type = info_string(record, b"SVTYPE")?.unwrap_or_default();
        let strands_tag = info_string(record, b"STRANDS")?;
        let alleles = record.alleles();
        let alt: &[u8] = alleles.get(1).copied().unwrap_or(b".");

        let (mate_chrom, mate_pos, strands) = if sv_type == "BND" || has_bracket(alt) {
            if let Some(mate_id) = info_string(record, b"MATEID")? {
                if emitted.contains(&mate_id) {
                    return Ok(None);
                }
            }
            let mate = parse_bnd_alt(alt).map_err(|msg| malformed(&id, msg))?;
            let Some((mate_chrom, mate_pos)) = mate else {
                debug!(id = %id, "skipping single breakend");
                return Ok(None);
            };
            let strands = strands_tag
                .as_deref()
                .and_then(parse_strands)
                .or_else(|| bnd_strands_from_alt(alt))
                .ok_or_else(|| malformed(&id, "cannot infer BND strands"))?;
            (mate_chrom, mate_pos, strands)
        } else {
            let end = info_i64(record, b"END")?
                .ok_or_else(|| malformed(&id, format!("{sv_type} record without END")))?;
            let end = u64::try_from(end).map_err(|_| malformed(&id, "negative END"))?;
            let Some(strands) = strands_tag
                .as_deref()
                .and_then(parse_strands)
                .or_else(|| default_strands(&sv_type))
            else {
                warn!(id = %id, sv_type = %sv_type, "skipping record with unknown strand convention");
                return Ok(None);
            };
            (chrom.clone(), end, strands)
        };

        let breakpoint = BreakpointRecord::builder()
            .id(id)
            .caller(self.caller.as_str())
            .first(chrom, pos, strands.0)
            .second(mate_chrom, mate_pos, strands.1)
            .sv_type(sv_type)
            .build()?;
        Ok(Some(breakpoint))
    }
}

fn info_string(record: &bcf::Record, tag: &[u8]) -> Result<Option<String>, VcfError> {
    match record.info(tag).string() {
        Ok(Some(values)) => Ok(values
            .first()
            .map(|value| String::from_utf8_lossy(value).into_owned())),
        Ok(None) => Ok(None),
        Err(HtslibError::BcfUndefinedTag { .. }) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn info_i64(record: &bcf::Record, tag: &[u8]) -> Result<Option<i64>, VcfError> {
    match record.info(tag).integer() {
        Ok(Some(values)) => Ok(values
            .iter()
            .copied()
            .find(|&v| v != MISSING_INTEGER && v != VECTOR_END_INTEGER)
            .map(i64::from)),
        Ok(None) => Ok(None),
        Err(HtslibError::BcfUndefinedTag { .. }) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn has_bracket(alt: &[u8]) -> bool {
    alt.iter().any(|&b| b == b'[' || b == b']')
}

/// Mate locus from BND bracket notation, 1-based. `None` for single breakends.
fn parse_bnd_alt(alt: &[u8]) -> Result<Option<(String, u64)>, String> {
    let Some(open) = alt.iter().position(|&b| b == b'[' || b == b']') else {
        return Ok(None);
    };
    let bracket = alt[open];
    let close = alt[open + 1..]
        .iter()
        .position(|&b| b == bracket)
        .map(|rel| rel + open + 1)
        .ok_or_else(|| {
            format!(
                "BND ALT is missing closing '{}': {}",
                bracket as char,
                String::from_utf8_lossy(alt)
            )
        })?;

    let mate = std::str::from_utf8(&alt[open + 1..close])
        .map_err(|e| format!("BND ALT is not UTF-8: {e}"))?;
    let (contig, pos) = mate
        .rsplit_once(':')
        .ok_or_else(|| format!("BND mate does not look like contig:pos: {mate}"))?;
    let pos: u64 = pos
        .parse()
        .map_err(|_| format!("invalid BND mate position: {pos}"))?;
    Ok(Some((contig.to_string(), pos)))
}

/// Strand pair implied by the bracket form: `t[p[` `+-`, `t]p]` `++`,
/// `]p]t` `-+`, `[p[t` `--`.
fn bnd_strands_from_alt(alt: &[u8]) -> Option<(Strand, Strand)> {
    match alt.first()? {
        b'[' => Some((Strand::Minus, Strand::Minus)),
        b']' => Some((Strand::Minus, Strand::Plus)),
        _ if alt.contains(&b'[') => Some((Strand::Plus, Strand::Minus)),
        _ if alt.contains(&b']') => Some((Strand::Plus, Strand::Plus)),
        _ => None,
    }
}

/// First strand pair of a lumpy-style `STRANDS` value such as `+-:7` or `++:3,--:2`.
fn parse_strands(tag: &str) -> Option<(Strand, Strand)> {
    let bytes = tag.trim().as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    Some((Strand::from_byte(bytes[0])?, Strand::from_byte(bytes[1])?))
}

fn default_strands(sv_type: &str) -> Option<(Strand, Strand)> {
    match sv_type {
        "DEL" | "INS" => Some((Strand::Plus, Strand::Minus)),
        "DUP" => Some((Strand::Minus, Strand::Plus)),
        "INV" => Some((Strand::Plus, Strand::Plus)),
        _ => None,
    }
}

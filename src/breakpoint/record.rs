use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

/// Raised when a breakpoint cannot be constructed from the supplied fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidRecordError {
    /// A required field was absent or empty.
    #[error("missing required field '{field}'")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A coordinate could not be parsed as a non-negative integer.
    #[error("invalid position '{value}' in field '{field}'")]
    InvalidPosition {
        /// Field holding the coordinate.
        field: &'static str,
        /// Raw value that failed to parse.
        value: String,
    },

    /// A strand was not one of `+` or `-`.
    #[error("invalid strand '{value}' in field '{field}'")]
    InvalidStrand {
        /// Field holding the strand.
        field: &'static str,
        /// Raw value that failed to parse.
        value: String,
    },
}

/// Orientation of a breakend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strand {
    /// `+`
    Plus,
    /// `-`
    Minus,
}

impl Strand {
    /// Symbol used in tables and VCF `STRANDS` tags.
    pub fn symbol(self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }

    /// Parse a single strand byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'+' => Some(Strand::Plus),
            b'-' => Some(Strand::Minus),
            _ => None,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Strand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Strand::Plus),
            "-" => Ok(Strand::Minus),
            _ => Err(()),
        }
    }
}

/// One end of a two-ended structural-variant call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakend {
    /// Chromosome name as reported by the caller.
    pub chrom: Arc<str>,
    /// Genomic coordinate.
    pub pos: u64,
    /// Orientation.
    pub strand: Strand,
}

impl Breakend {
    /// Construct a breakend.
    pub fn new(chrom: impl Into<Arc<str>>, pos: u64, strand: Strand) -> Self {
        Self {
            chrom: chrom.into(),
            pos,
            strand,
        }
    }
}

/// A structural-variant breakpoint call produced by one caller.
///
/// Records are immutable once built; downstream stages derive new output rows
/// from them instead of mutating them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointRecord {
    id: Arc<str>,
    caller: Arc<str>,
    first: Breakend,
    second: Breakend,
    sv_type: Arc<str>,
}

impl BreakpointRecord {
    /// Start building a record.
    pub fn builder() -> BreakpointRecordBuilder {
        BreakpointRecordBuilder::default()
    }

    /// Identifier, unique within its source collection.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Tool that produced the call.
    pub fn caller(&self) -> &str {
        &self.caller
    }

    /// Breakend reported first.
    pub fn first(&self) -> &Breakend {
        &self.first
    }

    /// Breakend reported second.
    pub fn second(&self) -> &Breakend {
        &self.second
    }

    /// Chromosome of the first breakend.
    pub fn chrom_1(&self) -> &str {
        &self.first.chrom
    }

    /// Chromosome of the second breakend.
    pub fn chrom_2(&self) -> &str {
        &self.second.chrom
    }

    /// Position of the first breakend.
    pub fn pos_1(&self) -> u64 {
        self.first.pos
    }

    /// Position of the second breakend.
    pub fn pos_2(&self) -> u64 {
        self.second.pos
    }

    /// Strand of the first breakend.
    pub fn strand_1(&self) -> Strand {
        self.first.strand
    }

    /// Strand of the second breakend.
    pub fn strand_2(&self) -> Strand {
        self.second.strand
    }

    /// SV classification, carried through but never matched on.
    pub fn sv_type(&self) -> &str {
        &self.sv_type
    }

    /// Copy of this record whose id is suffixed with its caller name.
    ///
    /// Used when collections from several callers are concatenated and raw ids
    /// may collide.
    pub fn qualified_by_caller(&self) -> Self {
        Self {
            id: Arc::from(format!("{}_{}", self.id, self.caller)),
            ..self.clone()
        }
    }
}

/// Builder for [`BreakpointRecord`].
///
/// Typed setters cover programmatic construction; the `*_str` setters accept
/// raw table text and defer validation to [`BreakpointRecordBuilder::build`].
#[derive(Debug, Default, Clone)]
pub struct BreakpointRecordBuilder {
    id: Option<String>,
    caller: Option<String>,
    chrom_1: Option<String>,
    pos_1: Option<RawField<u64>>,
    strand_1: Option<RawField<Strand>>,
    chrom_2: Option<String>,
    pos_2: Option<RawField<u64>>,
    strand_2: Option<RawField<Strand>>,
    sv_type: Option<String>,
}

#[derive(Debug, Clone)]
enum RawField<T> {
    Parsed(T),
    Text(String),
}

impl BreakpointRecordBuilder {
    /// Record identifier.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Caller name.
    pub fn caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    /// First breakend.
    pub fn first(mut self, chrom: impl Into<String>, pos: u64, strand: Strand) -> Self {
        self.chrom_1 = Some(chrom.into());
        self.pos_1 = Some(RawField::Parsed(pos));
        self.strand_1 = Some(RawField::Parsed(strand));
        self
    }

    /// Second breakend.
    pub fn second(mut self, chrom: impl Into<String>, pos: u64, strand: Strand) -> Self {
        self.chrom_2 = Some(chrom.into());
        self.pos_2 = Some(RawField::Parsed(pos));
        self.strand_2 = Some(RawField::Parsed(strand));
        self
    }

    /// First breakend from unparsed text fields.
    pub fn first_str(mut self, chrom: &str, pos: &str, strand: &str) -> Self {
        self.chrom_1 = Some(chrom.to_string());
        self.pos_1 = Some(RawField::Text(pos.to_string()));
        self.strand_1 = Some(RawField::Text(strand.to_string()));
        self
    }

    /// Second breakend from unparsed text fields.
    pub fn second_str(mut self, chrom: &str, pos: &str, strand: &str) -> Self {
        self.chrom_2 = Some(chrom.to_string());
        self.pos_2 = Some(RawField::Text(pos.to_string()));
        self.strand_2 = Some(RawField::Text(strand.to_string()));
        self
    }

    /// SV classification.
    pub fn sv_type(mut self, sv_type: impl Into<String>) -> Self {
        self.sv_type = Some(sv_type.into());
        self
    }

    /// Validate all fields and produce the record.
    ///
    /// `sv_type` is optional and defaults to an empty string; every other
    /// field is required.
    pub fn build(self) -> Result<BreakpointRecord, InvalidRecordError> {
        let id = required_text(self.id, "breakpoint_id")?;
        let caller = required_text(self.caller, "caller")?;
        let chrom_1 = required_text(self.chrom_1, "chromosome_1")?;
        let chrom_2 = required_text(self.chrom_2, "chromosome_2")?;
        let pos_1 = position(self.pos_1, "position_1")?;
        let pos_2 = position(self.pos_2, "position_2")?;
        let strand_1 = strand(self.strand_1, "strand_1")?;
        let strand_2 = strand(self.strand_2, "strand_2")?;

        Ok(BreakpointRecord {
            id: Arc::from(id),
            caller: Arc::from(caller),
            first: Breakend::new(chrom_1, pos_1, strand_1),
            second: Breakend::new(chrom_2, pos_2, strand_2),
            sv_type: Arc::from(self.sv_type.unwrap_or_default()),
        })
    }
}

fn required_text(
    value: Option<String>,
    field: &'static str,
) -> Result<String, InvalidRecordError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(InvalidRecordError::MissingField { field }),
    }
}

fn position(
    value: Option<RawField<u64>>,
    field: &'static str,
) -> Result<u64, InvalidRecordError> {
    match value {
        Some(RawField::Parsed(pos)) => Ok(pos),
        Some(RawField::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(InvalidRecordError::MissingField { field });
            }
            trimmed
                .parse::<u64>()
                .map_err(|_| InvalidRecordError::InvalidPosition { field, value: text })
        }
        None => Err(InvalidRecordError::MissingField { field }),
    }
}

fn strand(
    value: Option<RawField<Strand>>,
    field: &'static str,
) -> Result<Strand, InvalidRecordError> {
    match value {
        Some(RawField::Parsed(strand)) => Ok(strand),
        Some(RawField::Text(text)) => {
            if text.trim().is_empty() {
                return Err(InvalidRecordError::MissingField { field });
            }
            text.parse::<Strand>()
                .map_err(|_| InvalidRecordError::InvalidStrand { field, value: text })
        }
        None => Err(InvalidRecordError::MissingField { field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_record_from_typed_fields() {
        let record = BreakpointRecord::builder()
            .id("7")
            .caller("destruct")
            .first("1", 100, Strand::Plus)
            .second("2", 500, Strand::Minus)
            .sv_type("translocation")
            .build()
            .unwrap();

        assert_eq!(record.id(), "7");
        assert_eq!(record.chrom_1(), "1");
        assert_eq!(record.pos_2(), 500);
        assert_eq!(record.strand_2(), Strand::Minus);
        assert_eq!(record.sv_type(), "translocation");
    }

    #[test]
    fn rejects_non_numeric_position() {
        let err = BreakpointRecord::builder()
            .id("1")
            .caller("lumpy")
            .first_str("1", "12a", "+")
            .second_str("1", "200", "-")
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            InvalidRecordError::InvalidPosition {
                field: "position_1",
                value: "12a".to_string()
            }
        );
    }

    #[test]
    fn rejects_negative_position() {
        let err = BreakpointRecord::builder()
            .id("1")
            .caller("lumpy")
            .first_str("1", "100", "+")
            .second_str("1", "-5", "-")
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            InvalidRecordError::InvalidPosition { field: "position_2", .. }
        ));
    }

    #[test]
    fn rejects_unknown_strand() {
        let err = BreakpointRecord::builder()
            .id("1")
            .caller("svaba")
            .first_str("1", "100", "1")
            .second_str("1", "200", "-")
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            InvalidRecordError::InvalidStrand { field: "strand_1", .. }
        ));
    }

    #[test]
    fn rejects_missing_breakend() {
        let err = BreakpointRecord::builder()
            .id("1")
            .caller("gridss")
            .first("1", 100, Strand::Plus)
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            InvalidRecordError::MissingField {
                field: "chromosome_2"
            }
        );
    }

    #[test]
    fn qualified_id_carries_caller_suffix() {
        let record = BreakpointRecord::builder()
            .id("42")
            .caller("svaba")
            .first("3", 1, Strand::Plus)
            .second("3", 2, Strand::Plus)
            .build()
            .unwrap();

        let qualified = record.qualified_by_caller();
        assert_eq!(qualified.id(), "42_svaba");
        assert_eq!(qualified.caller(), "svaba");
        assert_eq!(record.id(), "42");
    }
}

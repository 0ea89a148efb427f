use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use thiserror::Error;
use tracing::debug;

use crate::breakpoint::{BreakpointRecord, InvalidRecordError};

/// Errors reading or writing delimited breakpoint tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// A column required to build breakpoints is absent from the header.
    #[error("table is missing required column '{column}'")]
    SchemaMismatch {
        /// Name of the missing column.
        column: String,
    },

    /// A row could not be turned into a breakpoint.
    #[error("invalid breakpoint on line {line}: {source}")]
    InvalidRecord {
        /// 1-based line number in the input.
        line: u64,
        /// Underlying validation failure.
        source: InvalidRecordError,
    },

    /// Delimited-text failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendered output was not UTF-8.
    #[error("rendered table is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Column layout of a delimited breakpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    /// destruct output: ids in `prediction_id`, caller is always `destruct`.
    Destruct,
    /// Consensus output: ids in `breakpoint_id` (or `prediction_id`), caller
    /// from the `caller` column when present.
    Consensus,
}

impl TableLayout {
    fn id_columns(self) -> &'static [&'static str] {
        match self {
            TableLayout::Destruct => &["prediction_id"],
            TableLayout::Consensus => &["breakpoint_id", "prediction_id"],
        }
    }

    fn default_caller(self) -> &'static str {
        match self {
            TableLayout::Destruct => "destruct",
            TableLayout::Consensus => "consensus",
        }
    }
}

const BREAKEND_COLUMNS: [&str; 6] = [
    "chromosome_1",
    "position_1",
    "strand_1",
    "chromosome_2",
    "position_2",
    "strand_2",
];

#[derive(Debug)]
struct ColumnMap {
    id: usize,
    breakends: [usize; 6],
    sv_type: Option<usize>,
    caller: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord, layout: TableLayout) -> Result<Self, TableError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let id = layout
            .id_columns()
            .iter()
            .find_map(|name| find(*name))
            .ok_or_else(|| TableError::SchemaMismatch {
                column: layout.id_columns()[0].to_string(),
            })?;

        let mut breakends = [0usize; 6];
        for (slot, name) in breakends.iter_mut().zip(BREAKEND_COLUMNS) {
            *slot = find(name).ok_or_else(|| TableError::SchemaMismatch {
                column: name.to_string(),
            })?;
        }

        let caller = match layout {
            TableLayout::Consensus => find("caller"),
            TableLayout::Destruct => None,
        };

        Ok(Self {
            id,
            breakends,
            sv_type: find("type"),
            caller,
        })
    }
}

/// Reads breakpoint records from comma- or tab-delimited text.
///
/// The header is checked before any row is parsed; every row must yield a
/// valid record or the whole read fails.
#[derive(Debug, Clone)]
pub struct TableReader {
    layout: TableLayout,
    delimiter: u8,
}

impl TableReader {
    /// Reader for the given layout, comma-delimited.
    pub fn new(layout: TableLayout) -> Self {
        Self {
            layout,
            delimiter: b',',
        }
    }

    /// Use a different field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read from a file path.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<BreakpointRecord>, TableError> {
        let file = File::open(path.as_ref())?;
        self.read(file)
    }

    /// Read from any byte source.
    pub fn read<R: Read>(&self, source: R) -> Result<Vec<BreakpointRecord>, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        let columns = ColumnMap::resolve(&headers, self.layout)?;

        let mut records = Vec::new();
        for (idx, row) in reader.records().enumerate() {
            let row = row?;
            let line = row
                .position()
                .map(|pos| pos.line())
                .unwrap_or(idx as u64 + 2);
            let record = self
                .build(&row, &columns)
                .map_err(|source| TableError::InvalidRecord { line, source })?;
            records.push(record);
        }

        debug!(
            layout = ?self.layout,
            records = records.len(),
            "read breakpoint table"
        );
        Ok(records)
    }

    fn build(
        &self,
        row: &StringRecord,
        columns: &ColumnMap,
    ) -> Result<BreakpointRecord, InvalidRecordError> {
        let field = |idx: usize| row.get(idx).unwrap_or("");
        let [c1, p1, s1, c2, p2, s2] = columns.breakends.map(field);

        let caller = columns
            .caller
            .map(field)
            .filter(|caller| !caller.trim().is_empty())
            .unwrap_or(self.layout.default_caller());

        BreakpointRecord::builder()
            .id(field(columns.id))
            .caller(caller)
            .first_str(c1, p1, s1)
            .second_str(c2, p2, s2)
            .sv_type(columns.sv_type.map(field).unwrap_or(""))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoint::Strand;
    use test_case::test_case;

    const DESTRUCT: &str = "\
prediction_id,chromosome_1,position_1,strand_1,chromosome_2,position_2,strand_2,type
11,1,100,+,2,500,-,translocation
12,X,2000,-,X,9000,+,duplication
";

    #[test]
    fn reads_destruct_table() {
        let records = TableReader::new(TableLayout::Destruct)
            .read(DESTRUCT.as_bytes())
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id(), "11");
        assert_eq!(records[0].caller(), "destruct");
        assert_eq!(records[1].chrom_1(), "X");
        assert_eq!(records[1].strand_2(), Strand::Plus);
        assert_eq!(records[1].sv_type(), "duplication");
    }

    #[test]
    fn consensus_table_prefers_breakpoint_id_and_keeps_caller() {
        let input = "\
prediction_id,breakpoint_id,chromosome_1,position_1,strand_1,chromosome_2,position_2,strand_2,type,caller
3,3_destruct,1,100,+,2,500,-,translocation,\"destruct,lumpy\"
";
        let records = TableReader::new(TableLayout::Consensus)
            .read(input.as_bytes())
            .unwrap();

        assert_eq!(records[0].id(), "3_destruct");
        assert_eq!(records[0].caller(), "destruct,lumpy");
    }

    #[test]
    fn tab_delimited_input() {
        let input = DESTRUCT.replace(',', "\t");
        let records = TableReader::new(TableLayout::Destruct)
            .with_delimiter(b'\t')
            .read(input.as_bytes())
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test_case("chromosome_1,position_1,strand_1,chromosome_2,position_2,strand_2", "prediction_id"; "missing id")]
    #[test_case("prediction_id,chromosome_1,position_1,strand_1,chromosome_2,strand_2", "position_2"; "missing position")]
    #[test_case("prediction_id,chromosome_1,position_1,chromosome_2,position_2,strand_2", "strand_1"; "missing strand")]
    fn missing_columns_are_schema_errors(header: &str, expected: &str) {
        let input = format!("{header}\n");
        let err = TableReader::new(TableLayout::Destruct)
            .read(input.as_bytes())
            .unwrap_err();

        match err {
            TableError::SchemaMismatch { column } => assert_eq!(column, expected),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn consensus_without_any_id_column_names_breakpoint_id() {
        let input = "chromosome_1,position_1,strand_1,chromosome_2,position_2,strand_2\n";
        let err = TableReader::new(TableLayout::Consensus)
            .read(input.as_bytes())
            .unwrap_err();
        assert!(matches!(err, TableError::SchemaMismatch { column } if column == "breakpoint_id"));
    }

    #[test_case("1,1,1x0,+,2,500,-,del"; "bad position")]
    #[test_case("1,1,100,?,2,500,-,del"; "bad strand")]
    #[test_case(",1,100,+,2,500,-,del"; "empty id")]
    fn malformed_rows_report_their_line(row: &str) {
        let input = format!(
            "prediction_id,chromosome_1,position_1,strand_1,chromosome_2,position_2,strand_2,type\n\
             9,1,100,+,2,500,-,del\n{row}\n"
        );
        let err = TableReader::new(TableLayout::Destruct)
            .read(input.as_bytes())
            .unwrap_err();
        assert!(matches!(err, TableError::InvalidRecord { line: 3, .. }), "{err}");
    }

    #[test]
    fn header_only_table_is_empty() {
        let input = "prediction_id,chromosome_1,position_1,strand_1,chromosome_2,position_2,strand_2\n";
        let records = TableReader::new(TableLayout::Destruct)
            .read(input.as_bytes())
            .unwrap();
        assert!(records.is_empty());
    }
}

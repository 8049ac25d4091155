//! CSV parsing for bulk mapping imports.
//!
//! The first line names the columns. `source`, `user_id`, `code`, and `aim`
//! must each appear exactly once, in any order, and nothing else may. Every
//! following line becomes one [`SourceMapping`].

use serde::Deserialize;

use crate::domain::{ParameterField, ParameterMapping, SourceId};

/// Column holding the source identifier.
pub const SOURCE_COLUMN: &str = "source";

/// A mapping row destined for the `mapping` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMapping {
    /// Source the mapping applies to.
    pub source: SourceId,
    /// Parameter names the source uses.
    pub mapping: ParameterMapping,
}

impl SourceMapping {
    /// Pair a source with its mapping.
    pub fn new(source: SourceId, mapping: ParameterMapping) -> Self {
        Self { source, mapping }
    }
}

/// Reasons a mapping CSV is rejected before touching the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingImportError {
    /// The upload had no content.
    #[error("Empty file")]
    Empty,
    /// The CSV reader could not parse the upload.
    #[error("Malformed CSV: {message}")]
    Malformed {
        /// Reader diagnostic.
        message: String,
    },
    /// A required column was absent from the header.
    #[error("Missing column <{column}>")]
    MissingColumn {
        /// Column name.
        column: String,
    },
    /// The header named a column the `mapping` table does not have.
    #[error("Unknown column <{column}>")]
    UnknownColumn {
        /// Column name.
        column: String,
    },
    /// The header named a column twice.
    #[error("Duplicate column <{column}>")]
    DuplicateColumn {
        /// Column name.
        column: String,
    },
    /// A cell was blank.
    #[error("Empty value for column <{column}> on line {line}")]
    EmptyValue {
        /// Column name.
        column: String,
        /// One-based line number in the upload.
        line: u64,
    },
}

impl From<csv::Error> for MappingImportError {
    fn from(err: csv::Error) -> Self {
        Self::Malformed {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MappingCsvRow {
    source: String,
    user_id: String,
    code: String,
    aim: String,
}

impl MappingCsvRow {
    fn cells(&self) -> [(&'static str, &str); 4] {
        [
            (SOURCE_COLUMN, self.source.as_str()),
            (ParameterField::UserId.column(), self.user_id.as_str()),
            (ParameterField::Code.column(), self.code.as_str()),
            (ParameterField::Aim.column(), self.aim.as_str()),
        ]
    }
}

fn is_known_column(column: &str) -> bool {
    column == SOURCE_COLUMN || ParameterField::from_column(column).is_some()
}

fn validate_header(header: &csv::StringRecord) -> Result<(), MappingImportError> {
    let mut seen: Vec<&str> = Vec::with_capacity(header.len());
    for column in header {
        if !is_known_column(column) {
            return Err(MappingImportError::UnknownColumn {
                column: column.to_owned(),
            });
        }
        if seen.contains(&column) {
            return Err(MappingImportError::DuplicateColumn {
                column: column.to_owned(),
            });
        }
        seen.push(column);
    }

    let required =
        std::iter::once(SOURCE_COLUMN).chain(ParameterField::ALL.map(ParameterField::column));
    for column in required {
        if !seen.contains(&column) {
            return Err(MappingImportError::MissingColumn {
                column: column.to_owned(),
            });
        }
    }
    Ok(())
}

fn to_source_mapping(row: MappingCsvRow, line: u64) -> Result<SourceMapping, MappingImportError> {
    if let Some((column, _)) = row.cells().into_iter().find(|(_, value)| value.is_empty()) {
        return Err(MappingImportError::EmptyValue {
            column: column.to_owned(),
            line,
        });
    }

    let source = SourceId::new(row.source).map_err(|_| MappingImportError::EmptyValue {
        column: SOURCE_COLUMN.to_owned(),
        line,
    })?;
    Ok(SourceMapping::new(
        source,
        ParameterMapping::new(row.user_id, row.code, row.aim),
    ))
}

/// Parse a mapping upload.
///
/// Cells are trimmed. A header with no data lines yields an empty list.
///
/// # Errors
/// Returns [`MappingImportError`] describing the first problem found.
///
/// # Examples
/// ```
/// use postback::domain::{ParameterField, parse_mapping_csv};
///
/// let rows = parse_mapping_csv(b"aim,source,user_id,code\ngoal,acme,uid,clk\n")
///     .expect("valid upload");
/// assert_eq!(rows[0].source.as_ref(), "acme");
/// assert_eq!(rows[0].mapping.parameter_name(ParameterField::Aim), "goal");
/// ```
pub fn parse_mapping_csv(bytes: &[u8]) -> Result<Vec<SourceMapping>, MappingImportError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(MappingImportError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);
    let header = reader.headers()?.clone();
    validate_header(&header)?;

    let mut mappings = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);
        let row: MappingCsvRow = record.deserialize(Some(&header))?;
        mappings.push(to_source_mapping(row, line)?);
    }
    Ok(mappings)
}

use thiserror::Error;

/// Result type alias for record mapping operations
pub type Result<T> = std::result::Result<T, MappingError>;

/// Errors that can occur while mapping CSV rows to records and back
#[derive(Error, Debug)]
pub enum MappingError {
    /// A column is mapped to a structured field that is not embedded
    #[error("Unsupported field type: {record}.{field} is a structured field mapped to column '{column}' (embed it or implement Primitive)")]
    UnsupportedFieldType {
        record: &'static str,
        field: String,
        column: String,
    },

    /// The output container cannot hold every decoded record
    #[error("Capacity problem: cannot store {needed} records in {container} of length {capacity}")]
    Capacity {
        container: &'static str,
        needed: usize,
        capacity: usize,
    },

    /// The input header does not cover every declared column
    #[error("Not all declared fields of {record} were matched to an input column header (missing: {})", .missing.join(", "))]
    SchemaMismatch {
        record: &'static str,
        missing: Vec<String>,
    },

    /// A CSV cell could not be converted to its field type
    #[error("Row {row}, column '{column}': cannot parse '{value}' as {expected} for field {field}: {reason}")]
    Parse {
        row: usize,
        column: String,
        field: String,
        expected: &'static str,
        value: String,
        reason: String,
    },

    /// A field value could not be converted to text
    #[error("Record {index} of {record}: cannot format field {field}: {reason}")]
    Format {
        record: &'static str,
        index: usize,
        field: String,
        reason: String,
    },

    /// String encoding error
    #[error("String encoding error: {0}")]
    EncodingError(String),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<csv::Error> for MappingError {
    fn from(err: csv::Error) -> Self {
        MappingError::CsvError(err.to_string())
    }
}

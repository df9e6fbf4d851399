use thiserror::Error;

macro_rules! invalid_argument {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidArgument {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidArgument {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors are attributed with the most specific location available while they travel upwards:
/// a codec failure becomes a [`Error::Schema`] carrying the column name, which in turn becomes
/// a [`Error::Table`] carrying the table name and row index. Nothing is swallowed or replaced
/// by a default value on the way.
///
/// # Error Categories
///
/// ## Construction Errors
/// - [`Error::InvalidArgument`] - Malformed schema specification or table geometry
///
/// ## Text Representation Errors
/// - [`Error::InvalidText`] - A textual value violates the column's text domain
/// - [`Error::MissingData`] - A required row or field is absent from a text record
///
/// ## Binary Errors
/// - [`Error::OutOfBounds`] - A read or write would run past the end of the byte buffer
/// - [`Error::ValueType`] - A cell holds a value of the wrong kind for its column
/// - [`Error::ValueOutOfRange`] - A value does not fit the column's binary width
/// - [`Error::ValueLength`] - A byte sequence does not match the column's width
///
/// ## Attributed Errors
/// - [`Error::Schema`] - Any of the above, tagged with the column it occurred in
/// - [`Error::Table`] - Any of the above, tagged with table, row and column
/// - [`Error::IndexOutOfRange`] - Cell access outside the table's dimensions
///
/// # Examples
///
/// ```rust
/// use romtable::{Error, tables::{ColumnCodec, Schema, Table}};
/// use std::sync::Arc;
///
/// let schema = Arc::new(Schema::single(ColumnCodec::integer("value", 2)?));
/// match Table::with_size(schema, "Prices", 7) {
///     Err(Error::InvalidArgument { message, .. }) => println!("Rejected: {message}"),
///     Err(e) => println!("Other error: {e}"),
///     Ok(_) => unreachable!(),
/// }
/// # Ok::<(), romtable::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed construction input.
    ///
    /// Raised for table sizes that are not a multiple of the row width, row counts that are
    /// not divisible by a matrix height, unknown column types and column specifications that
    /// lack required attributes. The source location where the problem was detected is kept
    /// for debugging purposes.
    #[error("Invalid argument - {file}:{line}: {message}")]
    InvalidArgument {
        /// The message to be printed for the InvalidArgument error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A textual value does not satisfy the text domain of its column.
    #[error("Invalid text representation: {0}")]
    InvalidText(String),

    /// A required row or field is absent from a text record.
    #[error("Missing data")]
    MissingData,

    /// A failure that occurred while converting a specific column.
    #[error("Column[{field}]: {cause}")]
    Schema {
        /// Name of the offending column
        field: String,
        /// The underlying failure
        #[source]
        cause: Box<Error>,
    },

    /// A failure elevated to the table level, carrying the full location.
    ///
    /// This is the error surfaced to callers of the whole-table operations.
    #[error("Table[{table}], row[{row}]{}: {cause}", .field.as_ref().map(|f| format!(", column[{f}]")).unwrap_or_default())]
    Table {
        /// Diagnostic name of the table
        table: String,
        /// Index of the row that failed
        row: usize,
        /// Column that failed, if the failure could be attributed to one
        field: Option<String>,
        /// The underlying failure
        #[source]
        cause: Box<Error>,
    },

    /// Out-of-range cell access.
    #[error("Cannot access index[{row},{col}] of table with size[{rows},{cols}]")]
    IndexOutOfRange {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Number of rows of the table
        rows: usize,
        /// Number of columns of the table
        cols: usize,
    },

    /// An out of bound access was attempted on the byte buffer.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// A cell value has the wrong kind for the column it is encoded with.
    #[error("Expected a {expected} value but found {found}")]
    ValueType {
        /// Kind of value the column accepts
        expected: &'static str,
        /// Kind of value that was provided
        found: &'static str,
    },

    /// An integer does not fit the binary width of its column.
    #[error("Value[{value}] does not fit in {width} byte(s)")]
    ValueOutOfRange {
        /// The offending value
        value: u128,
        /// Width of the column in bytes
        width: usize,
    },

    /// A byte sequence does not match the width of its column.
    #[error("Byte sequence of length[{found}] does not match column width[{expected}]")]
    ValueLength {
        /// Width of the column in bytes
        expected: usize,
        /// Length of the provided sequence
        found: usize,
    },

    /// Failure while (de)serializing a text document.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading or writing a text document.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the `(table, row, column)` attribution of a table-level error.
    ///
    /// Schema-level errors report only their column. Every other kind has no location.
    #[must_use]
    pub fn location(&self) -> Option<(Option<&str>, Option<usize>, Option<&str>)> {
        match self {
            Error::Table {
                table, row, field, ..
            } => Some((Some(table.as_str()), Some(*row), field.as_deref())),
            Error::Schema { field, .. } => Some((None, None, Some(field.as_str()))),
            _ => None,
        }
    }

    /// Walks the attribution chain down to the error that started it.
    #[must_use]
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while let Error::Schema { cause, .. } | Error::Table { cause, .. } = current {
            current = cause.as_ref();
        }
        current
    }
}

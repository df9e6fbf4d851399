//! Tables: fixed-size grids of schema-shaped rows bound to a byte region.
//!
//! A [`Table`] owns its value grid and nothing else; the schema is shared configuration. All
//! whole-table operations walk rows in order and columns in schema order, advancing through the
//! buffer by each column's width, and attribute any failure to the table, row and column it
//! happened in.
//!
//! # Examples
//!
//! ```rust
//! use romtable::prelude::*;
//!
//! let schema = Schema::compile(&[
//!     ColumnSpec::new("hp").size(2),
//!     ColumnSpec::new("boss").column_type("boolean"),
//! ])?
//! .into_shared();
//!
//! let rom = vec![0x10u8, 0x00, 0x00, 0xE8, 0x03, 0x01];
//! let mut table = Table::with_size(schema, "Enemies", 6)?;
//! table.decode(&rom, 0)?;
//! assert_eq!(table.cell(1, 0)?, &Value::Int(1000));
//!
//! let records = table.export_text()?;
//! assert_eq!(records[&1].get("boss"), Some(&TextValue::from(true)));
//! # Ok::<(), romtable::Error>(())
//! ```

use std::{
    io::{Read, Write},
    sync::Arc,
};

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    io::ByteBuffer,
    tables::{text, Schema, TextRecords, Value},
    Error, Result,
};

/// A grid of `row_count` rows sharing one [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    schema: Arc<Schema>,
    name: String,
    row_count: usize,
    values: Vec<Vec<Value>>,
}

impl Table {
    /// Name given to tables that are not labelled by the caller.
    pub const DEFAULT_NAME: &'static str = "Anonymous Table";

    /// Creates a table covering exactly `size` bytes.
    ///
    /// The row count is `size / row_byte_width`. Every cell starts out [`Value::Empty`].
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `size` is not a multiple of the schema's row
    /// width.
    pub fn with_size(schema: Arc<Schema>, name: impl Into<String>, size: usize) -> Result<Self> {
        let name = name.into();
        let row_width = schema.row_byte_width();
        if row_width == 0 || size % row_width != 0 {
            return Err(invalid_argument!(
                "Table[{}] has size[{}], which is not a multiple of its row size[{}]",
                name,
                size,
                row_width
            ));
        }

        Ok(Self::with_rows(schema, name, size / row_width))
    }

    /// Creates a table of `row_count` rows. Every cell starts out [`Value::Empty`].
    #[must_use]
    pub fn with_rows(schema: Arc<Schema>, name: impl Into<String>, row_count: usize) -> Self {
        Table {
            values: empty_grid(&schema, row_count),
            schema,
            name: name.into(),
            row_count,
        }
    }

    /// Diagnostic name used in error messages
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared row schema
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.schema.column_count()
    }

    /// Size in bytes of the region this table occupies
    #[must_use]
    pub fn size(&self) -> usize {
        self.row_count * self.schema.row_byte_width()
    }

    /// Returns the value at (`row`, `col`).
    ///
    /// # Errors
    /// Returns [`crate::Error::IndexOutOfRange`] outside the table's dimensions.
    pub fn cell(&self, row: usize, col: usize) -> Result<&Value> {
        self.values
            .get(row)
            .and_then(|values| values.get(col))
            .ok_or_else(|| self.out_of_range(row, col))
    }

    /// Replaces the value at (`row`, `col`).
    ///
    /// # Errors
    /// Returns [`crate::Error::IndexOutOfRange`] outside the table's dimensions.
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<Value>) -> Result<()> {
        let error = self.out_of_range(row, col);
        let cell = self
            .values
            .get_mut(row)
            .and_then(|values| values.get_mut(col))
            .ok_or(error)?;
        *cell = value.into();
        Ok(())
    }

    /// Returns all values of `row`, in column order.
    ///
    /// # Errors
    /// Returns [`crate::Error::IndexOutOfRange`] if `row` does not exist.
    pub fn row(&self, row: usize) -> Result<&[Value]> {
        self.values
            .get(row)
            .map(Vec::as_slice)
            .ok_or_else(|| self.out_of_range(row, 0))
    }

    /// Iterates all rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.values.iter().map(Vec::as_slice)
    }

    /// Populates every cell from `buffer`, starting at `offset`.
    ///
    /// The grid is replaced only if every row decodes; on failure the previous contents stay
    /// untouched.
    ///
    /// # Errors
    /// Returns [`crate::Error::Table`] naming the row and column that failed.
    pub fn decode<B: ByteBuffer + ?Sized>(&mut self, buffer: &B, offset: usize) -> Result<()> {
        trace!(table = %self.name, rows = self.row_count, offset, "decoding table");

        let mut grid = Vec::with_capacity(self.row_count);
        let mut position = offset;
        for row in 0..self.row_count {
            let mut values = Vec::with_capacity(self.schema.column_count());
            for column in self.schema.columns() {
                let value = column
                    .decode(buffer, position)
                    .map_err(|cause| self.located(row, Some(column.name()), cause))?;
                values.push(value);
                position += column.width();
            }
            grid.push(values);
        }

        self.values = grid;
        Ok(())
    }

    /// Writes every cell into `buffer`, starting at `offset`, and returns `offset`.
    ///
    /// Rows written before a failure are not rolled back.
    ///
    /// # Errors
    /// Returns [`crate::Error::Table`] naming the row and column that failed.
    pub fn encode<B: ByteBuffer + ?Sized>(&self, buffer: &mut B, offset: usize) -> Result<usize> {
        trace!(table = %self.name, rows = self.row_count, offset, "encoding table");

        let mut position = offset;
        for (row, values) in self.values.iter().enumerate() {
            for (column, value) in self.schema.columns().iter().zip(values) {
                column
                    .encode(buffer, position, value)
                    .map_err(|cause| self.located(row, Some(column.name()), cause))?;
                position += column.width();
            }
        }

        Ok(offset)
    }

    /// Populates every cell from text records keyed by row index.
    ///
    /// Rows `0..row_count` must all be present; additional rows are ignored. The grid is
    /// replaced only on full success.
    ///
    /// # Errors
    /// Returns [`crate::Error::Table`] with [`crate::Error::MissingData`] for an absent row, or
    /// naming the row and column whose text was invalid.
    pub fn import_text(&mut self, records: &TextRecords) -> Result<()> {
        trace!(table = %self.name, rows = self.row_count, "importing table text");

        let mut grid = empty_grid(&self.schema, self.row_count);
        for (row, values) in grid.iter_mut().enumerate() {
            let record = records
                .get(&row)
                .ok_or_else(|| self.located(row, None, Error::MissingData))?;
            self.schema
                .row_from_text(record, values)
                .map_err(|error| self.located_row(row, error))?;
        }

        self.values = grid;
        Ok(())
    }

    /// Formats every row as a text record keyed by row index.
    ///
    /// # Errors
    /// Returns [`crate::Error::Table`] naming the row and column that could not be formatted,
    /// for example a cell that was never populated.
    pub fn export_text(&self) -> Result<TextRecords> {
        trace!(table = %self.name, rows = self.row_count, "exporting table text");

        self.values
            .iter()
            .enumerate()
            .map(|(row, values)| {
                self.schema
                    .row_to_text(values)
                    .map(|record| (row, record))
                    .map_err(|error| self.located_row(row, error))
            })
            .collect()
    }

    /// Exports the table and writes it as a text document.
    ///
    /// Hexadecimal integer columns are rendered in `0x..` notation.
    ///
    /// # Errors
    /// See [`Table::export_text`]; additionally [`crate::Error::Io`] if writing fails.
    pub fn write_text_document<W: Write>(&self, mut writer: W) -> Result<()> {
        let records = self.export_text()?;
        let document = text::to_document(&records, &self.schema.hex_columns())?;
        writer.write_all(document.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    /// Reads a text document and imports it.
    ///
    /// # Errors
    /// Returns [`crate::Error::Io`] or [`crate::Error::Json`] for an unreadable document,
    /// otherwise see [`Table::import_text`].
    pub fn read_text_document<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let mut document = String::new();
        reader.read_to_string(&mut document)?;
        let records: TextRecords = text::from_document(&document, &self.schema.hex_columns())?;
        self.import_text(&records)
    }

    fn out_of_range(&self, row: usize, col: usize) -> Error {
        Error::IndexOutOfRange {
            row,
            col,
            rows: self.row_count,
            cols: self.schema.column_count(),
        }
    }

    pub(crate) fn located(&self, row: usize, field: Option<&str>, cause: Error) -> Error {
        debug!(table = %self.name, row, field, error = %cause, "table conversion failed");
        Error::Table {
            table: self.name.clone(),
            row,
            field: field.map(ToString::to_string),
            cause: Box::new(cause),
        }
    }

    fn located_row(&self, row: usize, error: Error) -> Error {
        match error {
            Error::Schema { field, cause } => self.located(row, Some(&field), *cause),
            other => self.located(row, None, other),
        }
    }
}

fn empty_grid(schema: &Schema, row_count: usize) -> Vec<Vec<Value>> {
    vec![vec![Value::Empty; schema.column_count()]; row_count]
}

/// Decodes several independent tables from one buffer in parallel.
///
/// Each entry pairs a table with the offset its region starts at. Tables are distributed over
/// the rayon thread pool; every single table is still decoded sequentially.
///
/// # Errors
/// Returns the error of a table that failed to decode. Tables that succeeded keep their new
/// contents.
pub fn decode_tables<B>(buffer: &B, tables: &mut [(&mut Table, usize)]) -> Result<()>
where
    B: ByteBuffer + Sync + ?Sized,
{
    tables
        .par_iter_mut()
        .try_for_each(|(table, offset)| table.decode(buffer, *offset))
}

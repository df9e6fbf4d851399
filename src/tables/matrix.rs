//! Tables addressed as two-dimensional grids.
//!
//! A [`MatrixTable`] is a plain [`Table`] whose rows are presented as a
//! `matrix_height x matrix_width` grid in text form. Row `r` appears at
//! `(y, x) = (r / matrix_width, r % matrix_width)`. Binary decoding and encoding are exactly
//! those of the underlying table and are reached through [`std::ops::Deref`].

use std::{
    io::{Read, Write},
    ops::{Deref, DerefMut},
    sync::Arc,
};

use tracing::trace;

use crate::{
    tables::{text, MatrixTextRecords, Schema, Table, TextRecords},
    Error, Result,
};

/// A [`Table`] with two-dimensional text addressing.
///
/// # Examples
///
/// ```rust
/// use romtable::prelude::*;
/// use std::sync::Arc;
///
/// let schema = Arc::new(Schema::single(ColumnCodec::integer("tile", 1)?));
/// let mut map = MatrixTable::with_size(schema, "Map", 6, 2)?;
/// map.decode(&[1u8, 2, 3, 4, 5, 6], 0)?;
///
/// let records = map.export_text()?;
/// assert_eq!(records[&1][&0], TextValue::from(4_u64));
/// # Ok::<(), romtable::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixTable {
    table: Table,
    matrix_height: usize,
    matrix_width: usize,
}

impl MatrixTable {
    /// Reinterprets `table` as a grid `matrix_height` rows tall.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `matrix_height` is zero or does not divide
    /// the table's row count.
    pub fn new(table: Table, matrix_height: usize) -> Result<Self> {
        if matrix_height == 0 || table.row_count() % matrix_height != 0 {
            return Err(invalid_argument!(
                "Table[{}] has {} rows, which cannot be arranged into a matrix of height[{}]",
                table.name(),
                table.row_count(),
                matrix_height
            ));
        }

        Ok(MatrixTable {
            matrix_width: table.row_count() / matrix_height,
            table,
            matrix_height,
        })
    }

    /// Creates a matrix table covering exactly `size` bytes.
    ///
    /// # Errors
    /// See [`Table::with_size`] and [`MatrixTable::new`].
    pub fn with_size(
        schema: Arc<Schema>,
        name: impl Into<String>,
        size: usize,
        matrix_height: usize,
    ) -> Result<Self> {
        Self::new(Table::with_size(schema, name, size)?, matrix_height)
    }

    /// Number of cells per matrix row
    #[must_use]
    pub fn matrix_width(&self) -> usize {
        self.matrix_width
    }

    /// Number of matrix rows
    #[must_use]
    pub fn matrix_height(&self) -> usize {
        self.matrix_height
    }

    /// The underlying flat table
    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The underlying flat table, mutably
    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    /// Unwraps the underlying flat table.
    #[must_use]
    pub fn into_table(self) -> Table {
        self.table
    }

    /// Populates every cell from text records keyed by `[y][x]`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Table`] with [`crate::Error::MissingData`] for the flattened row of
    /// an absent `y` or `x`, otherwise see [`Table::import_text`].
    pub fn import_text(&mut self, records: &MatrixTextRecords) -> Result<()> {
        trace!(
            table = self.table.name(),
            height = self.matrix_height,
            width = self.matrix_width,
            "importing matrix text"
        );

        let mut flat = TextRecords::new();
        for y in 0..self.matrix_height {
            for x in 0..self.matrix_width {
                let row = y * self.matrix_width + x;
                let record = records
                    .get(&y)
                    .and_then(|line| line.get(&x))
                    .ok_or_else(|| self.table.located(row, None, Error::MissingData))?;
                flat.insert(row, record.clone());
            }
        }

        self.table.import_text(&flat)
    }

    /// Formats every row as a text record keyed by `[y][x]`.
    ///
    /// # Errors
    /// See [`Table::export_text`].
    pub fn export_text(&self) -> Result<MatrixTextRecords> {
        let mut records = MatrixTextRecords::new();
        for (row, record) in self.table.export_text()? {
            records
                .entry(row / self.matrix_width)
                .or_default()
                .insert(row % self.matrix_width, record);
        }
        Ok(records)
    }

    /// Exports the matrix and writes it as a text document.
    ///
    /// # Errors
    /// See [`MatrixTable::export_text`]; additionally [`crate::Error::Io`] if writing fails.
    pub fn write_text_document<W: Write>(&self, mut writer: W) -> Result<()> {
        let records = self.export_text()?;
        let document = text::to_document(&records, &self.table.schema().hex_columns())?;
        writer.write_all(document.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    /// Reads a text document and imports it.
    ///
    /// # Errors
    /// Returns [`crate::Error::Io`] or [`crate::Error::Json`] for an unreadable document,
    /// otherwise see [`MatrixTable::import_text`].
    pub fn read_text_document<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let mut document = String::new();
        reader.read_to_string(&mut document)?;
        let records: MatrixTextRecords =
            text::from_document(&document, &self.table.schema().hex_columns())?;
        self.import_text(&records)
    }
}

impl Deref for MatrixTable {
    type Target = Table;

    fn deref(&self) -> &Self::Target {
        &self.table
    }
}

impl DerefMut for MatrixTable {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{ColumnCodec, ColumnSpec, TextValue, Value};
    use std::collections::BTreeMap;

    fn tile_schema() -> Arc<Schema> {
        Arc::new(Schema::single(ColumnCodec::integer("tile", 1).unwrap()))
    }

    #[test]
    fn geometry() {
        let matrix = MatrixTable::with_size(tile_schema(), "Map", 12, 3).unwrap();
        assert_eq!(matrix.matrix_height(), 3);
        assert_eq!(matrix.matrix_width(), 4);
        assert_eq!(matrix.row_count(), 12);

        assert!(matches!(
            MatrixTable::with_size(tile_schema(), "Map", 12, 5),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            MatrixTable::new(Table::with_rows(tile_schema(), "Map", 4), 0),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn reindexing() {
        let rom: Vec<u8> = (0..12).collect();
        let mut matrix = MatrixTable::with_size(tile_schema(), "Map", 12, 3).unwrap();
        matrix.decode(&rom, 0).unwrap();

        let records = matrix.export_text().unwrap();
        assert_eq!(records.len(), 3);
        for (y, line) in &records {
            assert_eq!(line.len(), 4);
            for (x, value) in line {
                assert_eq!(value, &TextValue::from((y * 4 + x) as u64));
            }
        }

        let mut copy = MatrixTable::with_size(tile_schema(), "Map", 12, 3).unwrap();
        copy.import_text(&records).unwrap();
        assert_eq!(copy, matrix);

        let mut written = vec![0u8; 12];
        copy.encode(&mut written, 0).unwrap();
        assert_eq!(written, rom);
    }

    #[test]
    fn missing_cell_reports_flattened_row() {
        let mut matrix = MatrixTable::with_size(tile_schema(), "Map", 4, 2).unwrap();
        let mut records: MatrixTextRecords = BTreeMap::new();
        records.insert(0, [(0, TextValue::from(1_u64)), (1, TextValue::from(2_u64))].into());
        records.insert(1, [(0, TextValue::from(3_u64))].into());

        let error = matrix.import_text(&records).unwrap_err();
        assert_eq!(error.location(), Some((Some("Map"), Some(3), None)));
        assert!(matches!(error.root_cause(), Error::MissingData));
        assert!(matrix.rows().flatten().all(Value::is_empty));

        records.remove(&1);
        let error = matrix.import_text(&records).unwrap_err();
        assert_eq!(error.location(), Some((Some("Map"), Some(2), None)));
    }

    #[test]
    fn document_round_trip() {
        let schema = Schema::compile(&[
            ColumnSpec::new("event").column_type("hexint").size(2),
            ColumnSpec::new("solid").column_type("boolean"),
        ])
        .unwrap()
        .into_shared();
        let rom = [0x34u8, 0x12, 0x01, 0x00, 0x00, 0x00];

        let mut matrix = MatrixTable::with_size(schema.clone(), "Collision", 6, 1).unwrap();
        matrix.decode(&rom, 0).unwrap();

        let mut document = Vec::new();
        matrix.write_text_document(&mut document).unwrap();
        let document = String::from_utf8(document).unwrap();
        assert!(document.contains("\"event\": 0x1234"));

        let mut copy = MatrixTable::with_size(schema, "Collision", 6, 1).unwrap();
        copy.read_text_document(document.as_bytes()).unwrap();
        assert_eq!(copy.cell(0, 0).unwrap(), &Value::Int(0x1234));
        assert_eq!(copy.cell(1, 1).unwrap(), &Value::Bool(false));
    }
}

//! Schema-driven binary tables.
//!
//! This module contains everything needed to turn a fixed-layout byte region into
//! human-editable records and back, bit-exactly.
//!
//! # Key Components
//!
//! - [`ColumnCodec`] - One fixed-width column with binary and textual conversion rules
//! - [`Schema`] - Ordered columns of one row, optionally compiled from [`ColumnSpec`]s
//! - [`Table`] - A grid of rows bound to a byte region
//! - [`MatrixTable`] - A table addressed as a two-dimensional grid in text form
//! - [`Value`] / [`TextValue`] - The in-memory and textual value domains
//!
//! # Examples
//!
//! ```rust
//! use romtable::tables::{ColumnSpec, Schema, Table};
//!
//! let schema = Schema::compile(&[
//!     ColumnSpec::new("id"),
//!     ColumnSpec::new("pointer").column_type("hexint").size(2),
//! ])?
//! .into_shared();
//!
//! let rom = [0x01u8, 0x00, 0x80, 0x02, 0x10, 0x80];
//! let mut table = Table::with_size(schema, "Scripts", rom.len())?;
//! table.decode(&rom, 0)?;
//!
//! let mut document = Vec::new();
//! table.write_text_document(&mut document)?;
//! assert!(String::from_utf8_lossy(&document).contains("\"pointer\": 0x8010"));
//! # Ok::<(), romtable::Error>(())
//! ```

/// Column codecs and their encodings
pub mod column;
/// Two-dimensional text addressing on top of [`Table`]
pub mod matrix;
/// Row schemas and the declarative schema compiler
pub mod schema;
/// Flat tables and parallel multi-table decoding
pub mod table;
/// Textual value tree and persisted documents
pub mod text;
/// In-memory cell values
pub mod value;

pub use column::{ColumnCodec, ColumnEncoding, ColumnKind};
pub use matrix::MatrixTable;
pub use schema::{ColumnSpec, ColumnType, Schema};
pub use table::{decode_tables, Table};
pub use text::{MatrixTextRecords, TextRecords, TextValue};
pub use value::Value;

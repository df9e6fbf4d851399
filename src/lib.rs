// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # romtable
//!
//! A declarative, schema-driven codec for fixed-layout binary tables inside ROM images.
//!
//! `romtable` converts byte regions of a ROM into structured, human-editable records and back,
//! losslessly and bit-exactly. A table is a grid of rows sharing one column schema; every
//! column has its own encoding, binary width and textual representation.
//!
//! ## Features
//!
//! - **Pluggable column codecs** - Booleans, plain, hexadecimal and one-based integers,
//!   enumerated integers, bitfields and raw byte sequences
//! - **Declarative schemas** - Compile JSON column specifications into concrete codecs
//! - **Precise attribution** - Every failure names the table, row and column it happened in
//! - **Matrix tables** - Address rows as a two-dimensional grid in text form
//! - **Parallel decoding** - Decode independent tables from one image concurrently
//!
//! ## Quick Start
//!
//! ```rust
//! use romtable::prelude::*;
//!
//! let schema = Schema::from_json_str(r#"[
//!     {"name": "price", "size": 2},
//!     {"name": "kind", "values": ["weapon", "armor", "ring"]},
//!     {"name": "flags", "type": "bitfield", "bitvalues": ["cursed", "unique"]}
//! ]"#)?
//! .into_shared();
//!
//! let mut rom = vec![0x2Cu8, 0x01, 0x02, 0x02, 0x64, 0x00, 0x00, 0x00];
//! let mut items = Table::with_size(schema, "Items", rom.len())?;
//! items.decode(&rom, 0)?;
//!
//! let mut records = items.export_text()?;
//! assert_eq!(records[&0].get("kind"), Some(&TextValue::from("RING")));
//! assert_eq!(records[&0].get("flags"), Some(&TextValue::from(vec!["UNIQUE"])));
//!
//! if let Some(TextValue::Map(fields)) = records.get_mut(&1) {
//!     fields.insert("flags".into(), TextValue::from(vec!["cursed"]));
//! }
//! items.import_text(&records)?;
//! items.encode(&mut rom, 0)?;
//! assert_eq!(rom[7], 0x01);
//! # Ok::<(), romtable::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`tables`] - Column codecs, schemas, tables and matrix tables
//! - [`io`] - The byte buffer contract tables are decoded from and encoded into
//! - [`utils`] - Enumeration registries
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result). Errors raised inside a column are
//! wrapped with the column name, then with the table name and row index:
//!
//! ```rust
//! use romtable::{prelude::*, Error};
//! use std::sync::Arc;
//!
//! let schema = Arc::new(Schema::single(ColumnCodec::integer("value", 1)?));
//! let mut table = Table::with_rows(schema, "Bytes", 1);
//! let records: TextRecords = [(0, TextValue::from(256_u64))].into();
//!
//! match table.import_text(&records) {
//!     Err(Error::Table { row, field, .. }) => {
//!         assert_eq!(row, 0);
//!         assert_eq!(field.as_deref(), Some("value"));
//!     }
//!     other => panic!("unexpected result {other:?}"),
//! }
//! # Ok::<(), romtable::Error>(())
//! ```
#[macro_use]
pub(crate) mod error;

/// Byte buffer access with little-endian, bounds-checked integer reads and writes
pub mod io;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use romtable::prelude::*;
///
/// let column = ColumnCodec::boolean("enabled", 1)?;
/// assert_eq!(column.decode(&[0x01u8], 0)?, Value::Bool(true));
/// # Ok::<(), romtable::Error>(())
/// ```
pub mod prelude;

/// Column codecs, schemas, tables and matrix tables
///
/// # Key Types
///
/// - [`tables::ColumnCodec`] - A single fixed-width column
/// - [`tables::Schema`] - The layout of one row
/// - [`tables::Table`] - Rows bound to a byte region
/// - [`tables::MatrixTable`] - Rows addressed as a grid
pub mod tables;

/// Enumeration registries shared between enumerated and bitfield columns
pub mod utils;

/// `romtable` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `romtable` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

//! # romtable Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the romtable library. Import it to get quick access to everything needed for
//! declaring schemas and converting tables.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all romtable operations
pub use crate::Error;

/// The result type used throughout romtable
pub use crate::Result;

// ================================================================================================
// Byte Buffers
// ================================================================================================

/// Bounds-checked little-endian access to the image a table lives in
pub use crate::io::ByteBuffer;

// ================================================================================================
// Columns and Schemas
// ================================================================================================

/// Column codec and its encodings
pub use crate::tables::{ColumnCodec, ColumnEncoding, ColumnKind};

/// Declarative column specifications and the compiled schema
pub use crate::tables::{ColumnSpec, ColumnType, Schema};

/// Enumeration registries for enumerated and bitfield columns
pub use crate::utils::{EnumRegistry, RegistryCache};

// ================================================================================================
// Tables
// ================================================================================================

/// Flat and two-dimensional tables
pub use crate::tables::{decode_tables, MatrixTable, Table};

// ================================================================================================
// Values
// ================================================================================================

/// In-memory and textual values
pub use crate::tables::{MatrixTextRecords, TextRecords, TextValue, Value};

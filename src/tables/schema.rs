//! Row schemas and the declarative schema compiler.
//!
//! A [`Schema`] is the ordered list of [`ColumnCodec`]s that make up one row. Schemas come in two
//! flavors:
//!
//! - **Multi-column**: every column has a unique name and a row's text record is a map keyed
//!   by column name.
//! - **Single-column**: one anonymous codec, and a row's text record is the bare value.
//!
//! Multi-column schemas are usually compiled from a declarative list of [`ColumnSpec`]s, as
//! found in project configuration files.
//!
//! # Declarative Column Specifications
//!
//! | Attribute | Default | Meaning |
//! |---|---|---|
//! | `name` | required | Column name, unique within the schema |
//! | `size` | `1` | Width in bytes |
//! | `type` | `"int"` | One of the names of [`ColumnType`] |
//! | `values` | none | Symbolic names for an `int` column, turning it into an enumerated column |
//! | `bitvalues` | none | Symbolic bit names, required by `bitfield` columns |
//!
//! # Examples
//!
//! ```rust
//! use romtable::tables::{Schema, TextValue, Value};
//!
//! let schema = Schema::from_json_str(r#"[
//!     {"name": "price", "size": 2},
//!     {"name": "kind", "values": ["weapon", "armor"]},
//!     {"name": "flags", "type": "bitfield", "bitvalues": ["cursed", "rare"]}
//! ]"#)?;
//! assert_eq!(schema.row_byte_width(), 4);
//!
//! let record = TextValue::map([
//!     ("price", TextValue::from(1200_u64)),
//!     ("kind", TextValue::from("armor")),
//!     ("flags", TextValue::from(vec!["rare"])),
//! ]);
//! let mut row = vec![Value::Empty; schema.column_count()];
//! schema.row_from_text(&record, &mut row)?;
//! assert_eq!(row[1], Value::Int(1));
//! # Ok::<(), romtable::Error>(())
//! ```

use std::{collections::HashSet, io::Read, str::FromStr, sync::Arc};

use serde::Deserialize;
use strum::{Display, EnumString};
use tracing::debug;

use crate::{
    tables::{ColumnCodec, ColumnEncoding, TextValue, Value},
    utils::RegistryCache,
    Error, Result,
};

/// Column type names accepted in declarative specifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum ColumnType {
    /// Unsigned integer, or enumerated integer when `values` are given
    #[strum(serialize = "int", serialize = "integer")]
    Integer,
    /// Unsigned integer written in hexadecimal in documents
    #[strum(serialize = "hexint")]
    HexInteger,
    /// Unsigned integer exposed one above its stored value
    #[strum(serialize = "one-based int")]
    OneBasedInteger,
    /// Raw byte sequence
    #[strum(serialize = "bytearray")]
    ByteSequence,
    /// Boolean flag
    #[strum(serialize = "boolean")]
    Boolean,
    /// Bit-vector with symbolic bit names
    #[strum(serialize = "bitfield")]
    Bitfield,
}

/// One declarative column specification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,
    /// Width in bytes, defaults to 1
    #[serde(default)]
    pub size: Option<usize>,
    /// Type name, defaults to `"int"`
    #[serde(default, rename = "type")]
    pub column_type: Option<String>,
    /// Symbolic names of an enumerated integer column
    #[serde(default)]
    pub values: Option<Vec<TextValue>>,
    /// Symbolic bit names of a bitfield column
    #[serde(default)]
    pub bitvalues: Option<Vec<TextValue>>,
}

impl ColumnSpec {
    /// A spec with `name` and every other attribute defaulted.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        ColumnSpec {
            name: name.into(),
            ..ColumnSpec::default()
        }
    }

    /// Sets the width in bytes.
    #[must_use]
    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the type name.
    #[must_use]
    pub fn column_type(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = Some(column_type.into());
        self
    }

    /// Sets the enumerated names.
    #[must_use]
    pub fn values<S: Into<TextValue>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the bit names.
    #[must_use]
    pub fn bitvalues<S: Into<TextValue>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.bitvalues = Some(values.into_iter().map(Into::into).collect());
        self
    }

    fn compile(&self, registries: &RegistryCache) -> Result<ColumnCodec> {
        if self.name.is_empty() {
            return Err(invalid_argument!("Column name must not be empty"));
        }

        let type_name = self.column_type.as_deref().unwrap_or("int");
        let width = self.size.unwrap_or(1);
        let column_type = ColumnType::from_str(type_name).map_err(|_| {
            invalid_argument!(
                "Column[{}] has unknown column type[{}]",
                self.name,
                type_name
            )
        })?;

        let encoding = match (column_type, &self.values, &self.bitvalues) {
            (ColumnType::Integer, Some(values), _) => {
                ColumnEncoding::Enumerated(registries.get_or_build(&symbol_names(values)))
            }
            (ColumnType::Integer, None, _) => ColumnEncoding::Integer,
            (ColumnType::HexInteger, _, _) => ColumnEncoding::HexInteger,
            (ColumnType::OneBasedInteger, _, _) => ColumnEncoding::OneBasedInteger,
            (ColumnType::ByteSequence, _, _) => ColumnEncoding::ByteSequence,
            (ColumnType::Boolean, _, _) => ColumnEncoding::Boolean,
            (ColumnType::Bitfield, _, Some(bitvalues)) => {
                ColumnEncoding::Bitfield(registries.get_or_build(&symbol_names(bitvalues)))
            }
            (ColumnType::Bitfield, _, None) => {
                return Err(invalid_argument!(
                    "Column[{}] of type[bitfield] is missing required attribute[bitvalues]",
                    self.name
                ))
            }
        };

        ColumnCodec::new(self.name.clone(), width, encoding)
    }
}

fn symbol_names(values: &[TextValue]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

/// Ordered column codecs describing the layout of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<ColumnCodec>,
    single: bool,
    row_byte_width: usize,
}

impl Schema {
    /// Compiles declarative column specifications into a multi-column schema.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for an empty list, duplicate names, unknown
    /// types, unsupported widths or missing required attributes.
    pub fn compile(specs: &[ColumnSpec]) -> Result<Self> {
        Self::compile_with(specs, &RegistryCache::new())
    }

    /// Like [`Schema::compile`], interning enumeration registries through `registries`.
    ///
    /// Sharing one cache across the schemas of a project makes every column with the same
    /// value list use the same registry.
    ///
    /// # Errors
    /// See [`Schema::compile`].
    pub fn compile_with(specs: &[ColumnSpec], registries: &RegistryCache) -> Result<Self> {
        let columns = specs
            .iter()
            .map(|spec| spec.compile(registries))
            .collect::<Result<Vec<_>>>()?;
        Self::from_columns(columns)
    }

    /// Parses and compiles a JSON array of column specifications.
    ///
    /// # Errors
    /// Returns [`crate::Error::Json`] for malformed JSON, otherwise see [`Schema::compile`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let specs: Vec<ColumnSpec> = serde_json::from_str(json)?;
        Self::compile(&specs)
    }

    /// Reads, parses and compiles a JSON array of column specifications.
    ///
    /// # Errors
    /// See [`Schema::from_json_str`].
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let specs: Vec<ColumnSpec> = serde_json::from_reader(reader)?;
        Self::compile(&specs)
    }

    /// Builds a multi-column schema from already constructed codecs.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for an empty list or duplicate names.
    pub fn from_columns(columns: Vec<ColumnCodec>) -> Result<Self> {
        if columns.is_empty() {
            return Err(invalid_argument!("A schema needs at least one column"));
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(invalid_argument!(
                    "Column[{}] is declared more than once",
                    column.name()
                ));
            }
        }

        let row_byte_width = columns.iter().map(ColumnCodec::width).sum();
        Ok(Schema {
            columns,
            single: false,
            row_byte_width,
        })
    }

    /// A single-column schema whose text records are bare values.
    #[must_use]
    pub fn single(column: ColumnCodec) -> Self {
        Schema {
            row_byte_width: column.width(),
            columns: vec![column],
            single: true,
        }
    }

    /// Wraps the schema for sharing between tables.
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// The columns in row order
    #[must_use]
    pub fn columns(&self) -> &[ColumnCodec] {
        &self.columns
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnCodec> {
        self.columns.iter().find(|column| column.name() == name)
    }

    /// Number of columns
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Sum of all column widths
    #[must_use]
    pub fn row_byte_width(&self) -> usize {
        self.row_byte_width
    }

    /// `true` for single-column schemas.
    #[must_use]
    pub fn is_single(&self) -> bool {
        self.single
    }

    /// Names of the hexadecimal integer columns of a multi-column schema.
    ///
    /// Single-column schemas have no key to attach the hexadecimal rendering to and always
    /// return an empty list.
    #[must_use]
    pub fn hex_columns(&self) -> Vec<&str> {
        if self.single {
            return Vec::new();
        }
        self.columns
            .iter()
            .filter(|column| matches!(column.encoding(), ColumnEncoding::HexInteger))
            .map(ColumnCodec::name)
            .collect()
    }

    /// Parses one text record into `row`.
    ///
    /// `row` must hold one slot per column. On failure `row` may be partially written.
    ///
    /// # Errors
    /// Returns [`crate::Error::Schema`] naming the column whose value was missing or invalid.
    pub fn row_from_text(&self, record: &TextValue, row: &mut [Value]) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(invalid_argument!(
                "Row has {} slots but the schema has {} columns",
                row.len(),
                self.columns.len()
            ));
        }

        if self.single {
            let column = &self.columns[0];
            row[0] = column
                .parse_text(record)
                .map_err(|cause| self.attribute(column, cause))?;
            return Ok(());
        }

        let TextValue::Map(fields) = record else {
            let cause = Error::InvalidText(format!(
                "Expected a record of named columns but got value[{record}] of type[{}]",
                record.kind_name()
            ));
            return Err(self.attribute(&self.columns[0], cause));
        };

        for (slot, column) in row.iter_mut().zip(&self.columns) {
            let text = fields
                .get(column.name())
                .ok_or_else(|| self.attribute(column, Error::MissingData))?;
            *slot = column
                .parse_text(text)
                .map_err(|cause| self.attribute(column, cause))?;
        }

        Ok(())
    }

    /// Formats one row as a text record.
    ///
    /// # Errors
    /// Returns [`crate::Error::Schema`] naming the column whose value could not be formatted.
    pub fn row_to_text(&self, row: &[Value]) -> Result<TextValue> {
        if row.len() != self.columns.len() {
            return Err(invalid_argument!(
                "Row has {} slots but the schema has {} columns",
                row.len(),
                self.columns.len()
            ));
        }

        if self.single {
            let column = &self.columns[0];
            return column
                .format_text(&row[0])
                .map_err(|cause| self.attribute(column, cause));
        }

        let mut fields = Vec::with_capacity(self.columns.len());
        for (value, column) in row.iter().zip(&self.columns) {
            let text = column
                .format_text(value)
                .map_err(|cause| self.attribute(column, cause))?;
            fields.push((column.name(), text));
        }

        Ok(TextValue::map(fields))
    }

    fn attribute(&self, column: &ColumnCodec, cause: Error) -> Error {
        debug!(column = column.name(), error = %cause, "column conversion failed");
        Error::Schema {
            field: column.name().to_string(),
            cause: Box::new(cause),
        }
    }
}

//! In-memory cell values.
//!
//! Every cell of a [`crate::tables::Table`] holds a [`Value`]. The variant a cell holds is
//! decided by the column codec that produced it; the table and matrix layers treat values as
//! opaque.

use std::collections::BTreeSet;

/// Closed sum type over the value domains of all column codecs.
///
/// | Column kind | Variant |
/// |---|---|
/// | Boolean | [`Value::Bool`] |
/// | Integer, HexInteger, OneBasedInteger, EnumeratedInteger | [`Value::Int`] |
/// | Bitfield | [`Value::Bits`] |
/// | ByteSequence | [`Value::Bytes`] |
///
/// [`Value::Empty`] marks a cell that has not been populated yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Value {
    /// Not yet populated
    #[default]
    Empty,
    /// Boolean flag
    Bool(bool),
    /// Unsigned integer
    Int(u64),
    /// Set of bit indices
    Bits(BTreeSet<u32>),
    /// Raw bytes
    Bytes(Vec<u8>),
}

impl Value {
    /// Short human readable name of the variant, used in error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Empty => "empty",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Bits(_) => "bitset",
            Value::Bytes(_) => "bytes",
        }
    }

    /// Returns `true` for the [`Value::Empty`] sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Returns the contained integer, if any.
    #[must_use]
    pub fn as_int(&self) -> Option<u64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the contained flag, if any.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the contained bit set, if any.
    #[must_use]
    pub fn as_bits(&self) -> Option<&BTreeSet<u32>> {
        match self {
            Value::Bits(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the contained bytes, if any.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(value) => Some(value),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Int(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<BTreeSet<u32>> for Value {
    fn from(value: BTreeSet<u32>) -> Self {
        Value::Bits(value)
    }
}

impl FromIterator<u32> for Value {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        Value::Bits(iter.into_iter().collect())
    }
}

//! Column codecs.
//!
//! A [`ColumnCodec`] converts one fixed-width field of a row between its binary form inside a
//! [`crate::io::ByteBuffer`], its in-memory [`Value`] and its textual [`TextValue`]. Codecs are
//! immutable configuration: they carry a name, a width and, for enumerated and bitfield
//! columns, a shared [`EnumRegistry`], but never any row state.
//!
//! # Encodings
//!
//! | Encoding | Binary | Text |
//! |---|---|---|
//! | [`ColumnEncoding::Boolean`] | LE integer, nonzero is `true` | `true` / `false` |
//! | [`ColumnEncoding::Integer`] | LE unsigned integer | integer |
//! | [`ColumnEncoding::HexInteger`] | LE unsigned integer | integer, hex in documents |
//! | [`ColumnEncoding::OneBasedInteger`] | LE unsigned integer, stored one lower | integer |
//! | [`ColumnEncoding::Enumerated`] | LE unsigned integer | integer or symbolic name |
//! | [`ColumnEncoding::Bitfield`] | LE bit-vector | list of bit indices or names |
//! | [`ColumnEncoding::ByteSequence`] | raw bytes | list of integers |
//!
//! Every codec satisfies the round-trip law: `decode(encode(v)) == v` and
//! `parse_text(format_text(v)) == v` for every value `v` it accepts.
//!
//! # Examples
//!
//! ```rust
//! use romtable::{tables::{ColumnCodec, TextValue, Value}, utils::EnumRegistry};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(EnumRegistry::from_values(["a", "b"]));
//! let column = ColumnCodec::enumerated("kind", 1, registry)?;
//!
//! let value = column.parse_text(&TextValue::from("B"))?;
//! assert_eq!(value, Value::Int(1));
//!
//! let mut rom = vec![0u8; 1];
//! column.encode(&mut rom, 0, &value)?;
//! assert_eq!(rom, [0x01]);
//! assert_eq!(column.format_text(&Value::Int(5))?, TextValue::from(5_u64));
//! # Ok::<(), romtable::Error>(())
//! ```

use std::{collections::BTreeSet, sync::Arc};

use strum::{Display, EnumIter};

use crate::{
    io::{max_value, ByteBuffer, MAX_INTEGER_WIDTH},
    tables::{TextValue, Value},
    utils::EnumRegistry,
    Error, Result,
};

/// Discriminant of a [`ColumnEncoding`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ColumnKind {
    /// See [`ColumnEncoding::Boolean`]
    Boolean,
    /// See [`ColumnEncoding::Integer`]
    Integer,
    /// See [`ColumnEncoding::HexInteger`]
    HexInteger,
    /// See [`ColumnEncoding::OneBasedInteger`]
    OneBasedInteger,
    /// See [`ColumnEncoding::Enumerated`]
    EnumeratedInteger,
    /// See [`ColumnEncoding::Bitfield`]
    Bitfield,
    /// See [`ColumnEncoding::ByteSequence`]
    ByteSequence,
}

/// Binary and textual encoding of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnEncoding {
    /// Little-endian integer interpreted as a flag; `true` is written as 1
    Boolean,
    /// Little-endian unsigned integer
    Integer,
    /// Little-endian unsigned integer presented in hexadecimal in persisted documents
    HexInteger,
    /// Little-endian unsigned integer exposed as the stored value plus one
    OneBasedInteger,
    /// Little-endian unsigned integer with symbolic names
    Enumerated(Arc<EnumRegistry>),
    /// Little-endian bit-vector; bit `i` set means `i` is in the set
    Bitfield(Arc<EnumRegistry>),
    /// Raw bytes copied verbatim
    ByteSequence,
}

impl ColumnEncoding {
    /// Returns the payload-free discriminant.
    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnEncoding::Boolean => ColumnKind::Boolean,
            ColumnEncoding::Integer => ColumnKind::Integer,
            ColumnEncoding::HexInteger => ColumnKind::HexInteger,
            ColumnEncoding::OneBasedInteger => ColumnKind::OneBasedInteger,
            ColumnEncoding::Enumerated(_) => ColumnKind::EnumeratedInteger,
            ColumnEncoding::Bitfield(_) => ColumnKind::Bitfield,
            ColumnEncoding::ByteSequence => ColumnKind::ByteSequence,
        }
    }

    /// The registry of enumerated and bitfield encodings.
    #[must_use]
    pub fn registry(&self) -> Option<&Arc<EnumRegistry>> {
        match self {
            ColumnEncoding::Enumerated(registry) | ColumnEncoding::Bitfield(registry) => {
                Some(registry)
            }
            _ => None,
        }
    }
}

/// A named, fixed-width column codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCodec {
    name: String,
    width: usize,
    encoding: ColumnEncoding,
}

impl ColumnCodec {
    /// Creates a codec, validating the width against the encoding.
    ///
    /// # Arguments
    /// * `name` - Column name, unique within a schema
    /// * `width` - Width in bytes; `1..=8` for integer-based encodings, `1..=7` for
    ///   [`ColumnEncoding::OneBasedInteger`], any nonzero width for
    ///   [`ColumnEncoding::ByteSequence`]
    /// * `encoding` - The encoding of the column
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for an unsupported width.
    pub fn new(name: impl Into<String>, width: usize, encoding: ColumnEncoding) -> Result<Self> {
        let name = name.into();
        if width == 0 {
            return Err(invalid_argument!("Column[{}] must have a nonzero size", name));
        }
        if encoding.kind() != ColumnKind::ByteSequence && width > MAX_INTEGER_WIDTH {
            return Err(invalid_argument!(
                "Column[{}] of type[{}] has size[{}], but at most {} bytes are supported",
                name,
                encoding.kind(),
                width,
                MAX_INTEGER_WIDTH
            ));
        }
        // Every stored value plus one must stay representable
        if encoding.kind() == ColumnKind::OneBasedInteger && width == MAX_INTEGER_WIDTH {
            return Err(invalid_argument!(
                "Column[{}] of type[{}] has size[{}], but at most {} bytes are supported",
                name,
                encoding.kind(),
                width,
                MAX_INTEGER_WIDTH - 1
            ));
        }

        Ok(ColumnCodec {
            name,
            width,
            encoding,
        })
    }

    /// Boolean column of `width` bytes.
    ///
    /// # Errors
    /// See [`ColumnCodec::new`].
    pub fn boolean(name: impl Into<String>, width: usize) -> Result<Self> {
        Self::new(name, width, ColumnEncoding::Boolean)
    }

    /// Unsigned integer column of `width` bytes.
    ///
    /// # Errors
    /// See [`ColumnCodec::new`].
    pub fn integer(name: impl Into<String>, width: usize) -> Result<Self> {
        Self::new(name, width, ColumnEncoding::Integer)
    }

    /// Unsigned integer column rendered in hexadecimal in documents.
    ///
    /// # Errors
    /// See [`ColumnCodec::new`].
    pub fn hex_integer(name: impl Into<String>, width: usize) -> Result<Self> {
        Self::new(name, width, ColumnEncoding::HexInteger)
    }

    /// Unsigned integer column whose exposed value is one above the stored value.
    ///
    /// # Errors
    /// See [`ColumnCodec::new`].
    pub fn one_based_integer(name: impl Into<String>, width: usize) -> Result<Self> {
        Self::new(name, width, ColumnEncoding::OneBasedInteger)
    }

    /// Unsigned integer column with symbolic names from `registry`.
    ///
    /// # Errors
    /// See [`ColumnCodec::new`].
    pub fn enumerated(
        name: impl Into<String>,
        width: usize,
        registry: Arc<EnumRegistry>,
    ) -> Result<Self> {
        Self::new(name, width, ColumnEncoding::Enumerated(registry))
    }

    /// Bit-vector column with symbolic bit names from `registry`.
    ///
    /// # Errors
    /// See [`ColumnCodec::new`].
    pub fn bitfield(
        name: impl Into<String>,
        width: usize,
        registry: Arc<EnumRegistry>,
    ) -> Result<Self> {
        Self::new(name, width, ColumnEncoding::Bitfield(registry))
    }

    /// Raw byte column of `width` bytes.
    ///
    /// # Errors
    /// See [`ColumnCodec::new`].
    pub fn byte_sequence(name: impl Into<String>, width: usize) -> Result<Self> {
        Self::new(name, width, ColumnEncoding::ByteSequence)
    }

    /// Column name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width in bytes
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Column encoding
    #[must_use]
    pub fn encoding(&self) -> &ColumnEncoding {
        &self.encoding
    }

    /// Column kind
    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        self.encoding.kind()
    }

    /// Number of addressable bits, for bitfield validation.
    fn bit_count(&self) -> u32 {
        // Widths are capped at 8 bytes for bitfields
        (self.width * 8) as u32
    }

    /// Reads this column's value at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the buffer is too short.
    pub fn decode<B: ByteBuffer + ?Sized>(&self, buffer: &B, offset: usize) -> Result<Value> {
        match &self.encoding {
            ColumnEncoding::Boolean => Ok(Value::Bool(buffer.read_multi(offset, self.width)? != 0)),
            ColumnEncoding::Integer
            | ColumnEncoding::HexInteger
            | ColumnEncoding::Enumerated(_) => Ok(Value::Int(buffer.read_multi(offset, self.width)?)),
            ColumnEncoding::OneBasedInteger => {
                Ok(Value::Int(buffer.read_multi(offset, self.width)? + 1))
            }
            ColumnEncoding::Bitfield(_) => {
                let raw = buffer.read_multi(offset, self.width)?;
                Ok((0..self.bit_count())
                    .filter(|bit| raw & (1u64 << bit) != 0)
                    .collect())
            }
            ColumnEncoding::ByteSequence => Ok(Value::Bytes(
                buffer.read_bytes(offset, self.width)?.to_vec(),
            )),
        }
    }

    /// Writes `value` at `offset`, touching exactly [`ColumnCodec::width`] bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::ValueType`] if `value` has the wrong kind for this column
    /// (including [`Value::Empty`]), [`crate::Error::ValueOutOfRange`] or
    /// [`crate::Error::ValueLength`] if it does not fit, and [`crate::Error::OutOfBounds`] if
    /// the buffer is too short.
    pub fn encode<B: ByteBuffer + ?Sized>(
        &self,
        buffer: &mut B,
        offset: usize,
        value: &Value,
    ) -> Result<()> {
        match (&self.encoding, value) {
            (ColumnEncoding::Boolean, Value::Bool(flag)) => {
                buffer.write_multi(offset, self.width, u64::from(*flag))
            }
            (
                ColumnEncoding::Integer | ColumnEncoding::HexInteger | ColumnEncoding::Enumerated(_),
                Value::Int(number),
            ) => buffer.write_multi(offset, self.width, *number),
            (ColumnEncoding::OneBasedInteger, Value::Int(number)) => {
                let stored = number.checked_sub(1).ok_or(Error::ValueOutOfRange {
                    value: u128::from(*number),
                    width: self.width,
                })?;
                buffer.write_multi(offset, self.width, stored)
            }
            (ColumnEncoding::Bitfield(_), Value::Bits(bits)) => {
                let mut raw = 0u64;
                for bit in bits {
                    if *bit >= self.bit_count() {
                        return Err(Error::ValueOutOfRange {
                            value: u128::from(*bit),
                            width: self.width,
                        });
                    }
                    raw |= 1u64 << bit;
                }
                buffer.write_multi(offset, self.width, raw)
            }
            (ColumnEncoding::ByteSequence, Value::Bytes(bytes)) => {
                if bytes.len() != self.width {
                    return Err(Error::ValueLength {
                        expected: self.width,
                        found: bytes.len(),
                    });
                }
                buffer.write_bytes(offset, bytes)
            }
            (_, other) => Err(Error::ValueType {
                expected: self.value_kind(),
                found: other.kind_name(),
            }),
        }
    }

    /// Parses a textual value into this column's value domain.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidText`] if `text` has the wrong shape, is out of range or
    /// names an unknown symbol.
    pub fn parse_text(&self, text: &TextValue) -> Result<Value> {
        match &self.encoding {
            ColumnEncoding::Boolean => match text {
                TextValue::Bool(flag) => Ok(Value::Bool(*flag)),
                other => Err(Error::InvalidText(format!(
                    "Could not parse value[{other}] as a boolean. Valid values are \"true\" or \"false\"."
                ))),
            },
            ColumnEncoding::Integer | ColumnEncoding::HexInteger => {
                self.parse_integer(text, 0, i128::from(max_value(self.width)))
            }
            ColumnEncoding::OneBasedInteger => {
                // The stored value, one below the exposed one, must fit the width
                self.parse_integer(text, 1, i128::from(max_value(self.width)) + 1)
            }
            ColumnEncoding::Enumerated(registry) => match text {
                TextValue::Str(name) => {
                    let value = registry.value_of(name).ok_or_else(|| {
                        Error::InvalidText(format!(
                            "Could not parse string[{name}] to a value of column[{}]",
                            self.name
                        ))
                    })?;
                    self.parse_integer(&TextValue::from(value), 0, i128::from(max_value(self.width)))
                }
                TextValue::Int(_) => {
                    self.parse_integer(text, 0, i128::from(max_value(self.width)))
                }
                other => Err(Error::InvalidText(format!(
                    "Could not parse value[{other}] of type[{}] to a value of column[{}]",
                    other.kind_name(),
                    self.name
                ))),
            },
            ColumnEncoding::Bitfield(registry) => {
                let TextValue::List(entries) = text else {
                    return Err(Error::InvalidText(format!(
                        "Expected list of bitvalues but instead got value[{text}] of type[{}]",
                        text.kind_name()
                    )));
                };

                let mut bits = BTreeSet::new();
                for entry in entries {
                    let bit = match entry {
                        TextValue::Int(bit) => *bit,
                        TextValue::Str(name) => {
                            let bit = registry.value_of(name).ok_or_else(|| {
                                Error::InvalidText(format!(
                                    "Could not parse string[{name}] to a bitvalue of column[{}]",
                                    self.name
                                ))
                            })?;
                            i128::from(bit)
                        }
                        other => {
                            return Err(Error::InvalidText(format!(
                                "Expected list of bitvalues but found entry[{other}] of type[{}]",
                                other.kind_name()
                            )))
                        }
                    };

                    if bit < 0 || bit >= i128::from(self.bit_count()) {
                        return Err(Error::InvalidText(format!(
                            "Bitvalue value[{bit}] is too large to fit in a bitfield of size[{}]",
                            self.width
                        )));
                    }
                    // Bounded by bit_count above
                    bits.insert(bit as u32);
                }
                Ok(Value::Bits(bits))
            }
            ColumnEncoding::ByteSequence => {
                let TextValue::List(entries) = text else {
                    return Err(Error::InvalidText(format!(
                        "Could not parse value[{text}] to a list of integers"
                    )));
                };

                let mut bytes = Vec::with_capacity(entries.len());
                for entry in entries {
                    let TextValue::Int(number) = entry else {
                        return Err(Error::InvalidText(format!(
                            "Could not parse value[{text}] to a list of integers"
                        )));
                    };
                    let byte = u8::try_from(*number).map_err(|_| {
                        Error::InvalidText(format!(
                            "Byte list[{text}] contains a value less than 0 or greater than 255 (0xff)"
                        ))
                    })?;
                    bytes.push(byte);
                }

                if bytes.len() != self.width {
                    return Err(Error::InvalidText(format!(
                        "Byte list[{text}] has length[{}], but column[{}] holds exactly {} bytes",
                        bytes.len(),
                        self.name,
                        self.width
                    )));
                }
                Ok(Value::Bytes(bytes))
            }
        }
    }

    /// Formats a value of this column's domain as text.
    ///
    /// Enumerated integers render as their symbolic name when one is registered, otherwise as
    /// the raw integer. Bitfields render every set bit the same way, raw indices first in
    /// ascending order followed by names in ascending order.
    ///
    /// # Errors
    /// Returns [`crate::Error::ValueType`] if `value` has the wrong kind for this column.
    pub fn format_text(&self, value: &Value) -> Result<TextValue> {
        match (&self.encoding, value) {
            (ColumnEncoding::Boolean, Value::Bool(flag)) => Ok(TextValue::Bool(*flag)),
            (
                ColumnEncoding::Integer
                | ColumnEncoding::HexInteger
                | ColumnEncoding::OneBasedInteger,
                Value::Int(number),
            ) => Ok(TextValue::from(*number)),
            (ColumnEncoding::Enumerated(registry), Value::Int(number)) => {
                Ok(match registry.name_of(*number) {
                    Some(name) => TextValue::from(name),
                    None => TextValue::from(*number),
                })
            }
            (ColumnEncoding::Bitfield(registry), Value::Bits(bits)) => {
                let mut raw = Vec::new();
                let mut named = Vec::new();
                for bit in bits {
                    match registry.name_of(u64::from(*bit)) {
                        Some(name) => named.push(name),
                        None => raw.push(TextValue::from(u64::from(*bit))),
                    }
                }
                named.sort_unstable();
                raw.extend(named.into_iter().map(TextValue::from));
                Ok(TextValue::List(raw))
            }
            (ColumnEncoding::ByteSequence, Value::Bytes(bytes)) => Ok(TextValue::List(
                bytes.iter().map(|byte| TextValue::from(u64::from(*byte))).collect(),
            )),
            (_, other) => Err(Error::ValueType {
                expected: self.value_kind(),
                found: other.kind_name(),
            }),
        }
    }

    /// Name of the [`Value`] variant this column works with.
    fn value_kind(&self) -> &'static str {
        match self.encoding {
            ColumnEncoding::Boolean => "boolean",
            ColumnEncoding::Bitfield(_) => "bitset",
            ColumnEncoding::ByteSequence => "bytes",
            _ => "integer",
        }
    }

    fn parse_integer(&self, text: &TextValue, lower: i128, upper: i128) -> Result<Value> {
        let TextValue::Int(number) = text else {
            return Err(Error::InvalidText(format!(
                "Could not parse value[{text}] of type[{}] as integer",
                text.kind_name()
            )));
        };

        if *number < lower || *number > upper {
            return Err(Error::InvalidText(format!(
                "Value[{number}] is not valid, must be between {lower} and {upper}"
            )));
        }

        // Range checked above, upper never exceeds u64::MAX
        Ok(Value::Int(*number as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn registry(names: &[&str]) -> Arc<EnumRegistry> {
        Arc::new(EnumRegistry::from_values(names))
    }

    fn codec_of_kind(kind: ColumnKind, width: usize) -> ColumnCodec {
        match kind {
            ColumnKind::Boolean => ColumnCodec::boolean("c", width),
            ColumnKind::Integer => ColumnCodec::integer("c", width),
            ColumnKind::HexInteger => ColumnCodec::hex_integer("c", width),
            ColumnKind::OneBasedInteger => ColumnCodec::one_based_integer("c", width),
            ColumnKind::EnumeratedInteger => {
                ColumnCodec::enumerated("c", width, registry(&["zero", "one"]))
            }
            ColumnKind::Bitfield => ColumnCodec::bitfield("c", width, registry(&["low"])),
            ColumnKind::ByteSequence => ColumnCodec::byte_sequence("c", width),
        }
        .unwrap()
    }

    fn sample_value(kind: ColumnKind, width: usize) -> Value {
        match kind {
            ColumnKind::Boolean => Value::Bool(true),
            ColumnKind::Integer | ColumnKind::HexInteger => Value::Int(max_value(width)),
            ColumnKind::OneBasedInteger => Value::Int(1),
            ColumnKind::EnumeratedInteger => Value::Int(1),
            ColumnKind::Bitfield => [0, (width * 8 - 1) as u32].into_iter().collect(),
            ColumnKind::ByteSequence => Value::Bytes((1..=width as u8).collect()),
        }
    }

    #[test]
    fn round_trip_every_kind() {
        for kind in ColumnKind::iter() {
            for width in [1, 2, 4] {
                let codec = codec_of_kind(kind, width);
                let value = sample_value(kind, width);

                let mut buffer = vec![0u8; width + 2];
                codec.encode(&mut buffer, 1, &value).unwrap();
                assert_eq!(codec.decode(&buffer, 1).unwrap(), value, "{kind} width {width}");

                let text = codec.format_text(&value).unwrap();
                assert_eq!(codec.parse_text(&text).unwrap(), value, "{kind} width {width}");
            }
        }
    }

    #[test]
    fn encode_writes_exactly_width_bytes() {
        for kind in ColumnKind::iter() {
            let codec = codec_of_kind(kind, 2);
            let mut buffer = vec![0xEEu8; 4];
            codec.encode(&mut buffer, 1, &sample_value(kind, 2)).unwrap();
            assert_eq!(buffer[0], 0xEE, "{kind}");
            assert_eq!(buffer[3], 0xEE, "{kind}");
        }
    }

    #[test]
    fn integer_bounds() {
        let codec = ColumnCodec::integer("value", 1).unwrap();
        let mut buffer = [0u8; 1];

        let value = codec.parse_text(&TextValue::from(255_u64)).unwrap();
        codec.encode(&mut buffer, 0, &value).unwrap();
        assert_eq!(buffer, [0xFF]);

        assert!(matches!(
            codec.parse_text(&TextValue::from(256_u64)),
            Err(Error::InvalidText(_))
        ));
        assert!(matches!(
            codec.parse_text(&TextValue::from(-1_i64)),
            Err(Error::InvalidText(_))
        ));
        assert!(matches!(
            codec.parse_text(&TextValue::from("12")),
            Err(Error::InvalidText(_))
        ));
        assert!(matches!(
            codec.encode(&mut buffer, 0, &Value::Int(256)),
            Err(Error::ValueOutOfRange { value: 256, width: 1 })
        ));
    }

    #[test]
    fn integer_full_width() {
        let codec = ColumnCodec::integer("value", 8).unwrap();
        let mut buffer = [0u8; 8];
        let value = codec.parse_text(&TextValue::from(u64::MAX)).unwrap();
        codec.encode(&mut buffer, 0, &value).unwrap();
        assert_eq!(buffer, [0xFF; 8]);
        assert_eq!(codec.decode(&buffer, 0).unwrap(), Value::Int(u64::MAX));
    }

    #[test]
    fn hex_integer_text_is_plain_integer() {
        let codec = ColumnCodec::hex_integer("pointer", 3).unwrap();
        let buffer = [0xEEu8, 0xFF, 0xC0];
        let value = codec.decode(&buffer, 0).unwrap();
        assert_eq!(value, Value::Int(0xC0FFEE));
        assert_eq!(
            codec.format_text(&value).unwrap(),
            TextValue::from(0xC0FFEE_u64)
        );
    }

    #[test]
    fn one_based_offset() {
        let codec = ColumnCodec::one_based_integer("level", 1).unwrap();

        for stored in [0u8, 1, 99, 254, 255] {
            let value = codec.decode(&[stored], 0).unwrap();
            assert_eq!(value, Value::Int(u64::from(stored) + 1));

            let mut buffer = [0u8; 1];
            codec.encode(&mut buffer, 0, &value).unwrap();
            assert_eq!(buffer, [stored]);
        }

        assert_eq!(
            codec.parse_text(&TextValue::from(256_u64)).unwrap(),
            Value::Int(256)
        );
        assert!(codec.parse_text(&TextValue::from(0_u64)).is_err());
        assert!(codec.parse_text(&TextValue::from(257_u64)).is_err());
        assert!(matches!(
            codec.encode(&mut [0u8; 1], 0, &Value::Int(0)),
            Err(Error::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn one_based_widest_column() {
        assert!(matches!(
            ColumnCodec::one_based_integer("level", 8),
            Err(Error::InvalidArgument { .. })
        ));

        let codec = ColumnCodec::one_based_integer("level", 7).unwrap();
        let top = max_value(7) + 1;
        let value = codec.decode(&[0xFFu8; 7], 0).unwrap();
        assert_eq!(value, Value::Int(top));

        let mut buffer = [0u8; 7];
        codec.encode(&mut buffer, 0, &value).unwrap();
        assert_eq!(buffer, [0xFF; 7]);
        assert_eq!(codec.format_text(&value).unwrap(), TextValue::from(top));
        assert_eq!(codec.parse_text(&TextValue::from(top)).unwrap(), value);
        assert!(codec.parse_text(&TextValue::from(top + 1)).is_err());
    }

    #[test]
    fn enumerated_names() {
        let codec = ColumnCodec::enumerated("kind", 1, registry(&["A", "B"])).unwrap();

        let value = codec.parse_text(&TextValue::from("B")).unwrap();
        assert_eq!(value, Value::Int(1));

        let mut buffer = [0u8; 1];
        codec.encode(&mut buffer, 0, &value).unwrap();
        assert_eq!(buffer, [0x01]);

        assert_eq!(codec.format_text(&Value::Int(1)).unwrap(), TextValue::from("B"));
        assert_eq!(
            codec.format_text(&Value::Int(5)).unwrap(),
            TextValue::from(5_u64)
        );
        assert_eq!(codec.parse_text(&TextValue::from(5_u64)).unwrap(), Value::Int(5));
        assert!(matches!(
            codec.parse_text(&TextValue::from("C")),
            Err(Error::InvalidText(_))
        ));
        assert!(matches!(
            codec.parse_text(&TextValue::from(true)),
            Err(Error::InvalidText(_))
        ));
    }

    #[test]
    fn bitfield_scenario() {
        let names = Arc::new(EnumRegistry::from_pairs([("X", 0), ("Y", 3)]));
        let codec = ColumnCodec::bitfield("flags", 1, names).unwrap();

        let value = codec.decode(&[0x09u8], 0).unwrap();
        assert_eq!(value, [0, 3].into_iter().collect::<Value>());
        assert_eq!(
            codec.format_text(&value).unwrap(),
            TextValue::from(vec!["X", "Y"])
        );

        let mut buffer = [0u8; 1];
        codec.encode(&mut buffer, 0, &value).unwrap();
        assert_eq!(buffer, [0x09]);
    }

    #[test]
    fn bitfield_text_mixed_and_sorted() {
        let codec = ColumnCodec::bitfield("flags", 2, registry(&["b", "a"])).unwrap();

        let value = codec
            .parse_text(&TextValue::List(vec![
                TextValue::from(9_u64),
                TextValue::from("a"),
                TextValue::from(2_u64),
                TextValue::from("B"),
            ]))
            .unwrap();
        assert_eq!(value, [0, 1, 2, 9].into_iter().collect::<Value>());

        assert_eq!(
            codec.format_text(&value).unwrap(),
            TextValue::List(vec![
                TextValue::from(2_u64),
                TextValue::from(9_u64),
                TextValue::from("A"),
                TextValue::from("B"),
            ])
        );
    }

    #[test]
    fn bitfield_rejects_out_of_range() {
        let codec = ColumnCodec::bitfield("flags", 1, registry(&[])).unwrap();

        assert!(codec.parse_text(&TextValue::from(vec![8_u64])).is_err());
        assert!(codec.parse_text(&TextValue::from(vec!["missing"])).is_err());
        assert!(codec.parse_text(&TextValue::from(3_u64)).is_err());
        assert!(matches!(
            codec.encode(&mut [0u8; 1], 0, &[8].into_iter().collect()),
            Err(Error::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn byte_sequence_validation() {
        let codec = ColumnCodec::byte_sequence("raw", 3).unwrap();

        assert_eq!(
            codec.parse_text(&TextValue::from(vec![1_u64, 2, 255])).unwrap(),
            Value::Bytes(vec![1, 2, 255])
        );
        assert!(codec.parse_text(&TextValue::from(vec![1_u64, 2])).is_err());
        assert!(codec.parse_text(&TextValue::from(vec![1_u64, 2, 256])).is_err());
        assert!(codec
            .parse_text(&TextValue::List(vec![
                TextValue::from(1_u64),
                TextValue::from("2"),
                TextValue::from(3_u64)
            ]))
            .is_err());
        assert!(matches!(
            codec.encode(&mut [0u8; 3], 0, &Value::Bytes(vec![1])),
            Err(Error::ValueLength { expected: 3, found: 1 })
        ));
    }

    #[test]
    fn boolean_multi_byte() {
        let codec = ColumnCodec::boolean("flag", 2).unwrap();
        assert_eq!(codec.decode(&[0x00u8, 0x01], 0).unwrap(), Value::Bool(true));
        assert_eq!(codec.decode(&[0x00u8, 0x00], 0).unwrap(), Value::Bool(false));

        let mut buffer = [0xFFu8; 2];
        codec.encode(&mut buffer, 0, &Value::Bool(false)).unwrap();
        assert_eq!(buffer, [0x00, 0x00]);

        assert!(codec.parse_text(&TextValue::from(1_u64)).is_err());
    }

    #[test]
    fn wrong_value_kind() {
        let codec = ColumnCodec::integer("value", 1).unwrap();
        assert!(matches!(
            codec.encode(&mut [0u8; 1], 0, &Value::Empty),
            Err(Error::ValueType {
                expected: "integer",
                found: "empty"
            })
        ));
        assert!(matches!(
            codec.format_text(&Value::Bool(true)),
            Err(Error::ValueType { .. })
        ));
    }

    #[test]
    fn invalid_widths() {
        assert!(matches!(
            ColumnCodec::integer("value", 0),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            ColumnCodec::bitfield("value", 9, registry(&[])),
            Err(Error::InvalidArgument { .. })
        ));
        assert_eq!(ColumnCodec::byte_sequence("value", 32).unwrap().width(), 32);
    }
}

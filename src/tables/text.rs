//! Textual representation of table contents.
//!
//! [`TextValue`] is the loosely-typed tree human-editable project files are made of: scalars,
//! lists and string-keyed maps. Column codecs parse cells from it and format cells into it.
//!
//! The persisted form produced by [`to_document`] is pretty-printed JSON, which is also a
//! valid YAML flow document. As a purely cosmetic step, values of hexadecimal integer columns
//! are rewritten into `0x..` notation after serialization, keyed on the column name, and
//! [`from_document`] undoes that rewrite before parsing. The in-memory value domain is not
//! affected by either step.

use std::{collections::BTreeMap, fmt};

use serde::{
    de::{self, DeserializeOwned, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::Result;

/// Text records of a flat table, keyed by row index.
pub type TextRecords = BTreeMap<usize, TextValue>;

/// Text records of a matrix table, keyed by `[y][x]`.
pub type MatrixTextRecords = BTreeMap<usize, BTreeMap<usize, TextValue>>;

/// A node of the textual representation.
///
/// Maps are ordered by key, so exported records list their columns alphabetically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextValue {
    /// Boolean literal
    Bool(bool),
    /// Integer literal; wide enough to carry every signed and unsigned 64-bit input
    Int(i128),
    /// String literal, e.g. a symbolic enumeration name
    Str(String),
    /// Sequence of values
    List(Vec<TextValue>),
    /// String-keyed mapping, e.g. one multi-column record
    Map(BTreeMap<String, TextValue>),
}

impl TextValue {
    /// Short human readable name of the variant, used in error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            TextValue::Bool(_) => "bool",
            TextValue::Int(_) => "int",
            TextValue::Str(_) => "str",
            TextValue::List(_) => "list",
            TextValue::Map(_) => "map",
        }
    }

    /// Builds a map node from `(key, value)` pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, TextValue)>,
    {
        TextValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Looks up `key` if this node is a map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TextValue> {
        match self {
            TextValue::Map(entries) => entries.get(key),
            _ => None,
        }
    }
}

impl fmt::Display for TextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextValue::Bool(value) => write!(f, "{value}"),
            TextValue::Int(value) => write!(f, "{value}"),
            TextValue::Str(value) => write!(f, "{value}"),
            TextValue::List(values) => {
                write!(f, "[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
            TextValue::Map(entries) => {
                write!(f, "{{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for TextValue {
    fn from(value: bool) -> Self {
        TextValue::Bool(value)
    }
}

impl From<i64> for TextValue {
    fn from(value: i64) -> Self {
        TextValue::Int(i128::from(value))
    }
}

impl From<u64> for TextValue {
    fn from(value: u64) -> Self {
        TextValue::Int(i128::from(value))
    }
}

impl From<i32> for TextValue {
    fn from(value: i32) -> Self {
        TextValue::Int(i128::from(value))
    }
}

impl From<&str> for TextValue {
    fn from(value: &str) -> Self {
        TextValue::Str(value.to_string())
    }
}

impl From<String> for TextValue {
    fn from(value: String) -> Self {
        TextValue::Str(value)
    }
}

impl<T: Into<TextValue>> From<Vec<T>> for TextValue {
    fn from(values: Vec<T>) -> Self {
        TextValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl Serialize for TextValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            TextValue::Bool(value) => serializer.serialize_bool(*value),
            TextValue::Int(value) => {
                if let Ok(value) = u64::try_from(*value) {
                    serializer.serialize_u64(value)
                } else if let Ok(value) = i64::try_from(*value) {
                    serializer.serialize_i64(value)
                } else {
                    serializer.serialize_i128(*value)
                }
            }
            TextValue::Str(value) => serializer.serialize_str(value),
            TextValue::List(values) => values.serialize(serializer),
            TextValue::Map(entries) => entries.serialize(serializer),
        }
    }
}

struct TextValueVisitor;

impl<'de> Visitor<'de> for TextValueVisitor {
    type Value = TextValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a boolean, integer, string, list or map")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> std::result::Result<TextValue, E> {
        Ok(TextValue::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<TextValue, E> {
        Ok(TextValue::Int(i128::from(value)))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<TextValue, E> {
        Ok(TextValue::Int(i128::from(value)))
    }

    fn visit_i128<E: de::Error>(self, value: i128) -> std::result::Result<TextValue, E> {
        Ok(TextValue::Int(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<TextValue, E> {
        Ok(TextValue::Str(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> std::result::Result<TextValue, E> {
        Ok(TextValue::Str(value))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<TextValue, A::Error> {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element()? {
            values.push(value);
        }
        Ok(TextValue::List(values))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<TextValue, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = map.next_entry::<String, TextValue>()? {
            entries.insert(key, value);
        }
        Ok(TextValue::Map(entries))
    }
}

impl<'de> Deserialize<'de> for TextValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(TextValueVisitor)
    }
}

/// Serializes `records` into a persisted text document.
///
/// Integer values stored under any key listed in `hex_columns` are rendered as `0x..`.
///
/// # Errors
/// Returns [`crate::Error::Json`] if serialization fails.
pub fn to_document<T: Serialize>(records: &T, hex_columns: &[&str]) -> Result<String> {
    let document = serde_json::to_string_pretty(records)?;
    if hex_columns.is_empty() {
        return Ok(document);
    }

    let keys = quoted_keys(hex_columns)?;
    let lines: Vec<String> = document
        .lines()
        .map(|line| rewrite_line(line, &keys, Radix::Hex))
        .collect();
    Ok(lines.join("\n"))
}

/// Parses a text document produced by [`to_document`].
///
/// `0x..` values under any key listed in `hex_columns` are accepted and read as integers.
///
/// # Errors
/// Returns [`crate::Error::Json`] if the document cannot be parsed into `T`.
pub fn from_document<T: DeserializeOwned>(document: &str, hex_columns: &[&str]) -> Result<T> {
    if hex_columns.is_empty() {
        return Ok(serde_json::from_str(document)?);
    }

    let keys = quoted_keys(hex_columns)?;
    let lines: Vec<String> = document
        .lines()
        .map(|line| rewrite_line(line, &keys, Radix::Decimal))
        .collect();
    Ok(serde_json::from_str(&lines.join("\n"))?)
}

#[derive(Clone, Copy)]
enum Radix {
    Hex,
    Decimal,
}

fn quoted_keys(columns: &[&str]) -> Result<Vec<String>> {
    columns
        .iter()
        .map(|column| Ok(format!("{}: ", serde_json::to_string(column)?)))
        .collect()
}

fn rewrite_line(line: &str, keys: &[String], radix: Radix) -> String {
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];

    for key in keys {
        let Some(rest) = body.strip_prefix(key.as_str()) else {
            continue;
        };
        let (literal, trailer) = match rest.strip_suffix(',') {
            Some(literal) => (literal, ","),
            None => (rest, ""),
        };

        let converted = match radix {
            Radix::Hex => literal.parse::<u64>().ok().map(|value| format!("{value:#x}")),
            Radix::Decimal => literal
                .strip_prefix("0x")
                .or_else(|| literal.strip_prefix("0X"))
                .and_then(|digits| u64::from_str_radix(digits, 16).ok())
                .map(|value| value.to_string()),
        };

        if let Some(converted) = converted {
            return format!("{indent}{key}{converted}{trailer}");
        }
    }

    line.to_string()
}

//! Little-endian, bounds-checked access to the byte buffer a table lives in.
//!
//! The ROM image itself is owned by the caller; this module only defines the contract the
//! table codecs need from it, the [`crate::io::ByteBuffer`] trait, and implements it for plain
//! byte slices and vectors.
//!
//! # Key Components
//!
//! - [`crate::io::ByteBuffer`] - Multi-byte little-endian reads/writes and raw slice access
//! - [`crate::io::read_le_at`] - Read a variable-width little-endian integer with auto-advance
//! - [`crate::io::write_le_at`] - Write a variable-width little-endian integer with auto-advance
//!
//! # Usage Examples
//!
//! ```rust
//! use romtable::io::ByteBuffer;
//!
//! let mut rom = vec![0u8; 8];
//! rom.write_multi(2, 3, 0x0A0B0C)?;
//! assert_eq!(rom[2..5], [0x0C, 0x0B, 0x0A]);
//! assert_eq!(rom.read_multi(2, 3)?, 0x0A0B0C);
//! # Ok::<(), romtable::Error>(())
//! ```
//!
//! ## Sequential Reading with Offset Tracking
//!
//! ```rust
//! use romtable::io::{read_le_at, write_le_at};
//!
//! let mut data = [0u8; 6];
//! let mut offset = 0;
//! write_le_at(&mut data, &mut offset, 2, 0x0102)?;
//! write_le_at(&mut data, &mut offset, 4, 0x03040506)?;
//! assert_eq!(offset, 6);
//!
//! offset = 0;
//! assert_eq!(read_le_at(&data, &mut offset, 2)?, 0x0102);
//! assert_eq!(read_le_at(&data, &mut offset, 4)?, 0x03040506);
//! # Ok::<(), romtable::Error>(())
//! ```
//!
//! # Error Handling
//!
//! Every access that would run past the end of the buffer returns [`crate::Error::OutOfBounds`].
//! Integer widths outside `1..=8` are rejected with [`crate::Error::InvalidArgument`], and
//! values that do not fit the requested width with [`crate::Error::ValueOutOfRange`].

use crate::{Error::OutOfBounds, Result};

/// Largest width, in bytes, of an integer that can be read or written in one access.
pub const MAX_INTEGER_WIDTH: usize = 8;

/// Returns the largest unsigned value representable in `width` bytes.
///
/// `width` must be within `1..=MAX_INTEGER_WIDTH`.
#[must_use]
pub fn max_value(width: usize) -> u64 {
    if width >= MAX_INTEGER_WIDTH {
        u64::MAX
    } else {
        (1u64 << (8 * width)) - 1
    }
}

fn check_width(width: usize) -> Result<()> {
    if width == 0 || width > MAX_INTEGER_WIDTH {
        return Err(invalid_argument!(
            "Integer width[{}] must be between 1 and {}",
            width,
            MAX_INTEGER_WIDTH
        ));
    }
    Ok(())
}

/// Byte buffer contract consumed by the table codecs.
///
/// Implementors only need to expose their contents as a slice; all multi-byte arithmetic
/// and bounds checking is provided.
pub trait ByteBuffer {
    /// Read-only view of the whole buffer
    fn as_bytes(&self) -> &[u8];

    /// Mutable view of the whole buffer
    fn as_bytes_mut(&mut self) -> &mut [u8];

    /// Reads an unsigned little-endian integer of `width` bytes at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the buffer is too short, or
    /// [`crate::Error::InvalidArgument`] for a width outside `1..=8`.
    fn read_multi(&self, offset: usize, width: usize) -> Result<u64> {
        let mut offset = offset;
        read_le_at(self.as_bytes(), &mut offset, width)
    }

    /// Writes `value` as an unsigned little-endian integer of `width` bytes at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the buffer is too short,
    /// [`crate::Error::ValueOutOfRange`] if `value` does not fit, or
    /// [`crate::Error::InvalidArgument`] for a width outside `1..=8`.
    fn write_multi(&mut self, offset: usize, width: usize, value: u64) -> Result<()> {
        let mut offset = offset;
        write_le_at(self.as_bytes_mut(), &mut offset, width, value)
    }

    /// Returns the `len` raw bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the buffer.
    fn read_bytes(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let end = offset.checked_add(len).ok_or(OutOfBounds)?;
        self.as_bytes().get(offset..end).ok_or(OutOfBounds)
    }

    /// Copies `bytes` into the buffer starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the buffer.
    fn write_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        let end = offset.checked_add(bytes.len()).ok_or(OutOfBounds)?;
        let target = self.as_bytes_mut().get_mut(offset..end).ok_or(OutOfBounds)?;
        target.copy_from_slice(bytes);
        Ok(())
    }
}

impl ByteBuffer for [u8] {
    fn as_bytes(&self) -> &[u8] {
        self
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        self
    }
}

impl ByteBuffer for Vec<u8> {
    fn as_bytes(&self) -> &[u8] {
        self.as_slice()
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl<const N: usize> ByteBuffer for [u8; N] {
    fn as_bytes(&self) -> &[u8] {
        self.as_slice()
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

/// Reads an unsigned little-endian integer of `width` bytes at `offset`, advancing the offset.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
/// * `offset` - Mutable reference to the offset position (advanced by `width` on success)
/// * `width` - Number of bytes, `1..=8`
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes, or
/// [`crate::Error::InvalidArgument`] for an unsupported width.
pub fn read_le_at(data: &[u8], offset: &mut usize, width: usize) -> Result<u64> {
    check_width(width)?;
    let end = offset.checked_add(width).ok_or(OutOfBounds)?;
    let Some(bytes) = data.get(*offset..end) else {
        return Err(OutOfBounds);
    };

    let mut raw = [0u8; MAX_INTEGER_WIDTH];
    raw[..width].copy_from_slice(bytes);
    *offset = end;

    Ok(u64::from_le_bytes(raw))
}

/// Writes `value` as an unsigned little-endian integer of `width` bytes, advancing the offset.
///
/// # Arguments
///
/// * `data` - The mutable byte buffer to write to
/// * `offset` - Mutable reference to the offset position (advanced by `width` on success)
/// * `width` - Number of bytes, `1..=8`
/// * `value` - The value to write, must fit into `width` bytes
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes,
/// [`crate::Error::ValueOutOfRange`] if the value is too large, or
/// [`crate::Error::InvalidArgument`] for an unsupported width.
pub fn write_le_at(data: &mut [u8], offset: &mut usize, width: usize, value: u64) -> Result<()> {
    check_width(width)?;
    if value > max_value(width) {
        return Err(crate::Error::ValueOutOfRange {
            value: u128::from(value),
            width,
        });
    }

    let end = offset.checked_add(width).ok_or(OutOfBounds)?;
    let Some(target) = data.get_mut(*offset..end) else {
        return Err(OutOfBounds);
    };

    target.copy_from_slice(&value.to_le_bytes()[..width]);
    *offset = end;

    Ok(())
}

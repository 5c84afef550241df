use std::{convert::TryFrom, io};

use byteorder::{BigEndian, WriteBytesExt};

/// Extends [`Write`] with methods for writing Tide types.
///
/// [`Write`]: https://doc.rust-lang.org/std/io/trait.Write.html
pub trait WriteTideExt: io::Write {
    /// Write a byte array prefixed by its length as a big-endian `u32`.
    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        let len = u32::try_from(bytes.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "byte array too long"))?;
        self.write_u32::<BigEndian>(len)?;
        self.write_all(bytes)
    }

    /// Write a UTF-8 string as a length-prefixed byte array.
    #[inline]
    fn write_string(&mut self, string: &str) -> io::Result<()> {
        self.write_bytes(string.as_bytes())
    }

    /// Write an optional byte array: a `0` flag for `None`, or a `1` flag
    /// followed by the length-prefixed bytes.
    #[inline]
    fn write_optional_bytes(&mut self, bytes: Option<&[u8]>) -> io::Result<()> {
        match bytes {
            None => self.write_u8(0),
            Some(bytes) => {
                self.write_u8(1)?;
                self.write_bytes(bytes)
            }
        }
    }

    /// Convenience method to write exactly 32 u8's.
    #[inline]
    fn write_32_bytes(&mut self, bytes: &[u8; 32]) -> io::Result<()> {
        self.write_all(bytes)
    }
}

/// Mark all types implementing `Write` as implementing the extension.
impl<W: io::Write + ?Sized> WriteTideExt for W {}

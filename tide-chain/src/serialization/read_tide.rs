use std::{convert::TryInto, io};

use byteorder::{BigEndian, ReadBytesExt};

use super::{SerializationError, MAX_TIDE_MESSAGE_LEN};

/// Extends [`Read`] with methods for reading Tide types.
///
/// [`Read`]: https://doc.rust-lang.org/std/io/trait.Read.html
pub trait ReadTideExt: io::Read {
    /// Reads a byte array prefixed by its length as a big-endian `u32`.
    ///
    /// # Security
    ///
    /// Lengths greater than [`MAX_TIDE_MESSAGE_LEN`] are rejected before
    /// allocating, so untrusted length prefixes can't exhaust memory.
    #[inline]
    fn read_bytes(&mut self) -> Result<Vec<u8>, SerializationError> {
        let len: usize = self.read_u32::<BigEndian>()?.try_into()?;
        if len > MAX_TIDE_MESSAGE_LEN {
            return Err(SerializationError::Parse(
                "byte array longer than MAX_TIDE_MESSAGE_LEN",
            ));
        }

        let mut bytes = vec![0u8; len];
        self.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads a length-prefixed UTF-8 string.
    #[inline]
    fn read_string(&mut self) -> Result<String, SerializationError> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes).map_err(|_| SerializationError::Parse("invalid utf-8"))
    }

    /// Reads an optional byte array written by
    /// [`WriteTideExt::write_optional_bytes`](super::WriteTideExt::write_optional_bytes).
    #[inline]
    fn read_optional_bytes(&mut self) -> Result<Option<Vec<u8>>, SerializationError> {
        match self.read_u8()? {
            0 => Ok(None),
            1 => Ok(Some(self.read_bytes()?)),
            _ => Err(SerializationError::Parse("invalid option flag")),
        }
    }

    /// Convenience method to read a `[u8; 32]`.
    #[inline]
    fn read_32_bytes(&mut self) -> io::Result<[u8; 32]> {
        let mut bytes = [0; 32];
        self.read_exact(&mut bytes)?;
        Ok(bytes)
    }
}

/// Mark all types implementing `Read` as implementing the extension.
impl<R: io::Read + ?Sized> ReadTideExt for R {}

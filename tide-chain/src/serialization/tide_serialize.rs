use std::io;

use super::WriteTideExt;

/// The maximum length of a Tide consensus message, in bytes.
///
/// This value is used to bound length prefixes before allocating.
pub const MAX_TIDE_MESSAGE_LEN: usize = 1024 * 1024;

/// Consensus-critical serialization for Tide.
///
/// This trait provides a generic serialization for consensus-critical
/// formats, such as transaction bodies and script expressions. It is intended
/// for use only in consensus-critical contexts; in other contexts, such as
/// configuration, it would be preferable to use Serde.
pub trait TideSerialize: Sized {
    /// Write `self` to the given `writer` using the canonical format.
    ///
    /// This function has a `tide_` prefix to alert the reader that the
    /// serialization in use is consensus-critical serialization, rather than
    /// some other kind of serialization.
    ///
    /// Notice that the error type is [`std::io::Error`]; this indicates that
    /// serialization MUST be infallible up to errors in the underlying writer.
    /// In other words, any type implementing `TideSerialize` must make illegal
    /// states unrepresentable.
    fn tide_serialize<W: io::Write>(&self, writer: W) -> Result<(), io::Error>;

    /// Helper function to construct a vec to serialize the current struct into
    fn tide_serialize_to_vec(&self) -> Result<Vec<u8>, io::Error> {
        let mut data = Vec::new();
        self.tide_serialize(&mut data)?;
        Ok(data)
    }
}

/// Write a UTF-8 `String` as a length-prefixed byte array.
impl TideSerialize for String {
    fn tide_serialize<W: io::Write>(&self, mut writer: W) -> Result<(), io::Error> {
        writer.write_string(self)
    }
}

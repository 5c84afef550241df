use std::io;

use super::{ReadTideExt, SerializationError};

/// Consensus-critical deserialization for Tide.
///
/// This trait provides a generic deserialization for consensus-critical
/// formats, such as transaction bodies and script expressions.
pub trait TideDeserialize: Sized {
    /// Try to read `self` from the given `reader`.
    ///
    /// This function has a `tide_` prefix to alert the reader that the
    /// serialization in use is consensus-critical serialization, rather than
    /// some other kind of serialization.
    fn tide_deserialize<R: io::Read>(reader: R) -> Result<Self, SerializationError>;
}

/// Read a length-prefixed UTF-8 string.
impl TideDeserialize for String {
    fn tide_deserialize<R: io::Read>(mut reader: R) -> Result<Self, SerializationError> {
        reader.read_string()
    }
}

/// Helper for deserializing more succinctly via type inference
pub trait TideDeserializeInto {
    /// Deserialize based on type inference
    fn tide_deserialize_into<T>(self) -> Result<T, SerializationError>
    where
        T: TideDeserialize;
}

impl<R: io::Read> TideDeserializeInto for R {
    fn tide_deserialize_into<T>(self) -> Result<T, SerializationError>
    where
        T: TideDeserialize,
    {
        T::tide_deserialize(self)
    }
}

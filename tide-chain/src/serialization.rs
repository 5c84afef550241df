//! Consensus-critical serialization.
//!
//! This module contains four traits: `TideSerialize` and `TideDeserialize`,
//! analogs of the Serde `Serialize` and `Deserialize` traits but intended for
//! consensus-critical Tide serialization formats, and `WriteTideExt` and
//! `ReadTideExt`, extension traits for `io::Read` and `io::Write` with utility
//! functions for reading and writing length-prefixed data.
//!
//! All integers are big-endian.

mod error;
mod read_tide;
mod tide_deserialize;
mod tide_serialize;
mod write_tide;

#[cfg(test)]
mod tests;

pub use error::SerializationError;
pub use read_tide::ReadTideExt;
pub use tide_deserialize::{TideDeserialize, TideDeserializeInto};
pub use tide_serialize::{TideSerialize, MAX_TIDE_MESSAGE_LEN};
pub use write_tide::WriteTideExt;

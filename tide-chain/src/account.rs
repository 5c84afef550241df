//! Account identities: public keys and the addresses derived from them.

use std::{fmt, io};

use thiserror::Error;

use crate::{
    parameters::Network,
    primitives::blake2b_256,
    serialization::{ReadTideExt, SerializationError, TideDeserialize, TideSerialize, WriteTideExt},
};

#[cfg(any(test, feature = "proptest-impl"))]
use proptest_derive::Arbitrary;

/// A 32-byte account public key.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "proptest-impl"), derive(Arbitrary))]
pub struct PublicKey(pub [u8; 32]);

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&hex::encode(self.0)).finish()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl From<[u8; 32]> for PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl TideSerialize for PublicKey {
    fn tide_serialize<W: io::Write>(&self, mut writer: W) -> Result<(), io::Error> {
        writer.write_32_bytes(&self.0)
    }
}

impl TideDeserialize for PublicKey {
    fn tide_deserialize<R: io::Read>(mut reader: R) -> Result<Self, SerializationError> {
        Ok(PublicKey(reader.read_32_bytes()?))
    }
}

/// The address format version.
pub const ADDRESS_VERSION: u8 = 1;

/// The length of the public key hash in an address.
const ADDRESS_HASH_LENGTH: usize = 20;

/// The length of the address checksum.
const ADDRESS_CHECKSUM_LENGTH: usize = 4;

/// The length of a serialized address.
pub const ADDRESS_LENGTH: usize = 2 + ADDRESS_HASH_LENGTH + ADDRESS_CHECKSUM_LENGTH;

/// An account address.
///
/// Layout: version byte, network chain id, the first 20 bytes of the
/// BLAKE2b-256 hash of the public key, then the first 4 bytes of the
/// BLAKE2b-256 hash of the preceding 22 bytes.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Address([u8; ADDRESS_LENGTH]);

/// Errors returned when parsing an [`Address`].
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum AddressError {
    /// The input has the wrong length.
    #[error("address must be {ADDRESS_LENGTH} bytes, got {0}")]
    WrongLength(usize),

    /// The version byte is unknown.
    #[error("unknown address version {0}")]
    UnknownVersion(u8),

    /// The address belongs to another network.
    #[error("address chain id {actual:#04x} doesn't match network chain id {expected:#04x}")]
    WrongNetwork {
        /// the network's chain id
        expected: u8,
        /// the address chain id
        actual: u8,
    },

    /// The trailing checksum doesn't match the address contents.
    #[error("invalid address checksum")]
    InvalidChecksum,
}

impl Address {
    /// Derive the address of `public_key` on `network`.
    pub fn from_public_key(network: Network, public_key: &PublicKey) -> Address {
        let mut bytes = [0; ADDRESS_LENGTH];
        bytes[0] = ADDRESS_VERSION;
        bytes[1] = network.chain_id();
        bytes[2..2 + ADDRESS_HASH_LENGTH]
            .copy_from_slice(&blake2b_256(&public_key.0)[..ADDRESS_HASH_LENGTH]);

        let checksum = blake2b_256(&bytes[..2 + ADDRESS_HASH_LENGTH]);
        bytes[2 + ADDRESS_HASH_LENGTH..].copy_from_slice(&checksum[..ADDRESS_CHECKSUM_LENGTH]);

        Address(bytes)
    }

    /// Parse and validate an address for `network`.
    pub fn from_bytes(network: Network, bytes: &[u8]) -> Result<Address, AddressError> {
        let bytes: [u8; ADDRESS_LENGTH] = bytes
            .try_into()
            .map_err(|_| AddressError::WrongLength(bytes.len()))?;

        if bytes[0] != ADDRESS_VERSION {
            return Err(AddressError::UnknownVersion(bytes[0]));
        }
        if bytes[1] != network.chain_id() {
            return Err(AddressError::WrongNetwork {
                expected: network.chain_id(),
                actual: bytes[1],
            });
        }

        let checksum = blake2b_256(&bytes[..2 + ADDRESS_HASH_LENGTH]);
        if bytes[2 + ADDRESS_HASH_LENGTH..] != checksum[..ADDRESS_CHECKSUM_LENGTH] {
            return Err(AddressError::InvalidChecksum);
        }

        Ok(Address(bytes))
    }

    /// The network chain id byte of this address.
    pub fn chain_id(&self) -> u8 {
        self.0[1]
    }

    /// The raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Address").field(&hex::encode(self.0)).finish()
    }
}

impl TideSerialize for Address {
    fn tide_serialize<W: io::Write>(&self, mut writer: W) -> Result<(), io::Error> {
        writer.write_all(&self.0)
    }
}

impl TideDeserialize for Address {
    /// Reads the raw address bytes.
    ///
    /// The checksum is verified, but the chain id isn't, because the network
    /// isn't known while parsing. Use [`Address::from_bytes`] to also check
    /// the network.
    fn tide_deserialize<R: io::Read>(mut reader: R) -> Result<Self, SerializationError> {
        let mut bytes = [0; ADDRESS_LENGTH];
        reader.read_exact(&mut bytes)?;

        let checksum = blake2b_256(&bytes[..2 + ADDRESS_HASH_LENGTH]);
        if bytes[0] != ADDRESS_VERSION {
            return Err(SerializationError::Parse("unknown address version"));
        }
        if bytes[2 + ADDRESS_HASH_LENGTH..] != checksum[..ADDRESS_CHECKSUM_LENGTH] {
            return Err(SerializationError::Parse("invalid address checksum"));
        }

        Ok(Address(bytes))
    }
}

#[cfg(any(test, feature = "proptest-impl"))]
impl proptest::arbitrary::Arbitrary for Address {
    type Parameters = ();

    fn arbitrary_with(_args: ()) -> Self::Strategy {
        use proptest::prelude::*;

        (any::<Network>(), any::<PublicKey>())
            .prop_map(|(network, public_key)| Address::from_public_key(network, &public_key))
            .boxed()
    }

    type Strategy = proptest::strategy::BoxedStrategy<Self>;
}

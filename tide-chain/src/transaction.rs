//! Transactions and transaction-related structures.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    account::{Address, PublicKey},
    amount::Amount,
    asset::Asset,
    serialization::TideSerialize,
};

#[cfg(any(test, feature = "proptest-impl"))]
mod arbitrary;
mod hash;
mod kind;
mod serialize;


pub use hash::Hash;
pub use kind::{DataEntry, TransactionKind, TransactionType};

/// The maximum number of proofs attached to a transaction.
pub const MAX_PROOF_COUNT: usize = 8;

/// The maximum length of a single proof, in bytes.
pub const MAX_PROOF_LENGTH: usize = 64;

/// The maximum length of a transfer attachment, in bytes.
pub const MAX_ATTACHMENT_LENGTH: usize = 140;

/// The maximum number of recipients in a `MassTransfer` transaction.
pub const MAX_MASS_TRANSFER_COUNT: usize = 100;

/// The maximum number of entries in a `Data` transaction.
pub const MAX_DATA_ENTRY_COUNT: usize = 100;

/// The maximum length of a raw script in a `SetScript` transaction, in bytes.
///
/// This is a parsing bound; the script compiler enforces the smaller
/// consensus limit on compiled scripts.
pub const MAX_RAW_SCRIPT_LENGTH: usize = 32 * 1024;

/// A signature or other authorization proof for a transaction.
#[derive(Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Proof(#[serde(with = "hex")] pub Vec<u8>);

impl fmt::Debug for Proof {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Proof").field(&hex::encode(&self.0)).finish()
    }
}

/// Structural errors in a transaction.
///
/// These rules are checked when a transaction is constructed or parsed, so
/// every [`Transaction`] value satisfies them.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// Too many proofs.
    #[error("transaction has {0} proofs, the maximum is {MAX_PROOF_COUNT}")]
    TooManyProofs(usize),

    /// A proof is too long.
    #[error("proof is {0} bytes, the maximum is {MAX_PROOF_LENGTH}")]
    ProofTooLong(usize),

    /// An attachment is too long.
    #[error("attachment is {0} bytes, the maximum is {MAX_ATTACHMENT_LENGTH}")]
    AttachmentTooLong(usize),

    /// A mass transfer has too many recipients.
    #[error("mass transfer has {0} recipients, the maximum is {MAX_MASS_TRANSFER_COUNT}")]
    TooManyTransfers(usize),

    /// A data transaction has too many entries.
    #[error("data transaction has {0} entries, the maximum is {MAX_DATA_ENTRY_COUNT}")]
    TooManyDataEntries(usize),

    /// A raw script is too long to parse.
    #[error("raw script is {0} bytes, the maximum is {MAX_RAW_SCRIPT_LENGTH}")]
    ScriptTooLong(usize),

    /// The timestamp can't be represented in milliseconds since the epoch.
    #[error("timestamp is out of range")]
    TimestampOutOfRange,
}

/// A Tide transaction.
///
/// Every transaction pays a `fee`, denominated in `fee_asset`, from its
/// `sender`. The rest of the transaction's contents depend on its
/// [`TransactionKind`].
///
/// Transactions are immutable once constructed: the fields that make up the
/// transaction id can only be set by [`Transaction::new`] or by parsing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    kind: TransactionKind,
    sender: PublicKey,
    fee: Amount,
    fee_asset: Asset,
    timestamp: DateTime<Utc>,
    proofs: Vec<Proof>,
}

impl Transaction {
    /// Create a new transaction, checking its structural rules.
    pub fn new(
        kind: TransactionKind,
        sender: PublicKey,
        fee: Amount,
        fee_asset: Asset,
        timestamp: DateTime<Utc>,
        proofs: Vec<Proof>,
    ) -> Result<Transaction, Error> {
        if proofs.len() > MAX_PROOF_COUNT {
            return Err(Error::TooManyProofs(proofs.len()));
        }
        if let Some(proof) = proofs.iter().find(|proof| proof.0.len() > MAX_PROOF_LENGTH) {
            return Err(Error::ProofTooLong(proof.0.len()));
        }
        kind.check_structure()?;

        // Timestamps are serialized as milliseconds, so they must round-trip
        let millis = timestamp.timestamp_millis();
        let timestamp = DateTime::<Utc>::from_timestamp_millis(millis)
            .filter(|_| millis >= 0)
            .ok_or(Error::TimestampOutOfRange)?;

        Ok(Transaction {
            kind,
            sender,
            fee,
            fee_asset,
            timestamp,
            proofs,
        })
    }

    /// Compute the hash (id) of this transaction.
    pub fn hash(&self) -> Hash {
        Hash::from(self)
    }

    /// The type-specific contents of this transaction.
    pub fn kind(&self) -> &TransactionKind {
        &self.kind
    }

    /// The type of this transaction.
    pub fn transaction_type(&self) -> TransactionType {
        self.kind.transaction_type()
    }

    /// The public key of the account that sends this transaction and pays its fee.
    pub fn sender(&self) -> PublicKey {
        self.sender
    }

    /// The fee paid by this transaction, in units of [`Transaction::fee_asset`].
    pub fn fee(&self) -> Amount {
        self.fee
    }

    /// The asset used to pay the fee.
    pub fn fee_asset(&self) -> Asset {
        self.fee_asset
    }

    /// The time this transaction was created, with millisecond precision.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The proofs authorizing this transaction.
    pub fn proofs(&self) -> &[Proof] {
        &self.proofs
    }

    /// The recipient of the value transferred by this transaction, if it has
    /// exactly one.
    pub fn recipient(&self) -> Option<Address> {
        self.kind.recipient()
    }

    /// The asset transferred by this transaction, if any.
    pub fn transferred_asset(&self) -> Option<Asset> {
        self.kind.transferred_asset()
    }

    /// The canonical bytes that identify this transaction: every field
    /// except the proofs.
    pub fn body_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        self.write_body(&mut bytes)
            .expect("structurally valid transactions always serialize to a Vec");
        bytes
    }

    /// The length of the full serialized transaction, including proofs.
    pub fn serialized_size(&self) -> usize {
        self.tide_serialize_to_vec()
            .expect("structurally valid transactions always serialize to a Vec")
            .len()
    }
}

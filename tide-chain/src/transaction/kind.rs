//! The type-specific contents of each transaction type.

use std::fmt;

use crate::{
    account::Address,
    amount::Amount,
    asset::{Asset, AssetId},
};

use super::{
    Error, Hash, MAX_ATTACHMENT_LENGTH, MAX_DATA_ENTRY_COUNT, MAX_MASS_TRANSFER_COUNT,
    MAX_RAW_SCRIPT_LENGTH,
};

/// The numeric type of a transaction, as it appears in the serialized body.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TransactionType {
    /// Initial distribution in the genesis block.
    Genesis = 1,
    /// Legacy native-currency payment.
    Payment = 2,
    /// Create a new asset.
    Issue = 3,
    /// Transfer any asset to one recipient.
    Transfer = 4,
    /// Increase the supply of an asset.
    Reissue = 5,
    /// Destroy some units of an asset.
    Burn = 6,
    /// Lease native currency to a block generator.
    Lease = 8,
    /// Cancel a lease.
    LeaseCancel = 9,
    /// Register an alias for the sender's address.
    CreateAlias = 10,
    /// Transfer any asset to many recipients.
    MassTransfer = 11,
    /// Store key-value entries in the sender's account.
    Data = 12,
    /// Attach, replace, or clear the sender's account script.
    SetScript = 13,
    /// Set or cancel the fee sponsorship of an asset.
    SponsorFee = 14,
}

impl TransactionType {
    /// Every transaction type, in type id order.
    pub const ALL: [TransactionType; 13] = [
        TransactionType::Genesis,
        TransactionType::Payment,
        TransactionType::Issue,
        TransactionType::Transfer,
        TransactionType::Reissue,
        TransactionType::Burn,
        TransactionType::Lease,
        TransactionType::LeaseCancel,
        TransactionType::CreateAlias,
        TransactionType::MassTransfer,
        TransactionType::Data,
        TransactionType::SetScript,
        TransactionType::SponsorFee,
    ];

    /// Returns the type id byte.
    pub fn id(&self) -> u8 {
        *self as u8
    }

    /// Returns the transaction type with `id`, if there is one.
    pub fn from_id(id: u8) -> Option<TransactionType> {
        TransactionType::ALL.iter().copied().find(|ty| ty.id() == id)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A key-value entry stored by a `Data` transaction.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct DataEntry {
    /// The entry key.
    pub key: String,
    /// The raw entry value.
    #[serde(with = "hex")]
    pub value: Vec<u8>,
}

/// The type-specific contents of a transaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TransactionKind {
    /// Initial distribution of the native currency.
    Genesis {
        /// the receiving address
        recipient: Address,
        /// the amount created
        amount: Amount,
    },

    /// A legacy native-currency payment.
    Payment {
        /// the receiving address
        recipient: Address,
        /// the amount paid
        amount: Amount,
    },

    /// Creates a new asset, whose id is the id of this transaction.
    Issue {
        /// the asset name
        name: String,
        /// the asset description
        description: String,
        /// the initial supply
        quantity: Amount,
        /// the number of decimal places
        decimals: u8,
        /// can the supply be increased later?
        reissuable: bool,
    },

    /// Transfers an asset to one recipient.
    Transfer {
        /// the receiving address
        recipient: Address,
        /// the transferred asset
        asset: Asset,
        /// the transferred amount
        amount: Amount,
        /// arbitrary data attached by the sender
        attachment: Vec<u8>,
    },

    /// Increases the supply of an asset.
    Reissue {
        /// the reissued asset
        asset: AssetId,
        /// the supply increase
        quantity: Amount,
        /// can the supply be increased again?
        reissuable: bool,
    },

    /// Destroys some units of an asset.
    Burn {
        /// the burned asset
        asset: AssetId,
        /// the burned amount
        amount: Amount,
    },

    /// Leases native currency to a block generator.
    Lease {
        /// the lessee
        recipient: Address,
        /// the leased amount
        amount: Amount,
    },

    /// Cancels a lease.
    LeaseCancel {
        /// the id of the `Lease` transaction
        lease_id: Hash,
    },

    /// Registers an alias for the sender's address.
    CreateAlias {
        /// the alias
        alias: String,
    },

    /// Transfers an asset to many recipients.
    MassTransfer {
        /// the transferred asset
        asset: Asset,
        /// the recipients and amounts
        transfers: Vec<(Address, Amount)>,
        /// arbitrary data attached by the sender
        attachment: Vec<u8>,
    },

    /// Stores key-value entries in the sender's account.
    Data {
        /// the stored entries
        entries: Vec<DataEntry>,
    },

    /// Attaches a script to the sender's account, or clears it with `None`.
    ///
    /// The script is stored in its serialized artifact form, and parsed by
    /// the script crate during validation.
    SetScript {
        /// the serialized script artifact
        script: Option<Vec<u8>>,
    },

    /// Sets the fee sponsorship of an asset, or cancels it with `None`.
    SponsorFee {
        /// the sponsored asset
        asset: AssetId,
        /// the number of asset units worth one native fee unit
        min_sponsored_asset_fee: Option<Amount>,
    },
}

impl TransactionKind {
    /// The type of this transaction.
    pub fn transaction_type(&self) -> TransactionType {
        use TransactionKind::*;

        match self {
            Genesis { .. } => TransactionType::Genesis,
            Payment { .. } => TransactionType::Payment,
            Issue { .. } => TransactionType::Issue,
            Transfer { .. } => TransactionType::Transfer,
            Reissue { .. } => TransactionType::Reissue,
            Burn { .. } => TransactionType::Burn,
            Lease { .. } => TransactionType::Lease,
            LeaseCancel { .. } => TransactionType::LeaseCancel,
            CreateAlias { .. } => TransactionType::CreateAlias,
            MassTransfer { .. } => TransactionType::MassTransfer,
            Data { .. } => TransactionType::Data,
            SetScript { .. } => TransactionType::SetScript,
            SponsorFee { .. } => TransactionType::SponsorFee,
        }
    }

    /// The single recipient of this transaction, if it has one.
    pub fn recipient(&self) -> Option<Address> {
        use TransactionKind::*;

        match self {
            Genesis { recipient, .. }
            | Payment { recipient, .. }
            | Transfer { recipient, .. }
            | Lease { recipient, .. } => Some(*recipient),
            _ => None,
        }
    }

    /// The asset transferred by this transaction, if it transfers value.
    pub fn transferred_asset(&self) -> Option<Asset> {
        use TransactionKind::*;

        match self {
            Genesis { .. } | Payment { .. } | Lease { .. } => Some(Asset::Native),
            Transfer { asset, .. } | MassTransfer { asset, .. } => Some(*asset),
            _ => None,
        }
    }

    /// Checks the structural size limits of this transaction's contents.
    pub(super) fn check_structure(&self) -> Result<(), Error> {
        use TransactionKind::*;

        match self {
            Transfer { attachment, .. } if attachment.len() > MAX_ATTACHMENT_LENGTH => {
                Err(Error::AttachmentTooLong(attachment.len()))
            }
            MassTransfer {
                transfers,
                attachment,
                ..
            } => {
                if transfers.len() > MAX_MASS_TRANSFER_COUNT {
                    Err(Error::TooManyTransfers(transfers.len()))
                } else if attachment.len() > MAX_ATTACHMENT_LENGTH {
                    Err(Error::AttachmentTooLong(attachment.len()))
                } else {
                    Ok(())
                }
            }
            Data { entries } if entries.len() > MAX_DATA_ENTRY_COUNT => {
                Err(Error::TooManyDataEntries(entries.len()))
            }
            SetScript {
                script: Some(script),
            } if script.len() > MAX_RAW_SCRIPT_LENGTH => Err(Error::ScriptTooLong(script.len())),
            _ => Ok(()),
        }
    }
}

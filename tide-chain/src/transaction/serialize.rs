//! Contains impls of `TideSerialize`, `TideDeserialize` for all of the
//! transaction types, so that all of the serialization logic is in one place.

use std::{convert::TryFrom, io};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};

use crate::{
    account::{Address, PublicKey},
    amount::Amount,
    asset::{Asset, AssetId},
    serialization::{
        ReadTideExt, SerializationError, TideDeserialize, TideDeserializeInto, TideSerialize,
        WriteTideExt,
    },
};

use super::*;

fn invalid_input(message: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

fn write_count<W: io::Write>(mut writer: W, count: usize) -> io::Result<()> {
    let count = u16::try_from(count).map_err(|_| invalid_input("list too long"))?;
    writer.write_u16::<BigEndian>(count)
}

fn write_optional_amount<W: io::Write>(mut writer: W, amount: Option<Amount>) -> io::Result<()> {
    match amount {
        None => writer.write_u8(0),
        Some(amount) => {
            writer.write_u8(1)?;
            amount.tide_serialize(writer)
        }
    }
}

fn read_bool<R: io::Read>(mut reader: R) -> Result<bool, SerializationError> {
    match reader.read_u8()? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(SerializationError::Parse("invalid bool flag")),
    }
}

fn read_optional_amount<R: io::Read>(mut reader: R) -> Result<Option<Amount>, SerializationError> {
    match reader.read_u8()? {
        0 => Ok(None),
        1 => Ok(Some((&mut reader).tide_deserialize_into()?)),
        _ => Err(SerializationError::Parse("invalid option flag")),
    }
}

impl TideSerialize for TransactionKind {
    fn tide_serialize<W: io::Write>(&self, mut writer: W) -> Result<(), io::Error> {
        use TransactionKind::*;

        match self {
            Genesis { recipient, amount }
            | Payment { recipient, amount }
            | Lease { recipient, amount } => {
                recipient.tide_serialize(&mut writer)?;
                amount.tide_serialize(&mut writer)?;
            }
            Issue {
                name,
                description,
                quantity,
                decimals,
                reissuable,
            } => {
                writer.write_string(name)?;
                writer.write_string(description)?;
                quantity.tide_serialize(&mut writer)?;
                writer.write_u8(*decimals)?;
                writer.write_u8(u8::from(*reissuable))?;
            }
            Transfer {
                recipient,
                asset,
                amount,
                attachment,
            } => {
                recipient.tide_serialize(&mut writer)?;
                asset.tide_serialize(&mut writer)?;
                amount.tide_serialize(&mut writer)?;
                writer.write_bytes(attachment)?;
            }
            Reissue {
                asset,
                quantity,
                reissuable,
            } => {
                writer.write_32_bytes(&asset.0)?;
                quantity.tide_serialize(&mut writer)?;
                writer.write_u8(u8::from(*reissuable))?;
            }
            Burn { asset, amount } => {
                writer.write_32_bytes(&asset.0)?;
                amount.tide_serialize(&mut writer)?;
            }
            LeaseCancel { lease_id } => writer.write_32_bytes(&lease_id.0)?,
            CreateAlias { alias } => writer.write_string(alias)?,
            MassTransfer {
                asset,
                transfers,
                attachment,
            } => {
                asset.tide_serialize(&mut writer)?;
                write_count(&mut writer, transfers.len())?;
                for (recipient, amount) in transfers {
                    recipient.tide_serialize(&mut writer)?;
                    amount.tide_serialize(&mut writer)?;
                }
                writer.write_bytes(attachment)?;
            }
            Data { entries } => {
                write_count(&mut writer, entries.len())?;
                for entry in entries {
                    writer.write_string(&entry.key)?;
                    writer.write_bytes(&entry.value)?;
                }
            }
            SetScript { script } => writer.write_optional_bytes(script.as_deref())?,
            SponsorFee {
                asset,
                min_sponsored_asset_fee,
            } => {
                writer.write_32_bytes(&asset.0)?;
                write_optional_amount(&mut writer, *min_sponsored_asset_fee)?;
            }
        }

        Ok(())
    }
}

impl TransactionKind {
    /// Reads the contents of a transaction of type `ty`.
    fn tide_deserialize_as<R: io::Read>(
        ty: TransactionType,
        mut reader: R,
    ) -> Result<Self, SerializationError> {
        use TransactionKind::*;

        let kind = match ty {
            TransactionType::Genesis => Genesis {
                recipient: (&mut reader).tide_deserialize_into()?,
                amount: (&mut reader).tide_deserialize_into()?,
            },
            TransactionType::Payment => Payment {
                recipient: (&mut reader).tide_deserialize_into()?,
                amount: (&mut reader).tide_deserialize_into()?,
            },
            TransactionType::Lease => Lease {
                recipient: (&mut reader).tide_deserialize_into()?,
                amount: (&mut reader).tide_deserialize_into()?,
            },
            TransactionType::Issue => Issue {
                name: reader.read_string()?,
                description: reader.read_string()?,
                quantity: (&mut reader).tide_deserialize_into()?,
                decimals: reader.read_u8()?,
                reissuable: read_bool(&mut reader)?,
            },
            TransactionType::Transfer => Transfer {
                recipient: (&mut reader).tide_deserialize_into()?,
                asset: (&mut reader).tide_deserialize_into()?,
                amount: (&mut reader).tide_deserialize_into()?,
                attachment: reader.read_bytes()?,
            },
            TransactionType::Reissue => Reissue {
                asset: AssetId(reader.read_32_bytes()?),
                quantity: (&mut reader).tide_deserialize_into()?,
                reissuable: read_bool(&mut reader)?,
            },
            TransactionType::Burn => Burn {
                asset: AssetId(reader.read_32_bytes()?),
                amount: (&mut reader).tide_deserialize_into()?,
            },
            TransactionType::LeaseCancel => LeaseCancel {
                lease_id: Hash(reader.read_32_bytes()?),
            },
            TransactionType::CreateAlias => CreateAlias {
                alias: reader.read_string()?,
            },
            TransactionType::MassTransfer => {
                let asset: Asset = (&mut reader).tide_deserialize_into()?;

                let count = usize::from(reader.read_u16::<BigEndian>()?);
                if count > MAX_MASS_TRANSFER_COUNT {
                    return Err(Error::TooManyTransfers(count).into());
                }

                let mut transfers = Vec::with_capacity(count);
                for _ in 0..count {
                    let recipient: Address = (&mut reader).tide_deserialize_into()?;
                    let amount: Amount = (&mut reader).tide_deserialize_into()?;
                    transfers.push((recipient, amount));
                }

                MassTransfer {
                    asset,
                    transfers,
                    attachment: reader.read_bytes()?,
                }
            }
            TransactionType::Data => {
                let count = usize::from(reader.read_u16::<BigEndian>()?);
                if count > MAX_DATA_ENTRY_COUNT {
                    return Err(Error::TooManyDataEntries(count).into());
                }

                let mut entries = Vec::with_capacity(count);
                for _ in 0..count {
                    entries.push(DataEntry {
                        key: reader.read_string()?,
                        value: reader.read_bytes()?,
                    });
                }

                Data { entries }
            }
            TransactionType::SetScript => SetScript {
                script: reader.read_optional_bytes()?,
            },
            TransactionType::SponsorFee => SponsorFee {
                asset: AssetId(reader.read_32_bytes()?),
                min_sponsored_asset_fee: read_optional_amount(&mut reader)?,
            },
        };

        Ok(kind)
    }
}

impl Transaction {
    /// Writes the transaction body: every field except the proofs.
    pub(super) fn write_body<W: io::Write>(&self, mut writer: W) -> Result<(), io::Error> {
        writer.write_u8(self.kind.transaction_type().id())?;
        self.sender.tide_serialize(&mut writer)?;
        self.kind.tide_serialize(&mut writer)?;
        self.fee_asset.tide_serialize(&mut writer)?;
        self.fee.tide_serialize(&mut writer)?;
        writer.write_i64::<BigEndian>(self.timestamp.timestamp_millis())?;
        Ok(())
    }
}

impl TideSerialize for Transaction {
    fn tide_serialize<W: io::Write>(&self, mut writer: W) -> Result<(), io::Error> {
        self.write_body(&mut writer)?;

        // `Transaction::new` limits the proof count to `MAX_PROOF_COUNT`
        writer.write_u8(self.proofs.len() as u8)?;
        for proof in &self.proofs {
            writer.write_bytes(&proof.0)?;
        }

        Ok(())
    }
}

impl TideDeserialize for Transaction {
    fn tide_deserialize<R: io::Read>(mut reader: R) -> Result<Self, SerializationError> {
        let ty = TransactionType::from_id(reader.read_u8()?)
            .ok_or(SerializationError::Parse("unknown transaction type"))?;

        let sender: PublicKey = (&mut reader).tide_deserialize_into()?;
        let kind = TransactionKind::tide_deserialize_as(ty, &mut reader)?;
        let fee_asset: Asset = (&mut reader).tide_deserialize_into()?;
        let fee: Amount = (&mut reader).tide_deserialize_into()?;

        let millis = reader.read_i64::<BigEndian>()?;
        let timestamp: DateTime<Utc> = DateTime::<Utc>::from_timestamp_millis(millis)
            .filter(|_| millis >= 0)
            .ok_or(Error::TimestampOutOfRange)?;

        let proof_count = usize::from(reader.read_u8()?);
        if proof_count > MAX_PROOF_COUNT {
            return Err(Error::TooManyProofs(proof_count).into());
        }

        let mut proofs = Vec::with_capacity(proof_count);
        for _ in 0..proof_count {
            proofs.push(Proof(reader.read_bytes()?));
        }

        Ok(Transaction::new(
            kind, sender, fee, fee_asset, timestamp, proofs,
        )?)
    }
}

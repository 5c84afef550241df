//! Assets: the native currency, issued assets, and fee sponsorship records.

use std::{fmt, io};

use byteorder::{ReadBytesExt, WriteBytesExt};

use crate::{
    amount::Amount,
    serialization::{ReadTideExt, SerializationError, TideDeserialize, TideSerialize, WriteTideExt},
};

#[cfg(any(test, feature = "proptest-impl"))]
use proptest_derive::Arbitrary;

/// The id of an issued asset: the id of the transaction that issued it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "proptest-impl"), derive(Arbitrary))]
pub struct AssetId(pub [u8; 32]);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("AssetId").field(&hex::encode(self.0)).finish()
    }
}

impl From<[u8; 32]> for AssetId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// An asset that can be transferred, or used to pay a transaction fee.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "proptest-impl"), derive(Arbitrary))]
pub enum Asset {
    /// The native currency of the chain.
    #[default]
    Native,

    /// An asset created by an `Issue` transaction.
    Issued(AssetId),
}

impl Asset {
    /// Returns true if this is the native currency.
    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }

    /// Returns the issued asset id, or `None` for the native currency.
    pub fn issued_id(&self) -> Option<AssetId> {
        match self {
            Asset::Native => None,
            Asset::Issued(id) => Some(*id),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Asset::Native => f.write_str("native"),
            Asset::Issued(id) => id.fmt(f),
        }
    }
}

impl TideSerialize for Asset {
    fn tide_serialize<W: io::Write>(&self, mut writer: W) -> Result<(), io::Error> {
        match self {
            Asset::Native => writer.write_u8(0),
            Asset::Issued(id) => {
                writer.write_u8(1)?;
                writer.write_32_bytes(&id.0)
            }
        }
    }
}

impl TideDeserialize for Asset {
    fn tide_deserialize<R: io::Read>(mut reader: R) -> Result<Self, SerializationError> {
        match reader.read_u8()? {
            0 => Ok(Asset::Native),
            1 => Ok(Asset::Issued(AssetId(reader.read_32_bytes()?))),
            _ => Err(SerializationError::Parse("invalid asset flag")),
        }
    }
}

/// A fee sponsorship record for an issued asset.
///
/// Holders of a sponsored asset can pay transaction fees in that asset. The
/// issuer pays the equivalent native fee: `min_sponsored_asset_fee` units of
/// the asset are worth one fee unit of the native currency.
///
/// Records are created and cancelled by `SponsorFee` transactions. A missing
/// record means the asset can't be used to pay fees.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Sponsorship {
    min_sponsored_asset_fee: Amount,
}

impl Sponsorship {
    /// Returns a sponsorship record, or `None` if `min_sponsored_asset_fee` is
    /// zero, which would make every fee infinitely valuable.
    pub fn new(min_sponsored_asset_fee: Amount) -> Option<Self> {
        (!min_sponsored_asset_fee.is_zero()).then_some(Self {
            min_sponsored_asset_fee,
        })
    }

    /// The number of asset units that pay for one native fee unit.
    pub fn min_sponsored_asset_fee(&self) -> Amount {
        self.min_sponsored_asset_fee
    }
}

#[cfg(any(test, feature = "proptest-impl"))]
impl proptest::arbitrary::Arbitrary for Sponsorship {
    type Parameters = ();

    fn arbitrary_with(_args: ()) -> Self::Strategy {
        use proptest::prelude::*;

        (1..=crate::amount::MAX_MONEY)
            .prop_map(|units| Sponsorship {
                min_sponsored_asset_fee: Amount::new(units),
            })
            .boxed()
    }

    type Strategy = proptest::strategy::BoxedStrategy<Self>;
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::serialization::TideDeserializeInto;

    use super::*;

    #[test]
    fn zero_sponsorship_is_not_a_record() {
        let _init_guard = tide_test::init();

        assert_eq!(Sponsorship::new(Amount::zero()), None);
        assert_eq!(
            Sponsorship::new(Amount::new(10)).map(|s| s.min_sponsored_asset_fee()),
            Some(Amount::new(10))
        );
    }

    #[test]
    fn asset_encoding() {
        let _init_guard = tide_test::init();

        let native = Asset::Native.tide_serialize_to_vec().expect("vec writes don't fail");
        assert_eq!(native, vec![0]);

        let issued = Asset::Issued(AssetId([7; 32]));
        let bytes = issued.tide_serialize_to_vec().expect("vec writes don't fail");
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 1);

        let decoded: Asset = Cursor::new(&bytes)
            .tide_deserialize_into()
            .expect("valid encoding");
        assert_eq!(decoded, issued);

        let invalid: Result<Asset, _> = Cursor::new(&[2u8][..]).tide_deserialize_into();
        assert!(invalid.is_err());
    }
}

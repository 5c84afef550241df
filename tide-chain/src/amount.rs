//! Strongly-typed native and asset amounts that prevent under/overflows.
//!
//! An [`Amount`] is always non-negative and at most [`MAX_MONEY`]. In
//! contrast to regular arithmetic operations, which return values, arithmetic
//! on [`Amount`]s returns [`Result`](std::result::Result)s.

use std::{convert::TryFrom, fmt, io, ops::RangeInclusive};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::serialization::{SerializationError, TideDeserialize, TideSerialize};

#[cfg(any(test, feature = "proptest-impl"))]
mod arbitrary;


/// The result of an amount operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The number of base units in one whole native coin.
pub const COIN: i64 = 100_000_000;

/// The maximum amount of any asset, in base units.
pub const MAX_MONEY: i64 = 100_000_000 * COIN;

/// A runtime validated type for representing amounts of base units.
///
/// The same type is used for native-currency amounts and issued-asset amounts;
/// which asset an amount is denominated in is tracked by the containing type.
#[derive(Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64")]
#[serde(into = "i64")]
pub struct Amount(i64);

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = self.units();

        f.pad_integral(true, "", &units.to_string())
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Amount").field(&self.0).finish()
    }
}

impl Amount {
    /// Create a new [`Amount`] from a provided value in base units.
    ///
    /// # Panics
    ///
    /// If `units` is negative or greater than [`MAX_MONEY`].
    pub const fn new(units: i64) -> Self {
        assert!(units <= MAX_MONEY && units >= 0);
        Self(units)
    }

    /// Returns the number of base units in this amount.
    pub fn units(&self) -> i64 {
        self.0
    }

    /// Create a zero `Amount`
    pub const fn zero() -> Amount {
        Amount(0)
    }

    /// Returns true if this amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition, returning an error if the result exceeds [`MAX_MONEY`].
    pub fn checked_add(self, rhs: Amount) -> Result<Amount> {
        let value = self
            .0
            .checked_add(rhs.0)
            .expect("adding two constrained Amounts is always within an i64");
        value.try_into()
    }

    /// Checked subtraction, returning an error if the result is negative.
    pub fn checked_sub(self, rhs: Amount) -> Result<Amount> {
        (self.0 - rhs.0).try_into()
    }

    /// Multiply by a count, returning an error if the result exceeds [`MAX_MONEY`].
    pub fn checked_mul(self, rhs: u64) -> Result<Amount> {
        let rhs = i64::try_from(rhs).map_err(|_| Error::MultiplicationOverflow {
            amount: self.0,
            multiplier: rhs,
        })?;

        self.0
            .checked_mul(rhs)
            .ok_or(Error::MultiplicationOverflow {
                amount: self.0,
                multiplier: rhs as u64,
            })?
            .try_into()
    }
}

impl TryFrom<i64> for Amount {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let range = Amount::valid_range();

        if range.contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::Constraint { value, range })
        }
    }
}

impl TryFrom<u64> for Amount {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        let value = i64::try_from(value).map_err(|_| Error::Convert { value })?;
        value.try_into()
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> Self {
        amount.0 as u64
    }
}

impl From<Amount> for u128 {
    fn from(amount: Amount) -> Self {
        amount.0 as u128
    }
}

impl Amount {
    /// The valid range of base-unit values for an [`Amount`].
    pub fn valid_range() -> RangeInclusive<i64> {
        0..=MAX_MONEY
    }
}

impl std::iter::Sum<Amount> for Result<Amount> {
    fn sum<I: Iterator<Item = Amount>>(mut iter: I) -> Self {
        iter.try_fold(Amount::zero(), Amount::checked_add)
    }
}

impl TideSerialize for Amount {
    fn tide_serialize<W: io::Write>(&self, mut writer: W) -> Result<(), io::Error> {
        writer.write_i64::<BigEndian>(self.0)
    }
}

impl TideDeserialize for Amount {
    fn tide_deserialize<R: io::Read>(mut reader: R) -> Result<Self, SerializationError> {
        Ok(reader.read_i64::<BigEndian>()?.try_into()?)
    }
}

/// Errors that can be returned when validating [`Amount`]s.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The value is negative or greater than `MAX_MONEY`.
    #[error("input {value} is outside of valid range for an amount, expected {range:?}")]
    Constraint {
        /// the invalid value
        value: i64,
        /// the valid range
        range: RangeInclusive<i64>,
    },

    /// The value doesn't fit in an `i64`.
    #[error("u64 {value} could not be converted to an i64 amount")]
    Convert {
        /// the invalid value
        value: u64,
    },

    /// A multiplication overflowed.
    #[error("amount {amount} * {multiplier} overflowed")]
    MultiplicationOverflow {
        /// the amount
        amount: i64,
        /// the multiplier
        multiplier: u64,
    },
}

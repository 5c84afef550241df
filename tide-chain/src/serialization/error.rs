use std::{io, num::TryFromIntError};

use thiserror::Error;

/// A serialization error.
#[derive(Error, Debug)]
pub enum SerializationError {
    /// An io error that prevented deserialization
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The data to be deserialized was malformed.
    #[error("parse error: {0}")]
    Parse(&'static str),

    /// A length field was too large to convert to a usize
    #[error("length too large: {0}")]
    TryFromIntError(#[from] TryFromIntError),

    /// An error caused when validating an `Amount`
    #[error("input couldn't be parsed as an `Amount`: {source}")]
    Amount {
        /// The source error indicating how the num failed to validate
        #[from]
        source: crate::amount::Error,
    },

    /// The parsed transaction breaks a structural rule
    #[error("transaction is structurally invalid: {source}")]
    Transaction {
        /// The structural rule that was broken
        #[from]
        source: crate::transaction::Error,
    },
}

impl PartialEq for SerializationError {
    fn eq(&self, other: &Self) -> bool {
        // io::Error doesn't implement PartialEq, so compare by kind
        match (self, other) {
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Parse(a), Self::Parse(b)) => a == b,
            (Self::TryFromIntError(a), Self::TryFromIntError(b)) => a == b,
            (Self::Amount { source: a }, Self::Amount { source: b }) => a == b,
            (Self::Transaction { source: a }, Self::Transaction { source: b }) => a == b,
            _ => false,
        }
    }
}

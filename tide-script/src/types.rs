//! The value types of the script language.

use std::fmt;

/// The type of a script value.
///
/// Types are fixed by the language version: a script can't declare new
/// types, and there is no implicit conversion between them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Type {
    /// A signed 64-bit integer.
    Long,
    /// `true` or `false`.
    Boolean,
    /// An arbitrary byte array.
    ByteVector,
    /// A UTF-8 string.
    String,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Type::Long => "Long",
            Type::Boolean => "Boolean",
            Type::ByteVector => "ByteVector",
            Type::String => "String",
        })
    }
}

/// Formats a list of types as `A, B, C`.
pub(crate) fn join_types(types: &[Type]) -> String {
    types
        .iter()
        .map(Type::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

//! Errors that can occur when checking, estimating, compiling or decoding
//! account scripts.

use thiserror::Error;

use tide_chain::serialization::SerializationError;

use crate::{
    context::FunctionHeader,
    types::{join_types, Type},
};

/// An expression failed type checking.
///
/// Variants that point at a specific node carry its rendering in `expr`.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TypeError {
    #[error("undefined symbol `{name}`")]
    UndefinedSymbol { name: String },

    #[error("undefined function `{name}`")]
    UndefinedFunction { name: String },

    #[error("no function `{name}` takes ({}) in {expr}", join_types(actual))]
    SignatureMismatch {
        name: String,
        actual: Vec<Type>,
        expr: String,
    },

    #[error("`if` condition must be Boolean, found {actual} in {expr}")]
    IfConditionNotBoolean { actual: Type, expr: String },

    #[error("`if` branches have different types {if_true} and {if_false} in {expr}")]
    IfBranchMismatch {
        if_true: Type,
        if_false: Type,
        expr: String,
    },

    #[error("`{name}` is already defined")]
    AlreadyDefined { name: String },

    #[error("script must evaluate to Boolean, found {actual}")]
    NonBooleanRoot { actual: Type },
}

/// A complexity estimate could not be computed.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum EstimationError {
    /// The expression calls a function missing from the cost table.
    #[error("function {function} is not in the cost table")]
    UnknownFunction {
        /// The missing function.
        function: FunctionHeader,
    },
}

/// A typed expression could not be compiled into a script.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum CompileError {
    #[error("script must evaluate to Boolean, found {actual}")]
    NotBoolean { actual: Type },

    #[error("script complexity {score} exceeds the limit of {limit}")]
    TooComplex { score: u64, limit: u64 },

    #[error("script is {actual} bytes, which exceeds the limit of {limit}")]
    TooLarge { actual: usize, limit: usize },

    #[error("script is nested {depth} levels deep, which exceeds the limit of {limit}")]
    TooDeep { depth: usize, limit: usize },

    #[error("could not estimate script complexity")]
    Estimation(#[from] EstimationError),
}

/// Serialized script bytes could not be turned into a script.
#[derive(Error, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum ScriptError {
    #[error("script is empty")]
    Empty,

    #[error("unknown script version {0}")]
    UnknownVersion(u8),

    #[error("script checksum does not match its contents")]
    InvalidChecksum,

    #[error("script expression is malformed")]
    Serialization(#[from] SerializationError),

    #[error("script expression does not type check")]
    Type(#[from] TypeError),

    #[error("script can not be compiled")]
    Compile(#[from] CompileError),
}

//! The Tide account script language.
//!
//! Account scripts are boolean expressions attached to an account. This crate
//! checks and compiles them: it does not evaluate them.
//!
//! - [`type_check`] resolves an [`Expr`] against a [`CompilerContext`],
//! - [`estimate`] scores a [`TypedExpr`] using a [`CostTable`],
//! - [`Script::compile`] produces the checksummed, versioned bytes stored on
//!   chain, and [`Script::from_bytes`] parses them back.

#![warn(missing_docs)]
#![allow(clippy::try_err)]
#![forbid(unsafe_code)]

pub mod context;
mod error;
pub mod estimator;
pub mod expr;
pub mod script;
pub mod serialize;
pub mod type_check;
pub mod types;


pub use context::{CompilerContext, CostTable, FunctionHeader, FunctionSignature};
pub use error::{CompileError, EstimationError, ScriptError, TypeError};
pub use estimator::estimate;
pub use expr::{Expr, FunctionRef, TypedExpr};
pub use script::{Script, ScriptLimits, ScriptV1};
pub use type_check::{type_check, type_check_script};
pub use types::Type;

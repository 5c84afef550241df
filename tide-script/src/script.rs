//! Compiled account scripts.
//!
//! A script is stored on chain as
//!
//! ```text
//! version: u8 || expression || checksum: [u8; 4]
//! ```
//!
//! where the checksum is the first 4 bytes of the BLAKE2b-256 hash of the
//! version and expression bytes.

use std::{fmt, io::Cursor};

use tracing::debug;

use tide_chain::{
    primitives::blake2b_256,
    serialization::{SerializationError, TideDeserialize, TideSerialize},
};

use crate::{
    context::{CompilerContext, SIG_VERIFY_COST},
    error::{CompileError, ScriptError},
    estimator::estimate,
    expr::{Expr, TypedExpr},
    serialize::{expr_depth, MAX_EXPR_DEPTH},
    type_check::type_check_script,
    types::Type,
};

#[cfg(test)]
mod tests;

/// The version byte of [`ScriptV1`] scripts.
pub const V1: u8 = 1;

/// The length of a script checksum.
pub const CHECKSUM_LENGTH: usize = 4;

/// The limits a script must satisfy to be accepted.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ScriptLimits {
    /// The maximum complexity score.
    pub max_complexity: u64,
    /// The maximum length of the serialized script, including its version
    /// and checksum.
    pub max_size: usize,
}

impl ScriptLimits {
    /// The complexity ceiling: 20 signature checks.
    pub const MAX_COMPLEXITY: u64 = 20 * SIG_VERIFY_COST;

    /// The default serialized size ceiling.
    pub const MAX_SIZE: usize = 2 * 1024;
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self {
            max_complexity: Self::MAX_COMPLEXITY,
            max_size: Self::MAX_SIZE,
        }
    }
}

/// An account script.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Script {
    /// A language version 1 script.
    V1(ScriptV1),
}

/// A compiled language version 1 script.
///
/// The serialized bytes are computed once, when the script is compiled.
#[derive(Clone, Eq, PartialEq)]
pub struct ScriptV1 {
    expr: TypedExpr,
    complexity: u64,
    bytes: Vec<u8>,
}

impl ScriptV1 {
    /// The checked expression.
    pub fn expr(&self) -> &TypedExpr {
        &self.expr
    }

    /// The complexity score.
    pub fn complexity(&self) -> u64 {
        self.complexity
    }

    /// The serialized script, including the version and checksum.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The 4-byte checksum at the end of the serialized script.
    pub fn checksum(&self) -> [u8; CHECKSUM_LENGTH] {
        let mut checksum = [0; CHECKSUM_LENGTH];
        checksum.copy_from_slice(&self.bytes[self.bytes.len() - CHECKSUM_LENGTH..]);
        checksum
    }
}

impl fmt::Debug for ScriptV1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptV1")
            .field("expr", &self.expr.to_string())
            .field("complexity", &self.complexity)
            .field("bytes", &hex::encode(&self.bytes))
            .finish()
    }
}

/// Computes the checksum of a version byte followed by an expression.
fn checksum(canonical: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let hash = blake2b_256(canonical);
    let mut checksum = [0; CHECKSUM_LENGTH];
    checksum.copy_from_slice(&hash[..CHECKSUM_LENGTH]);
    checksum
}

impl Script {
    /// Compile `expr` into a version 1 script, using the default limits.
    ///
    /// The serialized size is only limited if `check_size` is true.
    pub fn compile(expr: TypedExpr, check_size: bool) -> Result<Script, CompileError> {
        Script::compile_with_limits(expr, &ScriptLimits::default(), check_size)
    }

    /// Compile `expr` into a version 1 script.
    ///
    /// Complexity is estimated with the version 1 cost table, and checked
    /// before the nesting depth and the size. The depth limit is the one
    /// applied when decoding, so every compiled script parses back.
    pub fn compile_with_limits(
        expr: TypedExpr,
        limits: &ScriptLimits,
        check_size: bool,
    ) -> Result<Script, CompileError> {
        if expr.tpe() != Type::Boolean {
            return Err(CompileError::NotBoolean { actual: expr.tpe() });
        }

        let score = estimate(&CompilerContext::v1().cost_table(), &expr)?;
        if score > limits.max_complexity {
            return Err(CompileError::TooComplex {
                score,
                limit: limits.max_complexity,
            });
        }

        let depth = expr_depth(&expr);
        if depth > MAX_EXPR_DEPTH {
            return Err(CompileError::TooDeep {
                depth,
                limit: MAX_EXPR_DEPTH,
            });
        }

        let mut bytes = vec![V1];
        expr.tide_serialize(&mut bytes)
            .expect("writing to a Vec never fails");
        let checksum = checksum(&bytes);
        bytes.extend_from_slice(&checksum);

        if check_size && bytes.len() > limits.max_size {
            return Err(CompileError::TooLarge {
                actual: bytes.len(),
                limit: limits.max_size,
            });
        }

        metrics::counter!("script.compiled.count").increment(1);
        debug!(complexity = score, size = bytes.len(), "compiled script");

        Ok(Script::V1(ScriptV1 {
            expr,
            complexity: score,
            bytes,
        }))
    }

    /// Parse and check a serialized script.
    ///
    /// The expression is type checked in `ctx`, then recompiled, so the
    /// result satisfies the same rules as a freshly compiled script.
    pub fn from_bytes(
        bytes: &[u8],
        ctx: &CompilerContext,
        limits: &ScriptLimits,
    ) -> Result<Script, ScriptError> {
        let (&version, rest) = bytes.split_first().ok_or(ScriptError::Empty)?;
        if version != V1 {
            return Err(ScriptError::UnknownVersion(version));
        }

        if bytes.len() > limits.max_size {
            return Err(CompileError::TooLarge {
                actual: bytes.len(),
                limit: limits.max_size,
            }
            .into());
        }

        if rest.len() < CHECKSUM_LENGTH {
            return Err(SerializationError::Parse("script shorter than its checksum").into());
        }
        let (canonical, expected) = bytes.split_at(bytes.len() - CHECKSUM_LENGTH);
        if checksum(canonical) != expected {
            return Err(ScriptError::InvalidChecksum);
        }

        let mut reader = Cursor::new(&canonical[1..]);
        let expr = Expr::tide_deserialize(&mut reader)?;
        if reader.position() as usize != canonical.len() - 1 {
            return Err(SerializationError::Parse("trailing bytes after script expression").into());
        }

        let typed = type_check_script(ctx, &expr)?;
        Ok(Script::compile_with_limits(typed, limits, true)?)
    }

    /// The serialized script, including the version and checksum.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Script::V1(script) => script.bytes(),
        }
    }

    /// The script language version.
    pub fn version(&self) -> u8 {
        match self {
            Script::V1(_) => V1,
        }
    }

    /// The complexity score.
    pub fn complexity(&self) -> u64 {
        match self {
            Script::V1(script) => script.complexity(),
        }
    }

    /// The checked expression.
    pub fn expr(&self) -> &TypedExpr {
        match self {
            Script::V1(script) => script.expr(),
        }
    }
}

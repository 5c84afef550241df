//! Consensus serialization of script expressions.
//!
//! Each node starts with a tag byte:
//!
//! | tag | node   | payload                                       |
//! |-----|--------|-----------------------------------------------|
//! | 0   | LONG   | `i64`                                         |
//! | 1   | BYTES  | length-prefixed bytes                         |
//! | 2   | STRING | length-prefixed UTF-8                         |
//! | 3   | IF     | condition, true branch, false branch          |
//! | 4   | LET    | length-prefixed name, value, body             |
//! | 5   | REF    | length-prefixed name                          |
//! | 6   | TRUE   |                                               |
//! | 7   | FALSE  |                                               |
//! | 9   | CALL   | function header, `u32` argument count, args   |
//!
//! Typed expressions are written, and untyped expressions are read back,
//! because types are recomputed by checking the decoded tree.

use std::io;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use tide_chain::serialization::{
    ReadTideExt, SerializationError, TideDeserialize, TideSerialize, WriteTideExt,
};

use crate::{
    context::FunctionHeader,
    expr::{Expr, FunctionRef, TypedExpr},
};


/// The maximum nesting depth of a decoded expression.
///
/// Limits recursion when decoding untrusted bytes.
pub const MAX_EXPR_DEPTH: usize = 256;

/// The maximum number of arguments of a decoded call.
pub const MAX_CALL_ARGS: u32 = 32;

const TAG_LONG: u8 = 0;
const TAG_BYTES: u8 = 1;
const TAG_STRING: u8 = 2;
const TAG_IF: u8 = 3;
const TAG_LET: u8 = 4;
const TAG_REF: u8 = 5;
const TAG_TRUE: u8 = 6;
const TAG_FALSE: u8 = 7;
const TAG_CALL: u8 = 9;

const HEADER_NATIVE: u8 = 0;
const HEADER_USER: u8 = 1;

impl TideSerialize for FunctionHeader {
    fn tide_serialize<W: io::Write>(&self, mut writer: W) -> Result<(), io::Error> {
        match self {
            FunctionHeader::Native(id) => {
                writer.write_u8(HEADER_NATIVE)?;
                writer.write_u16::<BigEndian>(*id)
            }
            FunctionHeader::User(name) => {
                writer.write_u8(HEADER_USER)?;
                writer.write_string(name)
            }
        }
    }
}

impl TideDeserialize for FunctionHeader {
    fn tide_deserialize<R: io::Read>(mut reader: R) -> Result<Self, SerializationError> {
        match reader.read_u8()? {
            HEADER_NATIVE => Ok(FunctionHeader::Native(reader.read_u16::<BigEndian>()?)),
            HEADER_USER => Ok(FunctionHeader::User(reader.read_string()?)),
            _ => Err(SerializationError::Parse("unknown function header kind")),
        }
    }
}

impl TideSerialize for TypedExpr {
    fn tide_serialize<W: io::Write>(&self, mut writer: W) -> Result<(), io::Error> {
        write_expr(self, &mut writer)
    }
}

fn write_expr<W: io::Write>(expr: &TypedExpr, writer: &mut W) -> Result<(), io::Error> {
    match expr {
        TypedExpr::ConstLong(value) => {
            writer.write_u8(TAG_LONG)?;
            writer.write_i64::<BigEndian>(*value)?;
        }
        TypedExpr::ConstBytes(bytes) => {
            writer.write_u8(TAG_BYTES)?;
            writer.write_bytes(bytes)?;
        }
        TypedExpr::ConstString(string) => {
            writer.write_u8(TAG_STRING)?;
            writer.write_string(string)?;
        }
        TypedExpr::If {
            cond,
            if_true,
            if_false,
            ..
        } => {
            writer.write_u8(TAG_IF)?;
            write_expr(cond, writer)?;
            write_expr(if_true, writer)?;
            write_expr(if_false, writer)?;
        }
        TypedExpr::Let {
            name, value, body, ..
        } => {
            writer.write_u8(TAG_LET)?;
            writer.write_string(name)?;
            write_expr(value, writer)?;
            write_expr(body, writer)?;
        }
        TypedExpr::Ref { name, .. } => {
            writer.write_u8(TAG_REF)?;
            writer.write_string(name)?;
        }
        TypedExpr::True => writer.write_u8(TAG_TRUE)?,
        TypedExpr::False => writer.write_u8(TAG_FALSE)?,
        TypedExpr::Call { function, args, .. } => {
            let argc = u32::try_from(args.len()).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, "too many call arguments")
            })?;

            writer.write_u8(TAG_CALL)?;
            function.tide_serialize(&mut *writer)?;
            writer.write_u32::<BigEndian>(argc)?;
            for arg in args {
                write_expr(arg, writer)?;
            }
        }
    }

    Ok(())
}

/// Returns the nesting depth of `expr`, counting the root as 1.
///
/// Decoding rejects expressions deeper than [`MAX_EXPR_DEPTH`].
pub fn expr_depth(expr: &TypedExpr) -> usize {
    let children = match expr {
        TypedExpr::If {
            cond,
            if_true,
            if_false,
            ..
        } => expr_depth(cond)
            .max(expr_depth(if_true))
            .max(expr_depth(if_false)),
        TypedExpr::Let { value, body, .. } => expr_depth(value).max(expr_depth(body)),
        TypedExpr::Call { args, .. } => args.iter().map(expr_depth).max().unwrap_or(0),
        _ => 0,
    };

    children + 1
}

impl TideDeserialize for Expr {
    fn tide_deserialize<R: io::Read>(mut reader: R) -> Result<Self, SerializationError> {
        read_expr(&mut reader, 1)
    }
}

fn read_expr<R: io::Read>(reader: &mut R, depth: usize) -> Result<Expr, SerializationError> {
    if depth > MAX_EXPR_DEPTH {
        return Err(SerializationError::Parse("expression nested too deeply"));
    }

    let expr = match reader.read_u8()? {
        TAG_LONG => Expr::ConstLong(reader.read_i64::<BigEndian>()?),
        TAG_BYTES => Expr::ConstBytes(reader.read_bytes()?),
        TAG_STRING => Expr::ConstString(reader.read_string()?),
        TAG_IF => {
            let cond = read_expr(reader, depth + 1)?;
            let if_true = read_expr(reader, depth + 1)?;
            let if_false = read_expr(reader, depth + 1)?;
            Expr::if_then_else(cond, if_true, if_false)
        }
        TAG_LET => {
            let name = reader.read_string()?;
            let value = read_expr(reader, depth + 1)?;
            let body = read_expr(reader, depth + 1)?;
            Expr::Let {
                name,
                value: Box::new(value),
                body: Box::new(body),
            }
        }
        TAG_REF => Expr::Ref(reader.read_string()?),
        TAG_TRUE => Expr::True,
        TAG_FALSE => Expr::False,
        TAG_CALL => {
            let header = FunctionHeader::tide_deserialize(&mut *reader)?;

            let argc = reader.read_u32::<BigEndian>()?;
            if argc > MAX_CALL_ARGS {
                return Err(SerializationError::Parse("too many call arguments"));
            }

            let args = (0..argc)
                .map(|_| read_expr(reader, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;

            Expr::Call {
                function: FunctionRef::Header(header),
                args,
            }
        }
        _ => return Err(SerializationError::Parse("unknown expression tag")),
    };

    Ok(expr)
}

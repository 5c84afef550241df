//! Untyped and typed expression trees.

use std::fmt;

use crate::{context::FunctionHeader, types::Type};

/// A reference to a function, before type checking.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FunctionRef {
    /// A function called by name, resolved against argument types.
    Named(String),
    /// A function identified by its serialized header.
    ///
    /// Decoded scripts always use headers.
    Header(FunctionHeader),
}

impl From<&str> for FunctionRef {
    fn from(name: &str) -> Self {
        FunctionRef::Named(name.to_owned())
    }
}

impl From<FunctionHeader> for FunctionRef {
    fn from(header: FunctionHeader) -> Self {
        FunctionRef::Header(header)
    }
}

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FunctionRef::Named(name) => f.write_str(name),
            FunctionRef::Header(header) => header.fmt(f),
        }
    }
}

/// An untyped script expression.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expr {
    /// A `Long` literal.
    ConstLong(i64),
    /// A `ByteVector` literal.
    ConstBytes(Vec<u8>),
    /// A `String` literal.
    ConstString(String),
    /// `true`.
    True,
    /// `false`.
    False,
    /// A reference to a `let` binding or a context variable.
    Ref(String),
    /// Binds `name` to `value` while evaluating `body`.
    Let {
        /// The binding name.
        name: String,
        /// The bound value.
        value: Box<Expr>,
        /// The expression the binding is visible in.
        body: Box<Expr>,
    },
    /// A conditional.
    If {
        /// The condition, which must be `Boolean`.
        cond: Box<Expr>,
        /// Evaluated when `cond` is true.
        if_true: Box<Expr>,
        /// Evaluated when `cond` is false.
        if_false: Box<Expr>,
    },
    /// A function call.
    Call {
        /// The called function.
        function: FunctionRef,
        /// The call arguments.
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Returns a reference to `name`.
    pub fn var(name: &str) -> Expr {
        Expr::Ref(name.to_owned())
    }

    /// Returns `let name = value; body`.
    pub fn let_in(name: &str, value: Expr, body: Expr) -> Expr {
        Expr::Let {
            name: name.to_owned(),
            value: Box::new(value),
            body: Box::new(body),
        }
    }

    /// Returns `if cond then if_true else if_false`.
    pub fn if_then_else(cond: Expr, if_true: Expr, if_false: Expr) -> Expr {
        Expr::If {
            cond: Box::new(cond),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        }
    }

    /// Returns a call of `function` with `args`.
    pub fn call(function: impl Into<FunctionRef>, args: Vec<Expr>) -> Expr {
        Expr::Call {
            function: function.into(),
            args,
        }
    }

    /// `a && b`, which the language defines as `if a then b else false`.
    pub fn and(a: Expr, b: Expr) -> Expr {
        Expr::if_then_else(a, b, Expr::False)
    }

    /// `a || b`, which the language defines as `if a then true else b`.
    pub fn or(a: Expr, b: Expr) -> Expr {
        Expr::if_then_else(a, Expr::True, b)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        if value {
            Expr::True
        } else {
            Expr::False
        }
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::ConstLong(value)
    }
}

/// Writes `(name arg arg ...)`.
fn fmt_call<T: fmt::Display>(
    f: &mut fmt::Formatter,
    function: &dyn fmt::Display,
    args: &[T],
) -> fmt::Result {
    write!(f, "({function}")?;
    for arg in args {
        write!(f, " {arg}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::ConstLong(value) => write!(f, "{value}"),
            Expr::ConstBytes(bytes) => write!(f, "base16'{}'", hex::encode(bytes)),
            Expr::ConstString(string) => write!(f, "{string:?}"),
            Expr::True => f.write_str("true"),
            Expr::False => f.write_str("false"),
            Expr::Ref(name) => f.write_str(name),
            Expr::Let { name, value, body } => write!(f, "(let {name} {value} {body})"),
            Expr::If {
                cond,
                if_true,
                if_false,
            } => write!(f, "(if {cond} {if_true} {if_false})"),
            Expr::Call { function, args } => fmt_call(f, function, args),
        }
    }
}

/// A type-checked script expression.
///
/// Every node carries its result type, and every call is resolved to a
/// single function header.
#[derive(Clone, Debug, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum TypedExpr {
    ConstLong(i64),
    ConstBytes(Vec<u8>),
    ConstString(String),
    True,
    False,
    Ref {
        name: String,
        tpe: Type,
    },
    Let {
        name: String,
        value: Box<TypedExpr>,
        body: Box<TypedExpr>,
        tpe: Type,
    },
    If {
        cond: Box<TypedExpr>,
        if_true: Box<TypedExpr>,
        if_false: Box<TypedExpr>,
        tpe: Type,
    },
    Call {
        function: FunctionHeader,
        args: Vec<TypedExpr>,
        tpe: Type,
    },
}

impl TypedExpr {
    /// Returns the result type of this expression.
    pub fn tpe(&self) -> Type {
        match self {
            TypedExpr::ConstLong(_) => Type::Long,
            TypedExpr::ConstBytes(_) => Type::ByteVector,
            TypedExpr::ConstString(_) => Type::String,
            TypedExpr::True | TypedExpr::False => Type::Boolean,
            TypedExpr::Ref { tpe, .. }
            | TypedExpr::Let { tpe, .. }
            | TypedExpr::If { tpe, .. }
            | TypedExpr::Call { tpe, .. } => *tpe,
        }
    }
}

impl fmt::Display for TypedExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypedExpr::ConstLong(value) => write!(f, "{value}"),
            TypedExpr::ConstBytes(bytes) => write!(f, "base16'{}'", hex::encode(bytes)),
            TypedExpr::ConstString(string) => write!(f, "{string:?}"),
            TypedExpr::True => f.write_str("true"),
            TypedExpr::False => f.write_str("false"),
            TypedExpr::Ref { name, .. } => f.write_str(name),
            TypedExpr::Let {
                name, value, body, ..
            } => write!(f, "(let {name} {value} {body})"),
            TypedExpr::If {
                cond,
                if_true,
                if_false,
                ..
            } => write!(f, "(if {cond} {if_true} {if_false})"),
            TypedExpr::Call { function, args, .. } => fmt_call(f, function, args),
        }
    }
}

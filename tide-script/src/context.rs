//! Compiler contexts: the functions and values a script can refer to, and
//! the cost of calling each function.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use once_cell::sync::Lazy;

use crate::types::{join_types, Type};

/// Native function ids.
///
/// These ids are written into serialized scripts, so they are
/// consensus-critical and must never be renumbered.
pub mod native {
    #![allow(missing_docs)]

    pub const EQ_LONG: u16 = 0;
    pub const EQ_BYTES: u16 = 1;
    pub const EQ_STRING: u16 = 2;
    pub const EQ_BOOLEAN: u16 = 3;

    pub const SUM_LONG: u16 = 100;
    pub const SUB_LONG: u16 = 101;
    pub const GT_LONG: u16 = 102;
    pub const GE_LONG: u16 = 103;
    pub const MUL_LONG: u16 = 104;
    pub const DIV_LONG: u16 = 105;
    pub const MOD_LONG: u16 = 106;
    pub const NEGATE_LONG: u16 = 107;
    pub const NOT: u16 = 108;

    pub const SIZE_BYTES: u16 = 200;
    pub const TAKE_BYTES: u16 = 201;
    pub const DROP_BYTES: u16 = 202;
    pub const CONCAT_BYTES: u16 = 203;

    pub const CONCAT_STRING: u16 = 300;
    pub const SIZE_STRING: u16 = 303;

    pub const SIG_VERIFY: u16 = 500;
    pub const KECCAK256: u16 = 501;
    pub const BLAKE256: u16 = 502;
    pub const SHA256: u16 = 503;

    pub const TO_BASE58: u16 = 600;
    pub const FROM_BASE58: u16 = 601;
}

/// The cost of a `sigVerify` call.
///
/// The script complexity ceiling is derived from this cost.
pub const SIG_VERIFY_COST: u64 = 100;

/// Identifies a function in a serialized script.
///
/// Native functions are identified by a numeric id, user functions by name.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FunctionHeader {
    /// A function built into the language.
    Native(u16),
    /// A function provided by the environment.
    User(String),
}

impl fmt::Display for FunctionHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FunctionHeader::Native(id) => write!(f, "native#{id}"),
            FunctionHeader::User(name) => f.write_str(name),
        }
    }
}

/// A function a script can call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionSignature {
    /// The serialized identity of this function.
    pub header: FunctionHeader,
    /// The name used to call this function.
    ///
    /// Several functions can share a name, if their argument types differ.
    pub name: String,
    /// The argument types, in order.
    pub args: Vec<Type>,
    /// The result type.
    pub result: Type,
    /// The complexity cost of one call, not counting the arguments.
    pub cost: u64,
}

impl FunctionSignature {
    fn native(id: u16, name: &str, args: &[Type], result: Type, cost: u64) -> Self {
        Self {
            header: FunctionHeader::Native(id),
            name: name.to_owned(),
            args: args.to_vec(),
            result,
            cost,
        }
    }

    fn user(name: &str, args: &[Type], result: Type, cost: u64) -> Self {
        Self {
            header: FunctionHeader::User(name.to_owned()),
            name: name.to_owned(),
            args: args.to_vec(),
            result,
            cost,
        }
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}({}): {}",
            self.name,
            join_types(&self.args),
            self.result
        )
    }
}

/// The fixed cost of every function in a context.
///
/// Every node must use identical cost tables, because the complexity of a
/// script decides whether it is accepted.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CostTable(HashMap<FunctionHeader, u64>);

impl CostTable {
    /// Returns the cost of calling `function`, if it is in the table.
    pub fn cost(&self, function: &FunctionHeader) -> Option<u64> {
        self.0.get(function).copied()
    }

    /// Returns the number of functions in the table.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(FunctionHeader, u64)> for CostTable {
    fn from_iter<I: IntoIterator<Item = (FunctionHeader, u64)>>(iter: I) -> Self {
        CostTable(iter.into_iter().collect())
    }
}

/// The functions and values available to a script.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CompilerContext {
    functions: Vec<FunctionSignature>,
    variables: BTreeMap<String, Type>,
}

/// The built-in functions of language version 1.
static PURE_CONTEXT: Lazy<CompilerContext> = Lazy::new(|| {
    use native::*;
    use Type::*;

    let functions = vec![
        FunctionSignature::native(EQ_LONG, "==", &[Long, Long], Boolean, 1),
        FunctionSignature::native(EQ_BYTES, "==", &[ByteVector, ByteVector], Boolean, 1),
        FunctionSignature::native(EQ_STRING, "==", &[String, String], Boolean, 1),
        FunctionSignature::native(EQ_BOOLEAN, "==", &[Boolean, Boolean], Boolean, 1),
        FunctionSignature::native(SUM_LONG, "+", &[Long, Long], Long, 1),
        FunctionSignature::native(SUB_LONG, "-", &[Long, Long], Long, 1),
        FunctionSignature::native(GT_LONG, ">", &[Long, Long], Boolean, 1),
        FunctionSignature::native(GE_LONG, ">=", &[Long, Long], Boolean, 1),
        FunctionSignature::native(MUL_LONG, "*", &[Long, Long], Long, 1),
        FunctionSignature::native(DIV_LONG, "/", &[Long, Long], Long, 1),
        FunctionSignature::native(MOD_LONG, "%", &[Long, Long], Long, 1),
        FunctionSignature::native(NEGATE_LONG, "-", &[Long], Long, 1),
        FunctionSignature::native(NOT, "!", &[Boolean], Boolean, 1),
        FunctionSignature::native(SIZE_BYTES, "size", &[ByteVector], Long, 1),
        FunctionSignature::native(TAKE_BYTES, "take", &[ByteVector, Long], ByteVector, 1),
        FunctionSignature::native(DROP_BYTES, "drop", &[ByteVector, Long], ByteVector, 1),
        FunctionSignature::native(CONCAT_BYTES, "+", &[ByteVector, ByteVector], ByteVector, 10),
        FunctionSignature::native(CONCAT_STRING, "+", &[String, String], String, 10),
        FunctionSignature::native(SIZE_STRING, "size", &[String], Long, 1),
        FunctionSignature::native(
            SIG_VERIFY,
            "sigVerify",
            &[ByteVector, ByteVector, ByteVector],
            Boolean,
            SIG_VERIFY_COST,
        ),
        FunctionSignature::native(KECCAK256, "keccak256", &[ByteVector], ByteVector, 10),
        FunctionSignature::native(BLAKE256, "blake2b256", &[ByteVector], ByteVector, 10),
        FunctionSignature::native(SHA256, "sha256", &[ByteVector], ByteVector, 10),
        FunctionSignature::native(TO_BASE58, "toBase58String", &[ByteVector], String, 10),
        FunctionSignature::native(FROM_BASE58, "fromBase58String", &[String], ByteVector, 10),
    ];

    CompilerContext {
        functions,
        variables: BTreeMap::new(),
    }
});

/// The chain-bound values and functions of language version 1.
static ENVIRONMENT_CONTEXT: Lazy<CompilerContext> = Lazy::new(|| {
    use Type::*;

    let functions = vec![
        FunctionSignature::user("proof", &[Long], ByteVector, 2),
        FunctionSignature::user("addressFromPublicKey", &[ByteVector], ByteVector, 82),
    ];

    let variables = [
        ("height", Long),
        ("txId", ByteVector),
        ("txBodyBytes", ByteVector),
        ("txSenderPk", ByteVector),
        ("txFee", Long),
        ("txTimestamp", Long),
    ]
    .into_iter()
    .map(|(name, tpe)| (name.to_owned(), tpe))
    .collect();

    CompilerContext {
        functions,
        variables,
    }
});

/// The full language version 1 context: built-ins and the environment.
static V1_CONTEXT: Lazy<CompilerContext> = Lazy::new(|| {
    CompilerContext::pure().combine(CompilerContext::environment())
});

impl CompilerContext {
    /// Returns a context containing only the given functions and variables.
    pub fn new(
        functions: Vec<FunctionSignature>,
        variables: impl IntoIterator<Item = (String, Type)>,
    ) -> Self {
        Self {
            functions,
            variables: variables.into_iter().collect(),
        }
    }

    /// The built-in functions of the language, with no chain-bound values.
    pub fn pure() -> CompilerContext {
        PURE_CONTEXT.clone()
    }

    /// The chain-bound values and functions available to account scripts.
    pub fn environment() -> CompilerContext {
        ENVIRONMENT_CONTEXT.clone()
    }

    /// The context account scripts are compiled and parsed with.
    pub fn v1() -> &'static CompilerContext {
        &V1_CONTEXT
    }

    /// Merge two contexts.
    ///
    /// Functions with the same header, and variables with the same name, are
    /// replaced by the definitions in `other`.
    pub fn combine(mut self, other: CompilerContext) -> CompilerContext {
        for function in other.functions {
            self.functions.retain(|f| f.header != function.header);
            self.functions.push(function);
        }
        self.variables.extend(other.variables);
        self
    }

    /// Returns every function called `name`.
    pub fn functions_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a FunctionSignature> + 'a {
        self.functions.iter().filter(move |f| f.name == name)
    }

    /// Returns the function identified by `header`.
    pub fn function(&self, header: &FunctionHeader) -> Option<&FunctionSignature> {
        self.functions.iter().find(|f| &f.header == header)
    }

    /// Returns the type of the variable `name`.
    pub fn variable(&self, name: &str) -> Option<Type> {
        self.variables.get(name).copied()
    }

    /// Returns every function in this context.
    pub fn functions(&self) -> &[FunctionSignature] {
        &self.functions
    }

    /// Builds the cost table for the functions in this context.
    pub fn cost_table(&self) -> CostTable {
        self.functions
            .iter()
            .map(|f| (f.header.clone(), f.cost))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn native_headers_are_unique() {
        let _init_guard = tide_test::init();

        let ctx = CompilerContext::v1();
        let headers: HashSet<&FunctionHeader> = ctx.functions().iter().map(|f| &f.header).collect();
        assert_eq!(headers.len(), ctx.functions().len());
    }

    #[test]
    fn overloads_have_distinct_argument_types() {
        let _init_guard = tide_test::init();

        let ctx = CompilerContext::v1();
        let signatures: HashSet<(&str, &[Type])> = ctx
            .functions()
            .iter()
            .map(|f| (f.name.as_str(), f.args.as_slice()))
            .collect();
        assert_eq!(signatures.len(), ctx.functions().len());
    }

    #[test]
    fn cost_table_matches_context() {
        let _init_guard = tide_test::init();

        let table = CompilerContext::v1().cost_table();
        assert_eq!(table.len(), CompilerContext::v1().functions().len());
        assert_eq!(
            table.cost(&FunctionHeader::Native(native::SIG_VERIFY)),
            Some(SIG_VERIFY_COST)
        );
        assert_eq!(
            table.cost(&FunctionHeader::User("addressFromPublicKey".to_owned())),
            Some(82)
        );
        assert_eq!(table.cost(&FunctionHeader::Native(9999)), None);
    }

    #[test]
    fn combine_replaces_duplicate_headers() {
        let _init_guard = tide_test::init();

        let expensive_not = CompilerContext::new(
            vec![FunctionSignature::native(
                native::NOT,
                "!",
                &[Type::Boolean],
                Type::Boolean,
                50,
            )],
            [("flag".to_owned(), Type::Boolean)],
        );

        let ctx = CompilerContext::pure().combine(expensive_not);
        assert_eq!(ctx.functions().len(), CompilerContext::pure().functions().len());
        assert_eq!(
            ctx.cost_table().cost(&FunctionHeader::Native(native::NOT)),
            Some(50)
        );
        assert_eq!(ctx.variable("flag"), Some(Type::Boolean));
        assert_eq!(CompilerContext::pure().variable("height"), None);
        assert_eq!(CompilerContext::v1().variable("height"), Some(Type::Long));
    }
}

//! Type checking of script expressions.
//!
//! The checker resolves every reference and call against a
//! [`CompilerContext`], and produces a [`TypedExpr`] where each node carries
//! its result type. Function resolution is exact: there is no coercion, so an
//! overloaded name resolves to the single signature whose argument types are
//! identical to the call's argument types.

use tracing::trace;

use crate::{
    context::{CompilerContext, FunctionSignature},
    error::TypeError,
    expr::{Expr, FunctionRef, TypedExpr},
    types::Type,
};


/// Type check `expr` in `ctx`.
pub fn type_check(ctx: &CompilerContext, expr: &Expr) -> Result<TypedExpr, TypeError> {
    TypeChecker::new(ctx).check(expr)
}

/// Type check `expr` as a complete account script.
///
/// Scripts must evaluate to a `Boolean`.
pub fn type_check_script(ctx: &CompilerContext, expr: &Expr) -> Result<TypedExpr, TypeError> {
    let typed = type_check(ctx, expr)?;

    match typed.tpe() {
        Type::Boolean => Ok(typed),
        actual => Err(TypeError::NonBooleanRoot { actual }),
    }
}

/// The state of a single type checking pass.
struct TypeChecker<'a> {
    ctx: &'a CompilerContext,
    /// The `let` bindings enclosing the current node, innermost last.
    scope: Vec<(String, Type)>,
}

impl<'a> TypeChecker<'a> {
    fn new(ctx: &'a CompilerContext) -> Self {
        Self {
            ctx,
            scope: Vec::new(),
        }
    }

    fn lookup(&self, name: &str) -> Option<Type> {
        self.scope
            .iter()
            .rev()
            .find(|(bound, _)| bound == name)
            .map(|(_, tpe)| *tpe)
            .or_else(|| self.ctx.variable(name))
    }

    fn check(&mut self, expr: &Expr) -> Result<TypedExpr, TypeError> {
        let typed = match expr {
            Expr::ConstLong(value) => TypedExpr::ConstLong(*value),
            Expr::ConstBytes(bytes) => TypedExpr::ConstBytes(bytes.clone()),
            Expr::ConstString(string) => TypedExpr::ConstString(string.clone()),
            Expr::True => TypedExpr::True,
            Expr::False => TypedExpr::False,

            Expr::Ref(name) => {
                let tpe = self
                    .lookup(name)
                    .ok_or_else(|| TypeError::UndefinedSymbol { name: name.clone() })?;
                TypedExpr::Ref {
                    name: name.clone(),
                    tpe,
                }
            }

            Expr::Let { name, value, body } => {
                if self.lookup(name).is_some() {
                    return Err(TypeError::AlreadyDefined { name: name.clone() });
                }

                let value = self.check(value)?;

                self.scope.push((name.clone(), value.tpe()));
                let body = self.check(body);
                self.scope.pop();
                let body = body?;

                TypedExpr::Let {
                    name: name.clone(),
                    tpe: body.tpe(),
                    value: Box::new(value),
                    body: Box::new(body),
                }
            }

            Expr::If {
                cond,
                if_true,
                if_false,
            } => {
                let cond = self.check(cond)?;
                if cond.tpe() != Type::Boolean {
                    return Err(TypeError::IfConditionNotBoolean {
                        actual: cond.tpe(),
                        expr: expr.to_string(),
                    });
                }

                let if_true = self.check(if_true)?;
                let if_false = self.check(if_false)?;
                if if_true.tpe() != if_false.tpe() {
                    return Err(TypeError::IfBranchMismatch {
                        if_true: if_true.tpe(),
                        if_false: if_false.tpe(),
                        expr: expr.to_string(),
                    });
                }

                TypedExpr::If {
                    tpe: if_true.tpe(),
                    cond: Box::new(cond),
                    if_true: Box::new(if_true),
                    if_false: Box::new(if_false),
                }
            }

            Expr::Call { function, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.check(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                let actual: Vec<Type> = args.iter().map(TypedExpr::tpe).collect();

                let signature = self.resolve(function, &actual, expr)?;
                trace!(%function, resolved = %signature.header, "resolved call");

                TypedExpr::Call {
                    function: signature.header.clone(),
                    args,
                    tpe: signature.result,
                }
            }
        };

        Ok(typed)
    }

    /// Finds the signature `function` refers to, given the argument types.
    fn resolve(
        &self,
        function: &FunctionRef,
        actual: &[Type],
        expr: &Expr,
    ) -> Result<&'a FunctionSignature, TypeError> {
        let ctx = self.ctx;
        let mismatch = |name: &str| TypeError::SignatureMismatch {
            name: name.to_owned(),
            actual: actual.to_vec(),
            expr: expr.to_string(),
        };

        match function {
            FunctionRef::Named(name) => {
                let candidates: Vec<&'a FunctionSignature> = ctx
                    .functions()
                    .iter()
                    .filter(|signature| &signature.name == name)
                    .collect();
                if candidates.is_empty() {
                    return Err(TypeError::UndefinedFunction { name: name.clone() });
                }

                candidates
                    .into_iter()
                    .find(|signature| signature.args == actual)
                    .ok_or_else(|| mismatch(name))
            }
            FunctionRef::Header(header) => {
                let signature = ctx
                    .function(header)
                    .ok_or_else(|| TypeError::UndefinedFunction {
                        name: header.to_string(),
                    })?;

                if signature.args == actual {
                    Ok(signature)
                } else {
                    Err(mismatch(&signature.name))
                }
            }
        }
    }
}

//! Script complexity estimation.
//!
//! The complexity score is a static upper bound on the cost of evaluating a
//! script. It is consensus-visible: nodes reject scripts whose score is over
//! the limit, so the score must be identical on every node.

use crate::{context::CostTable, error::EstimationError, expr::TypedExpr};


/// Estimate the complexity of `expr` using the function costs in `table`.
///
/// - literals and references cost nothing,
/// - a call costs its tabulated cost plus the cost of its arguments,
/// - a `let` costs its value plus its body, because bindings are evaluated
///   once, when they are declared,
/// - an `if` costs its condition plus its most expensive branch, because only
///   the taken branch is evaluated.
///
/// Arithmetic saturates at `u64::MAX`.
pub fn estimate(table: &CostTable, expr: &TypedExpr) -> Result<u64, EstimationError> {
    let cost = match expr {
        TypedExpr::ConstLong(_)
        | TypedExpr::ConstBytes(_)
        | TypedExpr::ConstString(_)
        | TypedExpr::True
        | TypedExpr::False
        | TypedExpr::Ref { .. } => 0,

        TypedExpr::Let { value, body, .. } => {
            estimate(table, value)?.saturating_add(estimate(table, body)?)
        }

        TypedExpr::If {
            cond,
            if_true,
            if_false,
            ..
        } => {
            let branches = estimate(table, if_true)?.max(estimate(table, if_false)?);
            estimate(table, cond)?.saturating_add(branches)
        }

        TypedExpr::Call { function, args, .. } => {
            let own = table
                .cost(function)
                .ok_or_else(|| EstimationError::UnknownFunction {
                    function: function.clone(),
                })?;

            args.iter().try_fold(own, |total, arg| {
                Ok::<_, EstimationError>(total.saturating_add(estimate(table, arg)?))
            })?
        }
    };

    Ok(cost)
}

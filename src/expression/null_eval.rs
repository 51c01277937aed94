//! Partial evaluation with columns forced to NULL.

use crate::expression::schema::Schema;
use crate::expression::{new_function, Constant, Expression, ExpressionResult};
use crate::types::copy_field_type;
use log::trace;

/// Rewrite `expr` as if every column of `schema` were NULL.
///
/// Columns of `schema` become untyped NULL constants; columns outside it
/// are kept symbolic. Functions are rebuilt over the rewritten arguments.
/// The result never shares nodes with `expr`. The optimizer uses this to
/// decide whether a predicate rejects NULL-extended rows, e.g. when
/// turning an outer join into an inner join.
pub fn evaluate_expr_with_null(schema: &Schema, expr: &Expression) -> ExpressionResult<Expression> {
    match expr {
        Expression::ScalarFunction(f) => {
            let args = f
                .args
                .iter()
                .map(|arg| evaluate_expr_with_null(schema, arg))
                .collect::<ExpressionResult<Vec<_>>>()?;
            new_function(&f.func_name.l, copy_field_type(&f.ret_type), args)
        }
        Expression::Column(c) => {
            if schema.get_index(c).is_none() {
                return Ok(expr.clone());
            }
            trace!("column {} replaced by NULL", c);
            Ok(Expression::Constant(Constant::null()))
        }
        Expression::Constant(_) => Ok(expr.clone()),
    }
}

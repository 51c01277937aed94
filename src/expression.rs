//! Scalar expressions shared by planning and execution.
//!
//! This module provides:
//! - The closed `Expression` sum type (constants, columns, function calls)
//! - Row evaluation, structural equality and canonical hash codes
//! - Decorrelation and index resolution against a `Schema`
//! - Balanced composition and flattening of AND/OR condition lists
//! - Null-propagation rewriting used for null-rejection checks

pub mod builtin;
pub mod column;
pub mod constant;
pub mod error;
pub mod normal_form;
pub mod null_eval;
pub mod scalar_function;
pub mod schema;

pub use builtin::Builtin;
pub use column::Column;
pub use constant::Constant;
pub use error::{ExpressionError, ExpressionResult};
pub use normal_form::{
    compose_cnf_condition, compose_dnf_condition, split_cnf_items, split_dnf_items,
};
pub use null_eval::evaluate_expr_with_null;
pub use scalar_function::{new_function, ScalarFunction};
pub use schema::{result_fields_to_schema, Schema};

use crate::context::Context;
use crate::types::{Datum, FieldTypeRef};
use serde::{Serialize, Serializer};
use std::fmt;

/// A value-producing expression tree.
///
/// Trees are owned: `resolve_indices` needs `&mut self`, so a tree that is
/// shared (`Arc<Expression>`) with running evaluations has to be cloned
/// before it can be bound to a schema.
#[derive(Debug, Clone)]
pub enum Expression {
    Constant(Constant),
    Column(Column),
    ScalarFunction(ScalarFunction),
}

impl Expression {
    /// Evaluate against one row. A NULL result is a value, not an error.
    pub fn eval(&self, row: &[Datum], ctx: &dyn Context) -> ExpressionResult<Datum> {
        match self {
            Expression::Constant(c) => Ok(c.value.clone()),
            Expression::Column(c) => c.eval(row, ctx),
            Expression::ScalarFunction(f) => f.eval(row, ctx),
        }
    }

    pub fn get_type(&self) -> FieldTypeRef {
        match self {
            Expression::Constant(c) => c.ret_type.clone(),
            Expression::Column(c) => c.ret_type.clone(),
            Expression::ScalarFunction(f) => f.ret_type.clone(),
        }
    }

    /// Canonical key; `a.equal(b)` implies equal hash codes
    pub fn hash_code(&self) -> Vec<u8> {
        match self {
            Expression::Constant(c) => c.hash_code(),
            Expression::Column(c) => c.hash_code(),
            Expression::ScalarFunction(f) => f.hash_code(),
        }
    }

    /// Structural equality; different variants are never equal
    pub fn equal(&self, other: &Expression) -> bool {
        match (self, other) {
            (Expression::Constant(a), Expression::Constant(b)) => a.equal(b),
            (Expression::Column(a), Expression::Column(b)) => a.equal(b),
            (Expression::ScalarFunction(a), Expression::ScalarFunction(b)) => a.equal(b),
            _ => false,
        }
    }

    pub fn is_correlated(&self) -> bool {
        match self {
            Expression::Constant(_) => false,
            Expression::Column(c) => c.correlated,
            Expression::ScalarFunction(f) => f.is_correlated(),
        }
    }

    /// Rewrite outer references that `schema` can serve locally
    pub fn decorrelate(self, schema: &Schema) -> Expression {
        match self {
            Expression::Constant(c) => Expression::Constant(c),
            Expression::Column(c) => Expression::Column(c.decorrelate(schema)),
            Expression::ScalarFunction(f) => Expression::ScalarFunction(f.decorrelate(schema)),
        }
    }

    /// Bind every column reference to its slot in `schema`
    pub fn resolve_indices(&mut self, schema: &Schema) {
        match self {
            Expression::Constant(_) => {}
            Expression::Column(c) => c.resolve_indices(schema),
            Expression::ScalarFunction(f) => f.resolve_indices(schema),
        }
    }
}

impl From<Constant> for Expression {
    fn from(c: Constant) -> Self {
        Expression::Constant(c)
    }
}

impl From<Column> for Expression {
    fn from(c: Column) -> Self {
        Expression::Column(c)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(c) => write!(f, "{}", c),
            Expression::Column(c) => write!(f, "{}", c),
            Expression::ScalarFunction(func) => write!(f, "{}", func),
        }
    }
}

/// Expressions serialize as their display string
impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Evaluate `expr` as a filter predicate.
///
/// NULL collapses to `false`: an unknown predicate does not match. Callers
/// that must tell false from unknown have to evaluate the value themselves.
pub fn eval_bool(expr: &Expression, row: &[Datum], ctx: &dyn Context) -> ExpressionResult<bool> {
    let data = expr.eval(row, ctx)?;
    if data.is_null() {
        return Ok(false);
    }
    Ok(data.to_bool()? != 0)
}

/// One `SET col = expr` clause of an UPDATE
#[derive(Debug, Clone)]
pub struct Assignment {
    pub col: Column,
    pub expr: Expression,
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.col, self.expr)
    }
}

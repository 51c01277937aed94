//! Conjunctive and disjunctive normal form helpers.
//!
//! `compose_*` turns a flat list of conditions into a balanced tree of
//! binary AND/OR applications; `split_*` flattens maximal runs of one
//! operator back into a list.

use crate::ast::opcode;
use crate::expression::{new_function, Expression, ExpressionResult};
use crate::types::{new_field_type, TypeCode};
use log::debug;

/// Compose `conditions` into a tree of depth ceil(log2 n).
///
/// A linear fold would yield a depth-n tree, which is costly to encode and
/// walk; splitting at the midpoint keeps the tree balanced.
fn compose_condition_with_binary_op(
    mut conditions: Vec<Expression>,
    func_name: &str,
) -> ExpressionResult<Option<Expression>> {
    match conditions.len() {
        0 => Ok(None),
        1 => Ok(conditions.pop()),
        len => {
            let right = conditions.split_off(len / 2);
            let left = compose_condition_with_binary_op(conditions, func_name)?;
            let right = compose_condition_with_binary_op(right, func_name)?;
            let args = left.into_iter().chain(right).collect();
            new_function(func_name, new_field_type(TypeCode::Tiny), args).map(Some)
        }
    }
}

/// Compose CNF items ("a and b and c") into a balanced AND tree
pub fn compose_cnf_condition(conditions: Vec<Expression>) -> ExpressionResult<Option<Expression>> {
    debug!("composing {} conditions with and", conditions.len());
    compose_condition_with_binary_op(conditions, opcode::AND_AND)
}

/// Compose DNF items ("a or b or c") into a balanced OR tree
pub fn compose_dnf_condition(conditions: Vec<Expression>) -> ExpressionResult<Option<Expression>> {
    debug!("composing {} conditions with or", conditions.len());
    compose_condition_with_binary_op(conditions, opcode::OR_OR)
}

/// Flatten nested applications of `func_name`, keeping operand order.
/// Anything else, including other operators, is one item.
fn split_normal_form_items(expr: Expression, func_name: &str) -> Vec<Expression> {
    let mut items = Vec::new();
    let mut stack = vec![expr];
    while let Some(expr) = stack.pop() {
        match expr {
            Expression::ScalarFunction(f) if f.func_name.l == func_name => {
                stack.extend(f.args.into_iter().rev());
            }
            other => items.push(other),
        }
    }
    items
}

/// Split CNF items, e.g. "a and b and c" into [a, b, c]
pub fn split_cnf_items(cond: impl Into<Option<Expression>>) -> Vec<Expression> {
    match cond.into() {
        Some(expr) => split_normal_form_items(expr, opcode::AND_AND),
        None => Vec::new(),
    }
}

/// Split DNF items, e.g. "a or b or c" into [a, b, c]
pub fn split_dnf_items(cond: impl Into<Option<Expression>>) -> Vec<Expression> {
    match cond.into() {
        Some(expr) => split_normal_form_items(expr, opcode::OR_OR),
        None => Vec::new(),
    }
}

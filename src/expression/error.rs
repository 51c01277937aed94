//! Error types for expression construction and evaluation.

use thiserror::Error;

/// Errors that can occur while building or evaluating expressions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// Value cannot be coerced to a boolean
    #[error("Cannot convert {value:?} to boolean")]
    InvalidBoolean { value: String },

    /// Invalid operand types for operator
    #[error("Invalid operand types for function {function}: {left} and {right}")]
    InvalidOperandTypes {
        function: String,
        left: &'static str,
        right: &'static str,
    },

    /// Two values have no common ordering
    #[error("Cannot compare {left} with {right}")]
    IncomparableValues { left: String, right: String },

    #[error("Division by zero")]
    DivisionByZero,

    /// Integer result does not fit in 64 bits
    #[error("Integer overflow in function {function}")]
    ArithmeticOverflow { function: String },

    /// Column index out of bounds
    #[error("Column index {index} out of bounds for row with {row_size} columns")]
    ColumnIndexOutOfBounds { index: usize, row_size: usize },

    /// Column evaluated before its index was resolved
    #[error("Column {column} is not resolved against any schema")]
    UnresolvedColumn { column: String },

    /// Invalid function name
    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    /// Wrong number of function arguments
    #[error("Function {function} expects {expected} arguments, got {actual}")]
    FunctionArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Name lookup matched more than one schema column
    #[error("Column {column} is ambiguous")]
    AmbiguousColumn { column: String },
}

/// Result type for expression operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;

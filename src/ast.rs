//! Parser-facing descriptors and canonical operator names.

use crate::model::{CIStr, ColumnInfo, TableInfo};

/// Canonical lower-case function names for SQL operators.
pub mod opcode {
    pub const AND_AND: &str = "and";
    pub const OR_OR: &str = "or";
    pub const LOGIC_XOR: &str = "xor";
    pub const UNARY_NOT: &str = "not";
    pub const EQ: &str = "eq";
    pub const NE: &str = "ne";
    pub const LT: &str = "lt";
    pub const LE: &str = "le";
    pub const GT: &str = "gt";
    pub const GE: &str = "ge";
    pub const NULL_EQ: &str = "nulleq";
    pub const PLUS: &str = "plus";
    pub const MINUS: &str = "minus";
    pub const MUL: &str = "mul";
    pub const DIV: &str = "div";
    pub const MOD: &str = "mod";
    pub const UNARY_MINUS: &str = "unaryminus";
    pub const IS_NULL: &str = "isnull";
    pub const IF_NULL: &str = "ifnull";
    pub const COALESCE: &str = "coalesce";
    pub const DATABASE: &str = "database";
}

/// One output column of a parsed query, as the resolver produced it
#[derive(Debug, Clone)]
pub struct ResultField {
    pub column: ColumnInfo,
    /// `AS` alias of the column, empty when absent
    pub column_as_name: CIStr,
    pub table: TableInfo,
    /// Alias of the table, empty when absent
    pub table_as_name: CIStr,
    pub db_name: CIStr,
}

impl ResultField {
    pub fn new(db_name: &str, table: TableInfo, column: ColumnInfo) -> Self {
        Self {
            column,
            column_as_name: CIStr::default(),
            table,
            table_as_name: CIStr::default(),
            db_name: CIStr::new(db_name),
        }
    }

    pub fn with_column_alias(mut self, alias: &str) -> Self {
        self.column_as_name = CIStr::new(alias);
        self
    }

    pub fn with_table_alias(mut self, alias: &str) -> Self {
        self.table_as_name = CIStr::new(alias);
        self
    }
}

//! Column references.

use crate::context::Context;
use crate::expression::schema::Schema;
use crate::expression::{ExpressionError, ExpressionResult};
use crate::model::CIStr;
use crate::types::codec;
use crate::types::{Datum, FieldTypeRef};
use log::debug;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

const COLUMN_FLAG: u8 = 8;

/// Reference to a column produced by some plan node.
///
/// A column starts out symbolic; `resolve_indices` binds it to a slot of
/// the row it will be evaluated against. A correlated column refers to an
/// enclosing query and evaluates to the value the outer query bound with
/// `set_value`.
#[derive(Debug, Clone)]
pub struct Column {
    /// Identifier of the plan node producing this column
    pub from_id: String,
    pub db_name: CIStr,
    pub tbl_name: CIStr,
    pub col_name: CIStr,
    pub ret_type: FieldTypeRef,
    /// Position in the producing node's output
    pub position: usize,
    /// Row slot, set by `resolve_indices`
    pub index: Option<usize>,
    pub correlated: bool,
    /// Outer value slot, shared by every clone of this column
    data: Arc<RwLock<Datum>>,
}

impl Column {
    pub fn new(db_name: &str, tbl_name: &str, col_name: &str, ret_type: FieldTypeRef) -> Self {
        Self {
            from_id: String::new(),
            db_name: CIStr::new(db_name),
            tbl_name: CIStr::new(tbl_name),
            col_name: CIStr::new(col_name),
            ret_type,
            position: 0,
            index: None,
            correlated: false,
            data: Arc::new(RwLock::new(Datum::Null)),
        }
    }

    pub fn with_from_id(mut self, from_id: impl Into<String>) -> Self {
        self.from_id = from_id.into();
        self
    }

    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Mark this column as referring to an enclosing query
    pub fn into_correlated(mut self) -> Self {
        self.correlated = true;
        self
    }

    /// Bind the outer-query value a correlated column evaluates to
    pub fn set_value(&self, value: Datum) {
        *self.data.write() = value;
    }

    /// Name identity: same producer and same qualified name. Schema lookups
    /// match on this alone, whatever the correlation.
    pub fn is_same_column(&self, other: &Column) -> bool {
        self.from_id == other.from_id
            && self.db_name.l == other.db_name.l
            && self.tbl_name.l == other.tbl_name.l
            && self.col_name.l == other.col_name.l
    }

    /// Structural equality: an outer reference never equals a local one
    pub fn equal(&self, other: &Column) -> bool {
        self.correlated == other.correlated && self.is_same_column(other)
    }

    pub fn eval(&self, row: &[Datum], _ctx: &dyn Context) -> ExpressionResult<Datum> {
        if self.correlated {
            return Ok(self.data.read().clone());
        }
        let index = self.index.ok_or_else(|| ExpressionError::UnresolvedColumn {
            column: self.to_string(),
        })?;
        row.get(index)
            .cloned()
            .ok_or(ExpressionError::ColumnIndexOutOfBounds {
                index,
                row_size: row.len(),
            })
    }

    /// Encoded identity, consistent with `equal`
    pub fn hash_code(&self) -> Vec<u8> {
        let mut buf = vec![COLUMN_FLAG, self.correlated as u8];
        for name in [
            self.from_id.as_str(),
            self.db_name.l.as_str(),
            self.tbl_name.l.as_str(),
            self.col_name.l.as_str(),
        ] {
            codec::encode_compact_bytes(&mut buf, name.as_bytes());
        }
        buf
    }

    /// Turn an outer reference into a local one when `schema` provides it
    pub fn decorrelate(mut self, schema: &Schema) -> Column {
        if self.correlated && schema.get_index(&self).is_some() {
            debug!("decorrelated column {}", self);
            self.correlated = false;
        }
        self
    }

    pub fn resolve_indices(&mut self, schema: &Schema) {
        self.index = schema.get_index(self);
        if self.index.is_none() {
            debug!("column {} not found in schema {}", self, schema);
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.db_name.is_empty() {
            write!(f, "{}.", self.db_name.l)?;
        }
        if !self.tbl_name.is_empty() {
            write!(f, "{}.", self.tbl_name.l)?;
        }
        write!(f, "{}", self.col_name.l)
    }
}

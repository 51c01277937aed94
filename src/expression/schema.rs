//! Ordered column lists describing the shape of a row.

use crate::ast::ResultField;
use crate::expression::column::Column;
use crate::expression::{ExpressionError, ExpressionResult};
use std::fmt;

/// Output columns of a plan node. A column's index in the list is the row
/// slot it is read from at evaluation time.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn append(&mut self, col: Column) {
        self.columns.push(col);
    }

    /// Row slot of `col`, or `None` when this schema does not produce it
    pub fn get_index(&self, col: &Column) -> Option<usize> {
        self.columns.iter().position(|c| c.is_same_column(col))
    }

    /// Look a column up by name. Empty qualifiers match any database or table.
    pub fn find_column(
        &self,
        db_name: &str,
        tbl_name: &str,
        col_name: &str,
    ) -> ExpressionResult<Option<&Column>> {
        let (db, tbl, name) = (
            db_name.to_lowercase(),
            tbl_name.to_lowercase(),
            col_name.to_lowercase(),
        );
        let mut found: Option<&Column> = None;
        for col in &self.columns {
            let matches = col.col_name.l == name
                && (tbl.is_empty() || col.tbl_name.l == tbl)
                && (db.is_empty() || col.db_name.l == db);
            if !matches {
                continue;
            }
            if found.is_some() {
                return Err(ExpressionError::AmbiguousColumn {
                    column: col_name.to_string(),
                });
            }
            found = Some(col);
        }
        Ok(found)
    }

    /// Reset every column's position to its index in this schema
    pub fn init_positions(&mut self) {
        for (i, col) in self.columns.iter_mut().enumerate() {
            col.position = i;
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", col)?;
        }
        write!(f, "]")
    }
}

/// Build the schema of a query's result fields.
///
/// Aliases take precedence over the underlying column and table names. The
/// declared type is shared with the catalog column, not copied.
pub fn result_fields_to_schema(fields: &[ResultField]) -> Schema {
    let columns = fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let col_name = if field.column_as_name.is_empty() {
                &field.column.name
            } else {
                &field.column_as_name
            };
            let tbl_name = if field.table_as_name.is_empty() {
                &field.table.name
            } else {
                &field.table_as_name
            };
            Column::new(
                &field.db_name.o,
                &tbl_name.o,
                &col_name.o,
                field.column.field_type.clone(),
            )
            .with_position(i)
        })
        .collect();
    Schema::new(columns)
}

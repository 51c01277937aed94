//! Catalog metadata referenced by result fields.

use crate::types::FieldTypeRef;
use std::fmt;

/// Case-insensitive identifier: original spelling plus lower-cased form
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CIStr {
    pub o: String,
    pub l: String,
}

impl CIStr {
    pub fn new(s: impl Into<String>) -> Self {
        let o = s.into();
        let l = o.to_lowercase();
        Self { o, l }
    }

    pub fn is_empty(&self) -> bool {
        self.l.is_empty()
    }
}

impl fmt::Display for CIStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.o)
    }
}

impl From<&str> for CIStr {
    fn from(s: &str) -> Self {
        CIStr::new(s)
    }
}

/// A column as the catalog describes it
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: CIStr,
    pub field_type: FieldTypeRef,
    /// Ordinal position inside its table
    pub offset: usize,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, field_type: FieldTypeRef, offset: usize) -> Self {
        Self {
            name: CIStr::new(name),
            field_type,
            offset,
        }
    }
}

/// A table as the catalog describes it
#[derive(Debug, Clone)]
pub struct TableInfo {
    pub name: CIStr,
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnInfo>) -> Self {
        Self {
            name: CIStr::new(name),
            columns,
        }
    }
}

//! Declared column and expression types.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Column may not hold NULL
pub const NOT_NULL_FLAG: u32 = 1;
/// Integer column is unsigned
pub const UNSIGNED_FLAG: u32 = 1 << 5;

/// Storage type of a field
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    Null = 0,
    Tiny = 1,
    Long = 3,
    Double = 5,
    LongLong = 8,
    VarChar = 15,
}

/// Declared type of a column or expression result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    pub tp: TypeCode,
    pub flen: Option<usize>,
    pub decimal: Option<usize>,
    pub flag: u32,
}

/// Declared types are shared between the catalog and every schema
/// column built from it, so a catalog change is visible everywhere.
pub type FieldTypeRef = Arc<RwLock<FieldType>>;

impl FieldType {
    pub fn new(tp: TypeCode) -> Self {
        Self {
            tp,
            flen: None,
            decimal: None,
            flag: 0,
        }
    }

    /// Wrap this type in a fresh shared handle
    pub fn into_ref(self) -> FieldTypeRef {
        Arc::new(RwLock::new(self))
    }

    pub fn is_not_null(&self) -> bool {
        self.flag & NOT_NULL_FLAG != 0
    }

    pub fn is_unsigned(&self) -> bool {
        self.flag & UNSIGNED_FLAG != 0
    }
}

/// Shorthand for a freshly allocated, unshared declared type
pub fn new_field_type(tp: TypeCode) -> FieldTypeRef {
    FieldType::new(tp).into_ref()
}

/// Deep copy of a shared declared type
pub fn copy_field_type(ft: &FieldTypeRef) -> FieldTypeRef {
    ft.read().clone().into_ref()
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.tp {
            TypeCode::Null => "null",
            TypeCode::Tiny => "tinyint",
            TypeCode::Long => "int",
            TypeCode::LongLong => "bigint",
            TypeCode::Double => "double",
            TypeCode::VarChar => "varchar",
        };
        write!(f, "{}", name)?;
        if let Some(flen) = self.flen {
            match self.decimal {
                Some(decimal) => write!(f, "({},{})", flen, decimal)?,
                None => write!(f, "({})", flen)?,
            }
        }
        if self.is_unsigned() {
            write!(f, " unsigned")?;
        }
        if self.is_not_null() {
            write!(f, " not null")?;
        }
        Ok(())
    }
}

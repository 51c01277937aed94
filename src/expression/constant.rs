//! Literal values.

use crate::types::codec;
use crate::types::{new_field_type, Datum, FieldTypeRef, TypeCode};
use std::fmt;

/// A literal value together with its declared type
#[derive(Debug, Clone)]
pub struct Constant {
    pub value: Datum,
    pub ret_type: FieldTypeRef,
}

impl Constant {
    pub fn new(value: Datum, ret_type: FieldTypeRef) -> Self {
        Self { value, ret_type }
    }

    /// Untyped NULL literal
    pub fn null() -> Self {
        Self::new(Datum::Null, new_field_type(TypeCode::Null))
    }

    pub fn int(value: i64) -> Self {
        Self::new(Datum::Int(value), new_field_type(TypeCode::LongLong))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(Datum::String(value.into()), new_field_type(TypeCode::VarChar))
    }

    /// Encoded literal; equal constants always produce identical bytes
    pub fn hash_code(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        codec::encode_value(&mut buf, &self.value);
        buf
    }

    /// Value equality, independent of the declared type
    pub fn equal(&self, other: &Constant) -> bool {
        self.hash_code() == other.hash_code()
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

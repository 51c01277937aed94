//! Scalar value and type primitives consumed by expressions.
//!
//! - **Datum**: tagged SQL value with null, boolean coercion and ordering
//! - **FieldType**: declared type, shared by reference from the catalog
//! - **codec**: memcomparable encoding used for hashing and sort keys

pub mod codec;
pub mod datum;
pub mod field_type;

pub use datum::Datum;
pub use field_type::{
    copy_field_type, new_field_type, FieldType, FieldTypeRef, TypeCode, NOT_NULL_FLAG,
    UNSIGNED_FLAG,
};

//! Scalar values flowing through expression evaluation.

use crate::expression::{ExpressionError, ExpressionResult};
use std::cmp::Ordering;
use std::fmt;

/// A single SQL value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Datum {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    String(String),
}

impl Datum {
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    /// Name of the value kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Datum::Null => "null",
            Datum::Int(_) => "int",
            Datum::Float(_) => "float",
            Datum::String(_) => "string",
        }
    }

    /// Coerce to a MySQL-style boolean: 1 for true, 0 for false.
    ///
    /// Callers are expected to have handled `Null` already.
    pub fn to_bool(&self) -> ExpressionResult<i64> {
        let truthy = match self {
            Datum::Null => false,
            Datum::Int(i) => *i != 0,
            Datum::Float(f) => *f != 0.0,
            Datum::String(s) => {
                let parsed =
                    parse_number(s).ok_or_else(|| ExpressionError::InvalidBoolean {
                        value: s.clone(),
                    })?;
                parsed != 0.0
            }
        };
        Ok(truthy as i64)
    }

    /// Numeric view of the value, if it has one
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Datum::Null => None,
            Datum::Int(i) => Some(*i as f64),
            Datum::Float(f) => Some(*f),
            Datum::String(s) => parse_number(s),
        }
    }

    /// Total order used by comparison functions.
    ///
    /// NULL sorts before every other value. Numbers compare numerically
    /// across int/float; a string compared with a number must parse as one.
    pub fn compare(&self, other: &Datum) -> ExpressionResult<Ordering> {
        match (self, other) {
            (Datum::Null, Datum::Null) => Ok(Ordering::Equal),
            (Datum::Null, _) => Ok(Ordering::Less),
            (_, Datum::Null) => Ok(Ordering::Greater),
            (Datum::Int(a), Datum::Int(b)) => Ok(a.cmp(b)),
            (Datum::String(a), Datum::String(b)) => Ok(a.as_bytes().cmp(b.as_bytes())),
            (a, b) => {
                let incomparable = || ExpressionError::IncomparableValues {
                    left: a.to_string(),
                    right: b.to_string(),
                };
                match (a, b) {
                    (Datum::Int(x), _) => {
                        let y = b.to_f64().ok_or_else(incomparable)?;
                        compare_int_float(*x, y).ok_or_else(incomparable)
                    }
                    (_, Datum::Int(y)) => {
                        let x = a.to_f64().ok_or_else(incomparable)?;
                        compare_int_float(*y, x)
                            .map(Ordering::reverse)
                            .ok_or_else(incomparable)
                    }
                    _ => {
                        let x = a.to_f64().ok_or_else(incomparable)?;
                        let y = b.to_f64().ok_or_else(incomparable)?;
                        x.partial_cmp(&y).ok_or_else(incomparable)
                    }
                }
            }
        }
    }
}

/// 2^63 as f64; every float at or above it exceeds `i64::MAX`
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Exact ordering of an integer against a float, `None` for NaN.
///
/// The integer is compared with the float's integral part, which is exact
/// inside the i64 range; the fraction only breaks ties.
fn compare_int_float(i: i64, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f >= I64_BOUND {
        return Some(Ordering::Less);
    }
    if f < -I64_BOUND {
        return Some(Ordering::Greater);
    }
    let whole = f.trunc();
    let ord = i.cmp(&(whole as i64)).then_with(|| {
        // i equals the integral part
        whole.partial_cmp(&f).unwrap_or(Ordering::Equal)
    });
    Some(ord)
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => write!(f, "NULL"),
            Datum::Int(i) => write!(f, "{}", i),
            Datum::Float(v) => write!(f, "{}", v),
            Datum::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Int(v)
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Float(v)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::String(v.to_string())
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Datum::Int(v as i64)
    }
}

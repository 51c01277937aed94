//! Builtin scalar functions that a `ScalarFunction` node can apply.

use crate::ast::opcode;
use crate::context::Context;
use crate::expression::{ExpressionError, ExpressionResult};
use crate::types::Datum;
use std::cmp::Ordering;

/// Registry of builtin functions, keyed by canonical lower-case name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    // Logical
    And,
    Or,
    Xor,
    Not,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    NullEq,

    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    UnaryMinus,

    // Null handling
    IsNull,
    IfNull,
    Coalesce,

    // Session
    Database,
}

impl Builtin {
    /// Look up a builtin by name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        let builtin = match name.to_lowercase().as_str() {
            opcode::AND_AND => Builtin::And,
            opcode::OR_OR => Builtin::Or,
            opcode::LOGIC_XOR => Builtin::Xor,
            opcode::UNARY_NOT => Builtin::Not,
            opcode::EQ => Builtin::Eq,
            opcode::NE => Builtin::Ne,
            opcode::LT => Builtin::Lt,
            opcode::LE => Builtin::Le,
            opcode::GT => Builtin::Gt,
            opcode::GE => Builtin::Ge,
            opcode::NULL_EQ => Builtin::NullEq,
            opcode::PLUS => Builtin::Plus,
            opcode::MINUS => Builtin::Minus,
            opcode::MUL => Builtin::Mul,
            opcode::DIV => Builtin::Div,
            opcode::MOD => Builtin::Mod,
            opcode::UNARY_MINUS => Builtin::UnaryMinus,
            opcode::IS_NULL => Builtin::IsNull,
            opcode::IF_NULL => Builtin::IfNull,
            opcode::COALESCE => Builtin::Coalesce,
            opcode::DATABASE => Builtin::Database,
            _ => return None,
        };
        Some(builtin)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::And => opcode::AND_AND,
            Builtin::Or => opcode::OR_OR,
            Builtin::Xor => opcode::LOGIC_XOR,
            Builtin::Not => opcode::UNARY_NOT,
            Builtin::Eq => opcode::EQ,
            Builtin::Ne => opcode::NE,
            Builtin::Lt => opcode::LT,
            Builtin::Le => opcode::LE,
            Builtin::Gt => opcode::GT,
            Builtin::Ge => opcode::GE,
            Builtin::NullEq => opcode::NULL_EQ,
            Builtin::Plus => opcode::PLUS,
            Builtin::Minus => opcode::MINUS,
            Builtin::Mul => opcode::MUL,
            Builtin::Div => opcode::DIV,
            Builtin::Mod => opcode::MOD,
            Builtin::UnaryMinus => opcode::UNARY_MINUS,
            Builtin::IsNull => opcode::IS_NULL,
            Builtin::IfNull => opcode::IF_NULL,
            Builtin::Coalesce => opcode::COALESCE,
            Builtin::Database => opcode::DATABASE,
        }
    }

    /// Minimum and maximum argument count (`None` means unbounded)
    pub fn arity(&self) -> (usize, Option<usize>) {
        match self {
            Builtin::Not | Builtin::UnaryMinus | Builtin::IsNull => (1, Some(1)),
            Builtin::Coalesce => (1, None),
            Builtin::Database => (0, Some(0)),
            _ => (2, Some(2)),
        }
    }

    /// Reject argument lists the function cannot be applied to
    pub fn check_arg_count(&self, actual: usize) -> ExpressionResult<()> {
        let (min, max) = self.arity();
        let fits = actual >= min && max.map_or(true, |max| actual <= max);
        if fits {
            return Ok(());
        }
        let expected = match max {
            Some(max) if max == min => min.to_string(),
            Some(max) => format!("{} to {}", min, max),
            None => format!("at least {}", min),
        };
        Err(ExpressionError::FunctionArgumentCount {
            function: self.name().to_string(),
            expected,
            actual,
        })
    }

    /// Apply the function to already evaluated arguments
    pub fn eval(&self, args: &[Datum], ctx: &dyn Context) -> ExpressionResult<Datum> {
        self.check_arg_count(args.len())?;
        match self {
            Builtin::And => logic_and(args),
            Builtin::Or => logic_or(args),
            Builtin::Xor => {
                if args.iter().any(Datum::is_null) {
                    return Ok(Datum::Null);
                }
                let a = args[0].to_bool()?;
                let b = args[1].to_bool()?;
                Ok(Datum::Int(a ^ b))
            }
            Builtin::Not => match &args[0] {
                Datum::Null => Ok(Datum::Null),
                d => Ok(Datum::Int((d.to_bool()? == 0) as i64)),
            },

            Builtin::Eq => compare(args, |o| o == Ordering::Equal),
            Builtin::Ne => compare(args, |o| o != Ordering::Equal),
            Builtin::Lt => compare(args, |o| o == Ordering::Less),
            Builtin::Le => compare(args, |o| o != Ordering::Greater),
            Builtin::Gt => compare(args, |o| o == Ordering::Greater),
            Builtin::Ge => compare(args, |o| o != Ordering::Less),
            Builtin::NullEq => {
                let equal = match (&args[0], &args[1]) {
                    (Datum::Null, Datum::Null) => true,
                    (Datum::Null, _) | (_, Datum::Null) => false,
                    (a, b) => a.compare(b)? == Ordering::Equal,
                };
                Ok(Datum::from(equal))
            }

            Builtin::Plus | Builtin::Minus | Builtin::Mul | Builtin::Div | Builtin::Mod => {
                self.arithmetic(&args[0], &args[1])
            }
            Builtin::UnaryMinus => match &args[0] {
                Datum::Null => Ok(Datum::Null),
                Datum::Int(i) => i
                    .checked_neg()
                    .map(Datum::Int)
                    .ok_or_else(|| ExpressionError::ArithmeticOverflow {
                        function: self.name().to_string(),
                    }),
                d => d.to_f64().map(|f| Datum::Float(-f)).ok_or_else(|| {
                    ExpressionError::InvalidOperandTypes {
                        function: self.name().to_string(),
                        left: d.kind(),
                        right: "none",
                    }
                }),
            },

            Builtin::IsNull => Ok(Datum::from(args[0].is_null())),
            Builtin::IfNull => {
                if args[0].is_null() {
                    Ok(args[1].clone())
                } else {
                    Ok(args[0].clone())
                }
            }
            Builtin::Coalesce => Ok(args
                .iter()
                .find(|d| !d.is_null())
                .cloned()
                .unwrap_or(Datum::Null)),

            Builtin::Database => Ok(ctx
                .current_db()
                .map(Datum::from)
                .unwrap_or(Datum::Null)),
        }
    }

    fn arithmetic(&self, a: &Datum, b: &Datum) -> ExpressionResult<Datum> {
        if a.is_null() || b.is_null() {
            return Ok(Datum::Null);
        }
        let overflow = || ExpressionError::ArithmeticOverflow {
            function: self.name().to_string(),
        };

        if let (Datum::Int(x), Datum::Int(y)) = (a, b) {
            let result = match self {
                Builtin::Plus => x.checked_add(*y),
                Builtin::Minus => x.checked_sub(*y),
                Builtin::Mul => x.checked_mul(*y),
                Builtin::Mod => {
                    if *y == 0 {
                        return Err(ExpressionError::DivisionByZero);
                    }
                    x.checked_rem(*y)
                }
                // `/` always produces a fractional result
                _ => None,
            };
            if *self != Builtin::Div {
                return result.map(Datum::Int).ok_or_else(overflow);
            }
        }

        let type_error = || ExpressionError::InvalidOperandTypes {
            function: self.name().to_string(),
            left: a.kind(),
            right: b.kind(),
        };
        let x = a.to_f64().ok_or_else(type_error)?;
        let y = b.to_f64().ok_or_else(type_error)?;
        let result = match self {
            Builtin::Plus => x + y,
            Builtin::Minus => x - y,
            Builtin::Mul => x * y,
            Builtin::Div | Builtin::Mod => {
                if y == 0.0 {
                    return Err(ExpressionError::DivisionByZero);
                }
                if *self == Builtin::Div {
                    x / y
                } else {
                    x % y
                }
            }
            _ => return Err(type_error()),
        };
        Ok(Datum::Float(result))
    }
}

/// Three-valued AND: false wins over NULL, NULL wins over true
fn logic_and(args: &[Datum]) -> ExpressionResult<Datum> {
    let mut saw_null = false;
    for d in args {
        if d.is_null() {
            saw_null = true;
        } else if d.to_bool()? == 0 {
            return Ok(Datum::Int(0));
        }
    }
    Ok(if saw_null { Datum::Null } else { Datum::Int(1) })
}

/// Three-valued OR: true wins over NULL, NULL wins over false
fn logic_or(args: &[Datum]) -> ExpressionResult<Datum> {
    let mut saw_null = false;
    for d in args {
        if d.is_null() {
            saw_null = true;
        } else if d.to_bool()? != 0 {
            return Ok(Datum::Int(1));
        }
    }
    Ok(if saw_null { Datum::Null } else { Datum::Int(0) })
}

fn compare<F>(args: &[Datum], accept: F) -> ExpressionResult<Datum>
where
    F: Fn(Ordering) -> bool,
{
    let (a, b) = (&args[0], &args[1]);
    if a.is_null() || b.is_null() {
        return Ok(Datum::Null);
    }
    Ok(Datum::from(accept(a.compare(b)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SessionContext;

    fn eval(b: Builtin, args: &[Datum]) -> ExpressionResult<Datum> {
        b.eval(args, &SessionContext::new())
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(Builtin::from_name("AND"), Some(Builtin::And));
        assert_eq!(Builtin::from_name("IfNull"), Some(Builtin::IfNull));
        assert_eq!(Builtin::from_name("no_such_fn"), None);
        assert_eq!(Builtin::Coalesce.name(), "coalesce");
    }

    #[test]
    fn test_arg_count() {
        assert!(Builtin::And.check_arg_count(2).is_ok());
        assert!(Builtin::Coalesce.check_arg_count(5).is_ok());
        assert_eq!(
            Builtin::Not.check_arg_count(2),
            Err(ExpressionError::FunctionArgumentCount {
                function: "not".to_string(),
                expected: "1".to_string(),
                actual: 2,
            })
        );
        assert_eq!(
            Builtin::Coalesce.check_arg_count(0),
            Err(ExpressionError::FunctionArgumentCount {
                function: "coalesce".to_string(),
                expected: "at least 1".to_string(),
                actual: 0,
            })
        );
    }

    #[test]
    fn test_three_valued_logic() -> ExpressionResult<()> {
        let t = Datum::Int(1);
        let f = Datum::Int(0);
        let n = Datum::Null;

        assert_eq!(eval(Builtin::And, &[n.clone(), f.clone()])?, Datum::Int(0));
        assert_eq!(eval(Builtin::And, &[n.clone(), t.clone()])?, Datum::Null);
        assert_eq!(eval(Builtin::And, &[t.clone(), t.clone()])?, Datum::Int(1));

        assert_eq!(eval(Builtin::Or, &[n.clone(), t.clone()])?, Datum::Int(1));
        assert_eq!(eval(Builtin::Or, &[n.clone(), f.clone()])?, Datum::Null);
        assert_eq!(eval(Builtin::Or, &[f.clone(), f.clone()])?, Datum::Int(0));

        assert_eq!(eval(Builtin::Xor, &[t.clone(), f.clone()])?, Datum::Int(1));
        assert_eq!(eval(Builtin::Xor, &[t.clone(), n.clone()])?, Datum::Null);
        assert_eq!(eval(Builtin::Not, &[n])?, Datum::Null);
        assert_eq!(eval(Builtin::Not, &[f])?, Datum::Int(1));
        Ok(())
    }

    #[test]
    fn test_comparison() -> ExpressionResult<()> {
        assert_eq!(
            eval(Builtin::Lt, &[Datum::Int(1), Datum::Float(1.5)])?,
            Datum::Int(1)
        );
        assert_eq!(
            eval(Builtin::Ge, &[Datum::from("a"), Datum::from("b")])?,
            Datum::Int(0)
        );
        assert_eq!(eval(Builtin::Eq, &[Datum::Null, Datum::Null])?, Datum::Null);
        assert_eq!(
            eval(Builtin::NullEq, &[Datum::Null, Datum::Null])?,
            Datum::Int(1)
        );
        assert_eq!(
            eval(Builtin::NullEq, &[Datum::Int(1), Datum::Null])?,
            Datum::Int(0)
        );
        Ok(())
    }

    #[test]
    fn test_arithmetic() -> ExpressionResult<()> {
        assert_eq!(
            eval(Builtin::Plus, &[Datum::Int(2), Datum::Int(3)])?,
            Datum::Int(5)
        );
        assert_eq!(
            eval(Builtin::Mul, &[Datum::Int(2), Datum::Float(1.5)])?,
            Datum::Float(3.0)
        );
        assert_eq!(
            eval(Builtin::Div, &[Datum::Int(7), Datum::Int(2)])?,
            Datum::Float(3.5)
        );
        assert_eq!(
            eval(Builtin::Mod, &[Datum::Int(7), Datum::Int(3)])?,
            Datum::Int(1)
        );
        assert_eq!(
            eval(Builtin::Minus, &[Datum::Null, Datum::Int(3)])?,
            Datum::Null
        );
        assert_eq!(
            eval(Builtin::Div, &[Datum::Int(1), Datum::Int(0)]),
            Err(ExpressionError::DivisionByZero)
        );
        assert!(matches!(
            eval(Builtin::Plus, &[Datum::Int(i64::MAX), Datum::Int(1)]),
            Err(ExpressionError::ArithmeticOverflow { .. })
        ));
        assert!(matches!(
            eval(Builtin::Plus, &[Datum::from("x"), Datum::Int(1)]),
            Err(ExpressionError::InvalidOperandTypes { .. })
        ));
        assert_eq!(
            eval(Builtin::UnaryMinus, &[Datum::Int(4)])?,
            Datum::Int(-4)
        );
        Ok(())
    }

    #[test]
    fn test_null_handling_and_session() -> ExpressionResult<()> {
        assert_eq!(eval(Builtin::IsNull, &[Datum::Null])?, Datum::Int(1));
        assert_eq!(
            eval(Builtin::IfNull, &[Datum::Null, Datum::Int(9)])?,
            Datum::Int(9)
        );
        assert_eq!(
            eval(
                Builtin::Coalesce,
                &[Datum::Null, Datum::from("x"), Datum::Int(1)]
            )?,
            Datum::from("x")
        );
        assert_eq!(eval(Builtin::Database, &[])?, Datum::Null);
        assert_eq!(
            Builtin::Database.eval(&[], &SessionContext::with_db("shop"))?,
            Datum::from("shop")
        );
        Ok(())
    }
}

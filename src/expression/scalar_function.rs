//! Function applications.

use crate::context::Context;
use crate::expression::builtin::Builtin;
use crate::expression::schema::Schema;
use crate::expression::{Expression, ExpressionError, ExpressionResult};
use crate::model::CIStr;
use crate::types::codec;
use crate::types::{Datum, FieldTypeRef};
use std::fmt;

const FUNCTION_FLAG: u8 = 9;

/// A builtin function applied to argument expressions
#[derive(Debug, Clone)]
pub struct ScalarFunction {
    /// Name as written; `func_name.l` is the canonical spelling
    pub func_name: CIStr,
    pub args: Vec<Expression>,
    pub ret_type: FieldTypeRef,
    builtin: Builtin,
}

/// Build a function application, validating the name and argument count
pub fn new_function(
    name: &str,
    ret_type: FieldTypeRef,
    args: Vec<Expression>,
) -> ExpressionResult<Expression> {
    let builtin = Builtin::from_name(name).ok_or_else(|| ExpressionError::UnknownFunction {
        name: name.to_string(),
    })?;
    builtin.check_arg_count(args.len())?;
    Ok(Expression::ScalarFunction(ScalarFunction {
        func_name: CIStr::new(name),
        args,
        ret_type,
        builtin,
    }))
}

impl ScalarFunction {
    pub fn builtin(&self) -> Builtin {
        self.builtin
    }

    pub fn eval(&self, row: &[Datum], ctx: &dyn Context) -> ExpressionResult<Datum> {
        let values = self
            .args
            .iter()
            .map(|arg| arg.eval(row, ctx))
            .collect::<ExpressionResult<Vec<_>>>()?;
        self.builtin.eval(&values, ctx)
    }

    pub fn hash_code(&self) -> Vec<u8> {
        let mut buf = vec![FUNCTION_FLAG];
        codec::encode_compact_bytes(&mut buf, self.func_name.l.as_bytes());
        codec::encode_uint(&mut buf, self.args.len() as u64);
        for arg in &self.args {
            buf.extend_from_slice(&arg.hash_code());
        }
        buf
    }

    pub fn equal(&self, other: &ScalarFunction) -> bool {
        self.func_name.l == other.func_name.l
            && self.args.len() == other.args.len()
            && self.args.iter().zip(&other.args).all(|(a, b)| a.equal(b))
    }

    pub fn is_correlated(&self) -> bool {
        self.args.iter().any(Expression::is_correlated)
    }

    /// Same application over decorrelated arguments
    pub fn decorrelate(self, schema: &Schema) -> ScalarFunction {
        ScalarFunction {
            args: self
                .args
                .into_iter()
                .map(|arg| arg.decorrelate(schema))
                .collect(),
            ..self
        }
    }

    pub fn resolve_indices(&mut self, schema: &Schema) {
        for arg in &mut self.args {
            arg.resolve_indices(schema);
        }
    }
}

impl fmt::Display for ScalarFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.func_name.l)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

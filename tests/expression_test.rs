use anyhow::Result;
use scalarexpr::ast::{opcode, ResultField};
use scalarexpr::context::SessionContext;
use scalarexpr::expression::{
    compose_cnf_condition, compose_dnf_condition, eval_bool, evaluate_expr_with_null,
    new_function, result_fields_to_schema, split_cnf_items, split_dnf_items, Column, Constant,
    Expression, ExpressionError, Schema,
};
use scalarexpr::model::{ColumnInfo, TableInfo};
use scalarexpr::types::{new_field_type, Datum, TypeCode};
use std::sync::Arc;
use std::thread;

fn col(tbl: &str, name: &str) -> Column {
    Column::new("test", tbl, name, new_field_type(TypeCode::LongLong))
}

fn func(name: &str, args: Vec<Expression>) -> Expression {
    new_function(name, new_field_type(TypeCode::LongLong), args).unwrap()
}

fn gt(c: Column, v: i64) -> Expression {
    func(opcode::GT, vec![c.into(), Constant::int(v).into()])
}

fn max_depth(expr: &Expression) -> usize {
    match expr {
        Expression::ScalarFunction(f) => {
            1 + f.args.iter().map(max_depth).max().unwrap_or(0)
        }
        _ => 0,
    }
}

#[test]
fn test_balanced_composition_depth() -> Result<()> {
    // leaves are columns so every level counted is an AND application
    for n in 1..=64usize {
        let conditions = (0..n)
            .map(|i| Expression::from(col("t", &format!("c{}", i))))
            .collect();
        let tree = compose_cnf_condition(conditions)?.unwrap();
        let expected = (n as f64).log2().ceil() as usize;
        assert_eq!(max_depth(&tree), expected, "n = {}", n);
    }
    Ok(())
}

#[test]
fn test_single_condition_returned_as_is() -> Result<()> {
    let only = gt(col("t", "a"), 1);
    let tree = compose_cnf_condition(vec![only.clone()])?.unwrap();
    assert!(tree.equal(&only));
    assert_eq!(tree.to_string(), "gt(test.t.a, 1)");
    Ok(())
}

#[test]
fn test_compose_split_preserves_items() -> Result<()> {
    let conditions: Vec<Expression> = vec![
        gt(col("t", "a"), 1),
        func(
            opcode::OR_OR,
            vec![gt(col("t", "b"), 2), gt(col("t", "c"), 3)],
        ),
        Constant::int(1).into(),
        col("t", "d").into(),
        gt(col("t", "a"), 1),
    ];
    let tree = compose_cnf_condition(conditions.clone())?;
    let items = split_cnf_items(tree);

    assert_eq!(items.len(), conditions.len());
    let mut remaining: Vec<Vec<u8>> = conditions.iter().map(Expression::hash_code).collect();
    for item in &items {
        let pos = remaining
            .iter()
            .position(|h| *h == item.hash_code())
            .expect("item not in original list");
        remaining.swap_remove(pos);
    }
    assert!(remaining.is_empty());
    Ok(())
}

#[test]
fn test_dnf_round_trip() -> Result<()> {
    let conditions: Vec<Expression> = (0..6).map(|i| gt(col("t", "a"), i)).collect();
    let tree = compose_dnf_condition(conditions.clone())?.unwrap();
    // three OR levels above the comparisons
    assert_eq!(max_depth(&tree), 4);
    let items = split_dnf_items(tree);
    assert!(items.iter().zip(&conditions).all(|(a, b)| a.equal(b)));
    Ok(())
}

#[test]
fn test_empty_composition() -> Result<()> {
    let tree = compose_cnf_condition(Vec::new())?;
    assert!(tree.is_none());
    assert!(split_cnf_items(tree).is_empty());
    Ok(())
}

#[test]
fn test_constant_equality_and_hash() {
    let three = Expression::from(Constant::int(3));
    let other_three = Expression::from(Constant::new(Datum::Int(3), new_field_type(TypeCode::Long)));
    assert!(three.equal(&other_three));
    assert_eq!(three.hash_code(), other_three.hash_code());

    // a column evaluating to 3 is still not the constant 3
    let ctx = SessionContext::new();
    let mut column = Expression::from(col("t", "a"));
    column.resolve_indices(&Schema::new(vec![col("t", "a")]));
    assert_eq!(column.eval(&[Datum::Int(3)], &ctx), Ok(Datum::Int(3)));
    assert!(!three.equal(&column));
}

#[test]
fn test_hash_consistency_across_variants() {
    let pairs: Vec<(Expression, Expression)> = vec![
        (Constant::string("x").into(), Constant::string("x").into()),
        (col("T", "A").into(), col("t", "a").into()),
        (gt(col("t", "a"), 1), gt(col("T", "a"), 1)),
        (
            func("AND", vec![gt(col("t", "a"), 1), col("t", "b").into()]),
            func("and", vec![gt(col("t", "a"), 1), col("t", "b").into()]),
        ),
    ];
    for (a, b) in &pairs {
        assert!(a.equal(b), "{} vs {}", a, b);
        assert_eq!(a.hash_code(), b.hash_code(), "{} vs {}", a, b);
    }
}

#[test]
fn test_outer_reference_differs_from_local_column() {
    let schema = Schema::new(vec![col("t", "a"), col("t", "id")]);
    let outer = col("t", "id").into_correlated();
    outer.set_value(Datum::Int(99));

    let mut with_outer = func(opcode::EQ, vec![col("t", "a").into(), outer.into()]);
    let mut with_local = func(opcode::EQ, vec![col("t", "a").into(), col("t", "id").into()]);
    with_outer.resolve_indices(&schema);
    with_local.resolve_indices(&schema);

    let ctx = SessionContext::new();
    let row = [Datum::Int(1), Datum::Int(1)];
    assert_eq!(with_outer.eval(&row, &ctx), Ok(Datum::Int(0)));
    assert_eq!(with_local.eval(&row, &ctx), Ok(Datum::Int(1)));
    assert!(!with_outer.equal(&with_local));
    assert_ne!(with_outer.hash_code(), with_local.hash_code());

    // once decorrelated against a schema serving t.id the two coincide
    let decorrelated = with_outer.decorrelate(&schema);
    assert!(decorrelated.equal(&with_local));
    assert_eq!(decorrelated.hash_code(), with_local.hash_code());
}

#[test]
fn test_null_propagation_scope() -> Result<()> {
    let schema = Schema::new(vec![col("t", "a")]);
    let expr = func(opcode::PLUS, vec![col("t", "a").into(), col("u", "b").into()]);

    let mut result = evaluate_expr_with_null(&schema, &expr)?;
    assert_eq!(result.to_string(), "plus(NULL, test.u.b)");

    // the untouched column is still symbolic and can be bound later
    let ctx = SessionContext::new();
    result.resolve_indices(&Schema::new(vec![col("u", "b")]));
    assert_eq!(result.eval(&[Datum::Int(1)], &ctx), Ok(Datum::Null));
    Ok(())
}

#[test]
fn test_new_function_rejects_bad_shapes() {
    let schema = Schema::new(vec![col("t", "a")]);
    let err = new_function("no_such_fn", new_field_type(TypeCode::Tiny), vec![]);
    assert!(matches!(err, Err(ExpressionError::UnknownFunction { .. })));

    let not_applied_to_two = new_function(
        opcode::UNARY_NOT,
        new_field_type(TypeCode::Tiny),
        vec![col("t", "a").into(), col("t", "a").into()],
    );
    assert!(matches!(
        not_applied_to_two,
        Err(ExpressionError::FunctionArgumentCount { .. })
    ));

    // a well formed tree never hits a construction fault
    let expr = func(opcode::UNARY_NOT, vec![col("t", "a").into()]);
    assert!(evaluate_expr_with_null(&schema, &expr).is_ok());
}

#[test]
fn test_schema_builder_aliasing() {
    let column = ColumnInfo::new("c1", new_field_type(TypeCode::Long), 0);
    let table = TableInfo::new("t1", vec![column.clone()]);
    let fields = vec![
        ResultField::new("test", table.clone(), column.clone()),
        ResultField::new("test", table, column)
            .with_column_alias("c2")
            .with_table_alias("t2"),
    ];

    let schema = result_fields_to_schema(&fields);
    assert_eq!(schema.len(), 2);
    assert_eq!(schema.columns()[0].col_name.l, "c1");
    assert_eq!(schema.columns()[0].tbl_name.l, "t1");
    assert_eq!(schema.columns()[1].col_name.l, "c2");
    assert_eq!(schema.columns()[1].tbl_name.l, "t2");
    for (i, c) in schema.iter().enumerate() {
        assert_eq!(c.position, i);
    }
}

#[test]
fn test_resolve_indices_idempotent() -> Result<()> {
    let schema = Schema::new(vec![col("t", "a"), col("t", "b"), col("t", "c")]);
    let expr = compose_cnf_condition(vec![gt(col("t", "c"), 1), gt(col("t", "a"), 2)])?.unwrap();

    let mut once = expr.clone();
    once.resolve_indices(&schema);
    let mut twice = once.clone();
    twice.resolve_indices(&schema);

    let ctx = SessionContext::new();
    let row = [Datum::Int(5), Datum::Int(0), Datum::Int(5)];
    assert!(eval_bool(&once, &row, &ctx)?);
    assert_eq!(once.eval(&row, &ctx), twice.eval(&row, &ctx));
    assert_eq!(once.to_string(), twice.to_string());
    Ok(())
}

#[test]
fn test_concurrent_evaluation_of_shared_tree() -> Result<()> {
    let schema = Schema::new(vec![col("t", "a"), col("t", "b")]);
    let mut tree = compose_cnf_condition(vec![gt(col("t", "a"), 10), gt(col("t", "b"), 20)])?.unwrap();
    tree.resolve_indices(&schema);
    let tree = Arc::new(tree);

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let tree = Arc::clone(&tree);
            thread::spawn(move || {
                let ctx = SessionContext::new();
                (0..100)
                    .filter(|i| {
                        let row = [Datum::Int(worker * 100 + i), Datum::Int(25)];
                        eval_bool(&tree, &row, &ctx).unwrap()
                    })
                    .count()
            })
        })
        .collect();

    let matched: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    // every row except a in 0..=10
    assert_eq!(matched, 400 - 11);
    Ok(())
}

#[test]
fn test_eval_bool_collapses_null() -> Result<()> {
    let ctx = SessionContext::new();
    let mut expr = gt(col("t", "a"), 1);
    expr.resolve_indices(&Schema::new(vec![col("t", "a")]));

    assert!(!eval_bool(&expr, &[Datum::Null], &ctx)?);
    assert_eq!(expr.eval(&[Datum::Null], &ctx)?, Datum::Null);
    assert!(eval_bool(&expr, &[Datum::Int(2)], &ctx)?);
    Ok(())
}

#[test]
fn test_database_function_reads_context() -> Result<()> {
    let expr = func(opcode::DATABASE, vec![]);
    assert_eq!(expr.eval(&[], &SessionContext::with_db("shop"))?, Datum::from("shop"));
    assert_eq!(expr.eval(&[], &SessionContext::new())?, Datum::Null);
    Ok(())
}

//! scalarexpr - builds, rebalances and rewrites predicate trees

use anyhow::{bail, Context as _, Result};
use clap::{Parser as ClapParser, ValueEnum};
use log::info;
use scalarexpr::ast::{opcode, ResultField};
use scalarexpr::context::SessionContext;
use scalarexpr::expression::{
    compose_cnf_condition, compose_dnf_condition, eval_bool, evaluate_expr_with_null,
    new_function, result_fields_to_schema, split_cnf_items, split_dnf_items, Constant,
    Expression, Schema,
};
use scalarexpr::model::{ColumnInfo, TableInfo};
use scalarexpr::types::{new_field_type, Datum, TypeCode};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Op {
    And,
    Or,
}

/// Compose N column predicates into a balanced tree and show what the
/// optimizer helpers do with it
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of predicates `c_i = i` to compose
    #[arg(short = 'n', long, default_value = "8")]
    conditions: usize,

    /// Operator joining the predicates
    #[arg(short, long, value_enum, default_value = "and")]
    op: Op,

    /// How many leading columns are hypothesised NULL
    #[arg(long, default_value = "1")]
    null_scope: usize,

    /// Print trees as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if args.conditions == 0 {
        bail!("--conditions must be at least 1");
    }
    if args.null_scope > args.conditions {
        bail!(
            "--null-scope {} exceeds the {} available columns",
            args.null_scope,
            args.conditions
        );
    }

    let fields = result_fields(args.conditions);
    let schema = result_fields_to_schema(&fields);
    info!("built schema {}", schema);

    let conditions = schema
        .iter()
        .enumerate()
        .map(|(i, col)| {
            new_function(
                opcode::EQ,
                new_field_type(TypeCode::Tiny),
                vec![col.clone().into(), Constant::int(i as i64).into()],
            )
        })
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to build predicates")?;

    let tree = match args.op {
        Op::And => compose_cnf_condition(conditions),
        Op::Or => compose_dnf_condition(conditions),
    }
    .context("Failed to compose predicates")?
    .context("No predicate to compose")?;

    let op_name = match args.op {
        Op::And => opcode::AND_AND,
        Op::Or => opcode::OR_OR,
    };
    println!("tree:   {}", render(&tree, args.json)?);
    println!("depth:  {}", depth(&tree, op_name));

    let items = match args.op {
        Op::And => split_cnf_items(tree.clone()),
        Op::Or => split_dnf_items(tree.clone()),
    };
    println!("items:  {}", items.len());
    for item in &items {
        println!("  {}", render(item, args.json)?);
    }

    let ctx = SessionContext::with_db("test");
    let row: Vec<Datum> = (0..args.conditions as i64).map(Datum::Int).collect();

    let mut bound = tree.clone();
    bound.resolve_indices(&schema);
    println!("match:  {}", eval_bool(&bound, &row, &ctx)?);

    let null_schema = Schema::new(schema.columns()[..args.null_scope].to_vec());
    let mut nulled = evaluate_expr_with_null(&null_schema, &tree)
        .context("Failed to propagate nulls")?;
    println!("null:   {}", render(&nulled, args.json)?);
    nulled.resolve_indices(&schema);
    println!("null match: {}", eval_bool(&nulled, &row, &ctx)?);

    Ok(())
}

/// One result field `test.t.c_i` per predicate
fn result_fields(n: usize) -> Vec<ResultField> {
    let columns: Vec<ColumnInfo> = (0..n)
        .map(|i| ColumnInfo::new(format!("c{}", i), new_field_type(TypeCode::LongLong), i))
        .collect();
    let table = TableInfo::new("t", columns.clone());
    columns
        .into_iter()
        .map(|col| ResultField::new("test", table.clone(), col))
        .collect()
}

fn render(expr: &Expression, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string(expr)?);
    }
    Ok(expr.to_string())
}

fn depth(expr: &Expression, op_name: &str) -> usize {
    match expr {
        Expression::ScalarFunction(f) if f.func_name.l == op_name => {
            1 + f.args.iter().map(|a| depth(a, op_name)).max().unwrap_or(0)
        }
        _ => 0,
    }
}

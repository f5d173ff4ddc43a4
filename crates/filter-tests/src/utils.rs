use crate::{fixture, registry};
use filter::{CompileOptions, CompiledFilter, Compiler, FilterNode, SqlFilterBuilder};
use model::core::value::Value;
use planner::query::{dialect::Sqlite, renderer::to_sql};
use rusqlite::{Connection, params_from_iter, types::Value as SqlValue};

fn to_sql_value(value: Value) -> SqlValue {
    match value {
        Value::Int(v) => SqlValue::Integer(v),
        Value::Uint(v) => i64::try_from(v)
            .map(SqlValue::Integer)
            .unwrap_or_else(|_| SqlValue::Text(v.to_string())),
        Value::Float(v) => SqlValue::Real(v),
        Value::String(v) => SqlValue::Text(v),
        Value::Boolean(v) => SqlValue::Integer(v as i64),
        Value::Null => SqlValue::Null,
        list @ Value::List(_) => SqlValue::Text(list.to_string()),
    }
}

/// Compiles `filter` against `posts` and renders it for SQLite.
pub fn render(filter: serde_json::Value) -> (String, Vec<Value>, CompiledFilter) {
    let filter = FilterNode::from_json(filter).expect("filter is an object");
    let compiled = Compiler::new(CompileOptions::default())
        .compile_tree("posts", &registry(), &filter)
        .expect("filter compiles");
    let select = compiled.apply(SqlFilterBuilder::new()).into_select("posts");
    let (sql, params) = to_sql(&select, &Sqlite);
    (sql, params, compiled)
}

/// Runs a rendered query and returns the selected post ids in ascending order.
pub fn fetch_ids(conn: &Connection, sql: &str, params: Vec<Value>) -> Vec<i64> {
    let mut stmt = conn
        .prepare(&format!("SELECT id FROM ({sql}) ORDER BY id"))
        .unwrap_or_else(|err| panic!("prepare `{sql}`: {err}"));
    let rows = stmt
        .query_map(params_from_iter(params.into_iter().map(to_sql_value)), |row| {
            row.get::<_, i64>(0)
        })
        .expect("run filtered query");
    rows.collect::<Result<Vec<_>, _>>().expect("read post ids")
}

/// Compiles, renders and runs `filter` on a fresh fixture.
pub fn post_ids(filter: serde_json::Value) -> Vec<i64> {
    let (sql, params, _) = render(filter);
    fetch_ids(&fixture(), &sql, params)
}

pub fn post_count(filter: serde_json::Value) -> usize {
    post_ids(filter).len()
}

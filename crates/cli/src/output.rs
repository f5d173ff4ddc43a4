use crate::error::CliError;
use filter::{CompiledFilter, RelationKind, RelationRegistry};
use model::core::value::Value;
use serde::Serialize;

#[derive(Serialize)]
struct CompileReport<'a> {
    dialect: &'a str,
    sql: &'a str,
    params: &'a [Value],
    compiled: &'a CompiledFilter,
}

pub fn print_json(
    dialect: &str,
    sql: &str,
    params: &[Value],
    compiled: &CompiledFilter,
) -> Result<(), CliError> {
    let report = CompileReport {
        dialect,
        sql,
        params,
        compiled,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn print_sql(sql: &str, params: &[Value], compiled: &CompiledFilter) {
    println!("{sql}");
    if !params.is_empty() {
        println!("-- params:");
        for (i, param) in params.iter().enumerate() {
            println!("--   {:<4} {}", i + 1, param);
        }
    }
    for diagnostic in &compiled.diagnostics {
        println!("-- skipped: {diagnostic}");
    }
}

pub fn print_relations(registry: &RelationRegistry) {
    println!("{:<16} {:<12} {:<16} {}", "Relation", "Kind", "Target", "Link");
    println!("---------------------------------------------------------------");
    for (name, descriptor) in registry.iter() {
        let (kind, link) = match &descriptor.kind {
            RelationKind::OneToMany { foreign_key } => (
                "oneToMany",
                format!("{}.{}", descriptor.target_table, foreign_key),
            ),
            RelationKind::ManyToMany {
                join_table,
                join_from,
                join_to,
            } => (
                "manyToMany",
                format!("{join_table} ({join_from} -> {join_to})"),
            ),
        };
        let target = format!("{}.{}", descriptor.target_table, descriptor.target_key);
        println!("{name:<16} {kind:<12} {target:<16} {link}");
    }
}

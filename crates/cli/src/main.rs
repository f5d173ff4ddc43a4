use crate::error::CliError;
use clap::Parser;
use commands::Commands;
use filter::{CompileOptions, Compiler, FilterNode, RelationRegistry, SqlFilterBuilder};
use planner::query::{dialect, renderer::to_sql};
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

mod commands;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "sieve",
    version = "0.1.0",
    about = "Compile document-style filters into SQL"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), CliError> {
    // Logs go to stderr, stdout carries the SQL
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            target,
            filter,
            filter_file,
            dialect,
            strict,
            marker,
            base_key,
            json,
        } => {
            let registry = load_registry(target.relations.as_deref())?;
            let source = match (filter, filter_file) {
                (Some(inline), _) => inline,
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => return Err(CliError::MissingFilter),
            };
            let filter: FilterNode = source.parse()?;
            let sql_dialect = dialect::by_name(&dialect)
                .ok_or_else(|| CliError::UnsupportedDialect(dialect.clone()))?;

            let options = CompileOptions::default()
                .strict(strict)
                .with_marker(marker)
                .with_base_key(base_key);
            let compiler = Compiler::new(options);

            info!(
                "Compiling filter on `{}` for {} ({} relation(s) registered)",
                target.table,
                sql_dialect.name(),
                registry.len()
            );

            let compiled = compiler.compile_tree(&target.table, &registry, &filter)?;
            let select = compiled
                .apply(SqlFilterBuilder::new())
                .into_select(&target.table);
            let (sql, params) = to_sql(&select, sql_dialect.as_ref());

            if json {
                output::print_json(&sql_dialect.name(), &sql, &params, &compiled)?;
            } else {
                output::print_sql(&sql, &params, &compiled);
            }
        }
        Commands::Relations { relations } => {
            let registry = load_registry(Some(&relations))?;
            info!("Loaded {} relation(s) from {}", registry.len(), relations);
            output::print_relations(&registry);
        }
    }

    Ok(())
}

fn load_registry(path: Option<&str>) -> Result<RelationRegistry, CliError> {
    match path {
        Some(path) => {
            let source = std::fs::read_to_string(path)?;
            Ok(RelationRegistry::from_json(&source)?)
        }
        None => Ok(RelationRegistry::new()),
    }
}

use filter::{FilterError, RegistryError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to load the relation registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("Failed to compile the filter: {0}")]
    Filter(#[from] FilterError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Unsupported SQL dialect: {0}")]
    UnsupportedDialect(String),

    #[error("Either --filter or --filter-file must be given")]
    MissingFilter,
}

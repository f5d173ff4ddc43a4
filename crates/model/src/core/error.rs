use thiserror::Error;

/// Errors raised while converting raw JSON into filter values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("Objects cannot be used as filter values: {0}")]
    Object(String),

    #[error("Nested arrays are not supported as filter values: {0}")]
    NestedArray(String),

    #[error("Number out of range: {0}")]
    Number(String),
}

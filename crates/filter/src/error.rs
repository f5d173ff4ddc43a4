use thiserror::Error;

/// Errors raised while compiling a filter.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A field path points at a table that is neither the base table, a
    /// registered relation nor a registered join table.
    #[error("Unknown relation `{relation}` referenced by field `{field}`")]
    UnknownRelation { relation: String, field: String },

    /// A key inside a comparison object (or in field position) is not a known
    /// operator. Only fatal in strict mode.
    #[error("Unrecognized operator `{operator}` at `{path}`")]
    UnrecognizedOperator { operator: String, path: String },

    /// The filter has the wrong shape at `path`. Only fatal in strict mode,
    /// except for a non-object filter root.
    #[error("Malformed filter at `{path}`: {reason}")]
    MalformedFilter { path: String, reason: String },

    #[error("Failed to parse filter JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while building a relation registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Relation `{0}` is registered twice")]
    DuplicateRelation(String),

    #[error("Join table `{join_table}` is already used by relation `{existing}`, cannot reuse it for `{relation}`")]
    DuplicateJoinTable {
        join_table: String,
        existing: String,
        relation: String,
    },

    #[error("Invalid descriptor for relation `{relation}`: {reason}")]
    InvalidDescriptor { relation: String, reason: String },

    #[error("Failed to parse relation registry JSON: {0}")]
    Json(#[from] serde_json::Error),
}

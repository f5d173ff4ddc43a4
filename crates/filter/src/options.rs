use serde::{Deserialize, Serialize};

/// Knobs for a single compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Turn unknown operators and malformed clauses into errors instead of
    /// skipping them with a diagnostic.
    pub strict: bool,

    /// Prefix reserving a key for operators (`$and`, `$eq`, ...).
    pub marker: char,

    /// Primary key column of the base table, used as the left side of
    /// membership subqueries.
    pub base_key: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            strict: false,
            marker: '$',
            base_key: "id".to_string(),
        }
    }
}

impl CompileOptions {
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_base_key(mut self, base_key: impl Into<String>) -> Self {
        self.base_key = base_key.into();
        self
    }
}

//! The compiled predicate tree handed to a query builder.

use crate::{
    adapter::{FilterBuilder, apply_predicates},
    error::FilterError,
    operator::{Comparator, Connective},
};
use model::core::value::Value;
use serde::Serialize;
use std::fmt;

/// A column qualified by its table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Whether the base key must (or must not) appear in a subquery's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Membership {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "NOT IN")]
    NotIn,
}

impl Membership {
    pub fn is_negated(&self) -> bool {
        matches!(self, Membership::NotIn)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompiledPredicate {
    Comparison {
        connective: Connective,
        column: ColumnRef,
        comparator: Comparator,
        value: Value,
    },
    NullTest {
        connective: Connective,
        column: ColumnRef,
        negated: bool,
    },
    /// A parenthesised scope. `connective` attaches the group to its
    /// siblings, `inner` joins the predicates inside it.
    Group {
        connective: Connective,
        inner: Connective,
        predicates: Vec<CompiledPredicate>,
    },
    /// `<base_column> [NOT] IN (<subquery>)`
    Subquery {
        connective: Connective,
        base_column: ColumnRef,
        membership: Membership,
        subquery: Subquery,
    },
}

impl CompiledPredicate {
    pub fn connective(&self) -> Connective {
        match self {
            CompiledPredicate::Comparison { connective, .. }
            | CompiledPredicate::NullTest { connective, .. }
            | CompiledPredicate::Group { connective, .. }
            | CompiledPredicate::Subquery { connective, .. } => *connective,
        }
    }
}

/// A single-column correlated subquery over a related table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subquery {
    pub select: ColumnRef,
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_join: Option<InnerJoin>,
    /// AND-ed conditions of the `WHERE` clause.
    pub filters: Vec<SubqueryFilter>,
}

/// `INNER JOIN <table> ON <on_left> = <on_right>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InnerJoin {
    pub table: String,
    pub on_left: ColumnRef,
    pub on_right: ColumnRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubqueryFilter {
    Comparison {
        column: ColumnRef,
        comparator: Comparator,
        value: Value,
    },
    NullTest {
        column: ColumnRef,
        negated: bool,
    },
}

impl SubqueryFilter {
    pub fn column(&self) -> &ColumnRef {
        match self {
            SubqueryFilter::Comparison { column, .. } | SubqueryFilter::NullTest { column, .. } => {
                column
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnrecognizedOperator { operator: String },
    MalformedFilter { reason: String },
}

/// A clause that was skipped in lenient mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub path: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn unrecognized_operator(path: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: DiagnosticKind::UnrecognizedOperator {
                operator: operator.into(),
            },
        }
    }

    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: DiagnosticKind::MalformedFilter {
                reason: reason.into(),
            },
        }
    }
}

impl From<Diagnostic> for FilterError {
    fn from(diagnostic: Diagnostic) -> Self {
        match diagnostic.kind {
            DiagnosticKind::UnrecognizedOperator { operator } => FilterError::UnrecognizedOperator {
                operator,
                path: diagnostic.path,
            },
            DiagnosticKind::MalformedFilter { reason } => FilterError::MalformedFilter {
                path: diagnostic.path,
                reason,
            },
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnrecognizedOperator { operator } => {
                write!(f, "unrecognized operator `{operator}` at `{}`", self.path)
            }
            DiagnosticKind::MalformedFilter { reason } => {
                write!(f, "malformed filter at `{}`: {reason}", self.path)
            }
        }
    }
}

/// Result of compiling one filter: the predicates of the top-level scope
/// (AND-ed) plus whatever was skipped on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledFilter {
    pub base_table: String,
    pub predicates: Vec<CompiledPredicate>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompiledFilter {
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Replays the predicates onto `builder`.
    pub fn apply<B: FilterBuilder>(&self, mut builder: B) -> B {
        apply_predicates(&mut builder, &self.predicates);
        builder
    }
}

//! Compiles document-style filters (`{"$or": [{"status": "draft"}, ...]}`)
//! into relational predicates, including correlated membership subqueries for
//! fields that live behind a declared relation.

pub mod adapter;
mod bucket;
pub mod compiler;
pub mod error;
pub mod node;
pub mod operator;
pub mod options;
pub mod predicate;
pub mod relation;
pub mod resolver;
pub mod sql;

pub use adapter::{FilterBuilder, SubqueryBuilder};
pub use compiler::Compiler;
pub use error::{FilterError, RegistryError};
pub use node::FilterNode;
pub use operator::{ComparisonOp, Comparator, Connective};
pub use options::CompileOptions;
pub use predicate::{
    ColumnRef, CompiledFilter, CompiledPredicate, Diagnostic, DiagnosticKind, InnerJoin,
    Membership, Subquery, SubqueryFilter,
};
pub use relation::{RelationDescriptor, RelationKind, RelationRegistry};
pub use sql::{SqlFilterBuilder, SqlSubquery, select_filtered};

/// Compiles `filter` against `base_table` with default options and applies the
/// resulting predicates to `builder`.
///
/// Nothing is applied when compilation fails.
pub fn compile<B: FilterBuilder>(
    base_table: &str,
    registry: &RelationRegistry,
    filter: &FilterNode,
    builder: B,
) -> Result<B, FilterError> {
    Compiler::default().compile(base_table, registry, filter, builder)
}

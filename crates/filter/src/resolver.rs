//! Resolves dotted field paths against the base table and the relation
//! registry.

use crate::{
    error::FilterError,
    predicate::ColumnRef,
    relation::{RelationDescriptor, RelationRegistry},
};

/// A field path that crosses into a related table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRef<'r> {
    /// Name of the owning relation, also for join-table references.
    pub relation: &'r str,
    pub column: String,
    pub descriptor: &'r RelationDescriptor,
    /// The column lives on the join table rather than the target table.
    pub on_join_table: bool,
}

impl RelationRef<'_> {
    /// The table the column is read from inside the subquery.
    pub fn table(&self) -> &str {
        if self.on_join_table {
            self.descriptor
                .join_table()
                .unwrap_or(&self.descriptor.target_table)
        } else {
            &self.descriptor.target_table
        }
    }

    pub fn column_ref(&self) -> ColumnRef {
        ColumnRef::new(self.table(), &self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedField<'r> {
    Local(ColumnRef),
    Relation(RelationRef<'r>),
}

/// Resolves `path` (e.g. `title`, `posts.title`, `tags.slug`,
/// `posts_tags.sort_order`) relative to `base_table`.
pub fn resolve_field<'r>(
    path: &str,
    base_table: &str,
    registry: &'r RelationRegistry,
) -> Result<ResolvedField<'r>, FilterError> {
    let Some((head, rest)) = path.split_once('.') else {
        if path.is_empty() {
            return Err(malformed(path, "field name is empty"));
        }
        return Ok(ResolvedField::Local(ColumnRef::new(base_table, path)));
    };

    if head.is_empty() || rest.is_empty() || rest.split('.').any(str::is_empty) {
        return Err(malformed(path, "field path has an empty segment"));
    }

    if head == base_table {
        return Ok(ResolvedField::Local(ColumnRef::new(base_table, rest)));
    }

    if let Some((relation, descriptor)) = registry.lookup(head) {
        return Ok(ResolvedField::Relation(RelationRef {
            relation,
            column: rest.to_string(),
            descriptor,
            on_join_table: false,
        }));
    }

    if let Some((relation, descriptor)) = registry.by_join_table(head) {
        return Ok(ResolvedField::Relation(RelationRef {
            relation,
            column: rest.to_string(),
            descriptor,
            on_join_table: true,
        }));
    }

    Err(FilterError::UnknownRelation {
        relation: head.to_string(),
        field: path.to_string(),
    })
}

fn malformed(path: &str, reason: &str) -> FilterError {
    FilterError::MalformedFilter {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

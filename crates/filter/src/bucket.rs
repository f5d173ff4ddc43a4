//! Groups the relation predicates of one scope into membership subqueries.
//!
//! Relation predicates are not emitted where they appear. They wait in the
//! bucket of their relation until the scope closes, and are then split into
//! partitions. Every partition becomes one `base.id [NOT] IN (subquery)`
//! test, so two AND-ed conditions on the same relation never have to be met
//! by a single related row.

use crate::{
    operator::{Comparator, ComparisonOp, Connective},
    predicate::{ColumnRef, CompiledPredicate, InnerJoin, Membership, Subquery, SubqueryFilter},
    relation::{RelationDescriptor, RelationKind},
    resolver::RelationRef,
};
use model::core::value::Value;
use tracing::debug;

/// A relation predicate waiting for its scope to close.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingRelationPredicate<'r> {
    pub target: RelationRef<'r>,
    pub op: ComparisonOp,
    pub value: Value,
    pub connective: Connective,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Positive predicate on a join-table column. It narrows the link row of
    /// whichever partition it joins.
    Qualifier,
    /// Positive predicate on a target-table column.
    Positive,
    /// `$ne` / `$nin`, on either table.
    Negated,
}

impl PendingRelationPredicate<'_> {
    fn role(&self) -> Role {
        if self.op.is_negated() {
            Role::Negated
        } else if self.target.on_join_table {
            Role::Qualifier
        } else {
            Role::Positive
        }
    }

    /// Ordering key that does not depend on where the predicate appeared.
    fn sort_key(&self) -> (String, &'static str, String) {
        (
            self.target.column_ref().to_string(),
            self.op.token(),
            self.value.to_string(),
        )
    }

    /// The condition as it appears inside the subquery. Negated operators are
    /// flipped here; the negation moves to the outer `NOT IN`.
    fn subquery_filter(&self) -> SubqueryFilter {
        let column = self.target.column_ref();
        if self.value.is_null() {
            return SubqueryFilter::NullTest {
                column,
                negated: false,
            };
        }

        let (comparator, value) = match self.op {
            ComparisonOp::Ne => (Comparator::In, Value::List(vec![self.value.clone()])),
            ComparisonOp::Nin => (Comparator::In, self.value.clone()),
            op => (op.comparator(), self.value.clone()),
        };
        SubqueryFilter::Comparison {
            column,
            comparator,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    /// Only qualifiers so far.
    Neutral,
    Positive,
    Negated,
}

#[derive(Debug)]
struct Partition<'a, 'r> {
    polarity: Polarity,
    /// Predicates with their input position.
    predicates: Vec<(usize, &'a PendingRelationPredicate<'r>)>,
}

impl<'a, 'r> Partition<'a, 'r> {
    fn open(index: usize, predicate: &'a PendingRelationPredicate<'r>, role: Role) -> Self {
        let polarity = match role {
            Role::Qualifier => Polarity::Neutral,
            Role::Positive => Polarity::Positive,
            Role::Negated => Polarity::Negated,
        };
        Self {
            polarity,
            predicates: vec![(index, predicate)],
        }
    }

    fn constrains(&self, column: &ColumnRef) -> bool {
        self.predicates
            .iter()
            .any(|(_, predicate)| predicate.target.column_ref() == *column)
    }

    fn takes(&self, polarity: Polarity, predicate: &PendingRelationPredicate<'_>) -> bool {
        self.polarity == polarity && !self.constrains(&predicate.target.column_ref())
    }

    fn first_index(&self) -> usize {
        self.predicates.first().map_or(usize::MAX, |(index, _)| *index)
    }

    fn membership(&self) -> Membership {
        match self.polarity {
            Polarity::Negated => Membership::NotIn,
            Polarity::Neutral | Polarity::Positive => Membership::In,
        }
    }
}

/// Splits the predicates of one relation into partitions.
///
/// In an AND scope the assignment ignores input order. Predicates are visited
/// sorted by column, operator and operand: positives first (each joins the
/// first positive partition whose column is free), then negated ones (one
/// partition each), then qualifiers, which join the first positive partition
/// with a free column, else the first negated one, else a qualifier-only
/// partition. Partitions and their conditions are then put back in input
/// order.
fn partition<'a, 'r>(
    connective: Connective,
    pending: &'a [PendingRelationPredicate<'r>],
) -> Vec<Partition<'a, 'r>> {
    if connective == Connective::Or {
        return pending
            .iter()
            .enumerate()
            .map(|(index, predicate)| Partition::open(index, predicate, predicate.role()))
            .collect();
    }

    let mut order: Vec<usize> = (0..pending.len()).collect();
    order.sort_by_cached_key(|&index| pending[index].sort_key());

    let mut partitions: Vec<Partition<'a, 'r>> = Vec::new();
    for role in [Role::Positive, Role::Negated, Role::Qualifier] {
        for &index in &order {
            let predicate = &pending[index];
            if predicate.role() != role {
                continue;
            }

            let find = |polarity: Polarity| {
                partitions
                    .iter()
                    .position(|partition| partition.takes(polarity, predicate))
            };
            let slot = match role {
                Role::Positive => find(Polarity::Positive),
                Role::Negated => None,
                Role::Qualifier => find(Polarity::Positive)
                    .or_else(|| find(Polarity::Negated))
                    .or_else(|| find(Polarity::Neutral)),
            };

            match slot {
                Some(slot) => partitions[slot].predicates.push((index, predicate)),
                None => partitions.push(Partition::open(index, predicate, role)),
            }
        }
    }

    for partition in &mut partitions {
        partition.predicates.sort_by_key(|(index, _)| *index);
    }
    partitions.sort_by_key(Partition::first_index);
    partitions
}

fn build_subquery(
    descriptor: &RelationDescriptor,
    filters: Vec<SubqueryFilter>,
    membership: Membership,
) -> Subquery {
    let target = &descriptor.target_table;
    match &descriptor.kind {
        RelationKind::ManyToMany {
            join_table,
            join_from,
            join_to,
        } => Subquery {
            select: ColumnRef::new(join_table, join_from),
            from: join_table.clone(),
            inner_join: Some(InnerJoin {
                table: target.clone(),
                on_left: ColumnRef::new(target, &descriptor.target_key),
                on_right: ColumnRef::new(join_table, join_to),
            }),
            filters,
        },
        RelationKind::OneToMany { foreign_key } => {
            let mut filters = filters;
            // `NOT IN` over a list holding NULL matches nothing.
            if membership.is_negated() {
                filters.push(SubqueryFilter::NullTest {
                    column: ColumnRef::new(target, foreign_key),
                    negated: true,
                });
            }
            Subquery {
                select: ColumnRef::new(target, foreign_key),
                from: target.clone(),
                inner_join: None,
                filters,
            }
        }
    }
}

/// Relation name → pending predicates, in order of first appearance.
#[derive(Debug, Default)]
pub(crate) struct RelationBuckets<'r> {
    buckets: Vec<(&'r str, Vec<PendingRelationPredicate<'r>>)>,
}

impl<'r> RelationBuckets<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, predicate: PendingRelationPredicate<'r>) {
        let relation = predicate.target.relation;
        match self.buckets.iter_mut().find(|(name, _)| *name == relation) {
            Some((_, pending)) => pending.push(predicate),
            None => self.buckets.push((relation, vec![predicate])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Drains every bucket into subquery predicates for a scope joined by
    /// `connective`.
    pub fn flush(
        &mut self,
        connective: Connective,
        base_column: &ColumnRef,
    ) -> Vec<CompiledPredicate> {
        let mut emitted = Vec::new();

        for (relation, pending) in std::mem::take(&mut self.buckets) {
            let Some(first) = pending.first() else {
                continue;
            };
            let descriptor = first.target.descriptor;
            let partitions = partition(connective, &pending);

            debug!(
                "Flushing {} predicate(s) on relation `{}` into {} subquery(ies)",
                pending.len(),
                relation,
                partitions.len()
            );

            for partition in partitions {
                let membership = partition.membership();
                let connective = partition
                    .predicates
                    .first()
                    .map_or(connective, |(_, predicate)| predicate.connective);
                let filters = partition
                    .predicates
                    .iter()
                    .map(|(_, predicate)| predicate.subquery_filter())
                    .collect();

                emitted.push(CompiledPredicate::Subquery {
                    connective,
                    base_column: base_column.clone(),
                    membership,
                    subquery: build_subquery(descriptor, filters, membership),
                });
            }
        }

        emitted
    }
}

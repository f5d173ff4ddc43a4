//! The seam between the compiler and whatever builds the final query.
//!
//! A compiled filter is replayed onto a [`FilterBuilder`] one primitive at a
//! time, mirroring the calls a fluent query builder exposes (`where`,
//! `orWhere`, `whereNull`, grouped callbacks, `whereIn` with a subquery).

use crate::{
    operator::{Comparator, Connective},
    predicate::{ColumnRef, CompiledPredicate, Membership, Subquery, SubqueryFilter},
};
use model::core::value::Value;

/// Builds the single-column subquery of a membership test.
pub trait SubqueryBuilder {
    fn select(&mut self, column: &ColumnRef) -> &mut Self;
    fn from(&mut self, table: &str) -> &mut Self;
    fn inner_join(&mut self, table: &str, on_left: &ColumnRef, on_right: &ColumnRef) -> &mut Self;
    /// Conditions are AND-ed.
    fn where_comparison(
        &mut self,
        column: &ColumnRef,
        comparator: Comparator,
        value: &Value,
    ) -> &mut Self;
    fn where_null(&mut self, column: &ColumnRef, negated: bool) -> &mut Self;
}

pub trait FilterBuilder {
    type Subquery: SubqueryBuilder;

    fn add_comparison(
        &mut self,
        connective: Connective,
        column: &ColumnRef,
        comparator: Comparator,
        value: &Value,
    );

    fn add_null_test(&mut self, connective: Connective, column: &ColumnRef, negated: bool);

    /// Builds a parenthesised group through `build` and attaches it with
    /// `connective`. Predicates added inside the group carry `inner`.
    fn open_group<F>(&mut self, connective: Connective, inner: Connective, build: F)
    where
        F: FnOnce(&mut Self);

    /// A fresh, empty subquery.
    fn subquery(&self) -> Self::Subquery;

    fn add_subquery_membership(
        &mut self,
        connective: Connective,
        base_column: &ColumnRef,
        membership: Membership,
        subquery: Self::Subquery,
    );
}

pub(crate) fn apply_predicates<B: FilterBuilder>(builder: &mut B, predicates: &[CompiledPredicate]) {
    for predicate in predicates {
        match predicate {
            CompiledPredicate::Comparison {
                connective,
                column,
                comparator,
                value,
            } => builder.add_comparison(*connective, column, *comparator, value),
            CompiledPredicate::NullTest {
                connective,
                column,
                negated,
            } => builder.add_null_test(*connective, column, *negated),
            CompiledPredicate::Group {
                connective,
                inner,
                predicates,
            } => builder.open_group(*connective, *inner, |group| {
                apply_predicates(group, predicates)
            }),
            CompiledPredicate::Subquery {
                connective,
                base_column,
                membership,
                subquery,
            } => {
                let mut target = builder.subquery();
                build_subquery(&mut target, subquery);
                builder.add_subquery_membership(*connective, base_column, *membership, target);
            }
        }
    }
}

fn build_subquery<S: SubqueryBuilder>(target: &mut S, subquery: &Subquery) {
    target.select(&subquery.select).from(&subquery.from);
    if let Some(join) = &subquery.inner_join {
        target.inner_join(&join.table, &join.on_left, &join.on_right);
    }
    for filter in &subquery.filters {
        match filter {
            SubqueryFilter::Comparison {
                column,
                comparator,
                value,
            } => target.where_comparison(column, *comparator, value),
            SubqueryFilter::NullTest { column, negated } => target.where_null(column, *negated),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::InnerJoin;

    /// Records every builder call as a line of text.
    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<String>,
        depth: usize,
    }

    impl Recorder {
        fn log(&mut self, call: String) {
            self.calls.push(format!("{}{call}", "  ".repeat(self.depth)));
        }
    }

    impl SubqueryBuilder for Vec<String> {
        fn select(&mut self, column: &ColumnRef) -> &mut Self {
            self.push(format!("select {column}"));
            self
        }

        fn from(&mut self, table: &str) -> &mut Self {
            self.push(format!("from {table}"));
            self
        }

        fn inner_join(&mut self, table: &str, on_left: &ColumnRef, on_right: &ColumnRef) -> &mut Self {
            self.push(format!("join {table} on {on_left} = {on_right}"));
            self
        }

        fn where_comparison(
            &mut self,
            column: &ColumnRef,
            comparator: Comparator,
            value: &Value,
        ) -> &mut Self {
            self.push(format!("where {column} {comparator} {value}"));
            self
        }

        fn where_null(&mut self, column: &ColumnRef, negated: bool) -> &mut Self {
            self.push(format!("where {column} null={}", !negated));
            self
        }
    }

    impl FilterBuilder for Recorder {
        type Subquery = Vec<String>;

        fn add_comparison(
            &mut self,
            connective: Connective,
            column: &ColumnRef,
            comparator: Comparator,
            value: &Value,
        ) {
            self.log(format!("{connective} {column} {comparator} {value}"));
        }

        fn add_null_test(&mut self, connective: Connective, column: &ColumnRef, negated: bool) {
            self.log(format!("{connective} {column} null={}", !negated));
        }

        fn open_group<F>(&mut self, connective: Connective, inner: Connective, build: F)
        where
            F: FnOnce(&mut Self),
        {
            self.log(format!("{connective} group({inner})"));
            self.depth += 1;
            build(&mut *self);
            self.depth -= 1;
        }

        fn subquery(&self) -> Self::Subquery {
            Vec::new()
        }

        fn add_subquery_membership(
            &mut self,
            connective: Connective,
            base_column: &ColumnRef,
            membership: Membership,
            subquery: Self::Subquery,
        ) {
            self.log(format!(
                "{connective} {base_column} {membership:?} [{}]",
                subquery.join("; ")
            ));
        }
    }

    #[test]
    fn test_replays_predicates_in_order() {
        let predicates = vec![
            CompiledPredicate::Comparison {
                connective: Connective::And,
                column: ColumnRef::new("posts", "featured"),
                comparator: Comparator::Eq,
                value: Value::Boolean(true),
            },
            CompiledPredicate::Group {
                connective: Connective::And,
                inner: Connective::Or,
                predicates: vec![
                    CompiledPredicate::NullTest {
                        connective: Connective::Or,
                        column: ColumnRef::new("posts", "image"),
                        negated: true,
                    },
                    CompiledPredicate::Subquery {
                        connective: Connective::Or,
                        base_column: ColumnRef::new("posts", "id"),
                        membership: Membership::NotIn,
                        subquery: Subquery {
                            select: ColumnRef::new("posts_tags", "post_id"),
                            from: "posts_tags".to_string(),
                            inner_join: Some(InnerJoin {
                                table: "tags".to_string(),
                                on_left: ColumnRef::new("tags", "id"),
                                on_right: ColumnRef::new("posts_tags", "tag_id"),
                            }),
                            filters: vec![SubqueryFilter::Comparison {
                                column: ColumnRef::new("tags", "slug"),
                                comparator: Comparator::In,
                                value: Value::from(vec!["animal"]),
                            }],
                        },
                    },
                ],
            },
        ];

        let mut recorder = Recorder::default();
        apply_predicates(&mut recorder, &predicates);

        assert_eq!(
            recorder.calls,
            vec![
                "and posts.featured = true",
                "and group(or)",
                "  or posts.image null=false",
                "  or posts.id NotIn [select posts_tags.post_id; from posts_tags; join tags on tags.id = posts_tags.tag_id; where tags.slug IN ('animal')]",
            ]
        );
    }
}

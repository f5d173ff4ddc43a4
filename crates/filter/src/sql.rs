//! [`FilterBuilder`] over the `planner` SQL AST.

use crate::{
    adapter::{FilterBuilder, SubqueryBuilder},
    compiler::Compiler,
    error::FilterError,
    node::FilterNode,
    operator::{Comparator, Connective},
    predicate::{ColumnRef, Membership},
    relation::RelationRegistry,
};
use model::core::value::Value;
use planner::{
    ident,
    query::{
        ast::{
            common::{JoinKind, TableRef},
            expr::{BinaryOperator, Expr},
            select::Select,
        },
        builder::{
            condition::{ConditionBuilder, Conjunction},
            select::SelectBuilder,
        },
    },
    table_ref, value,
};
use tracing::warn;

fn column(column: &ColumnRef) -> Expr {
    ident!(column.table, column.column)
}

fn conjunction(connective: Connective) -> Conjunction {
    match connective {
        Connective::And => Conjunction::And,
        Connective::Or => Conjunction::Or,
    }
}

fn comparison(column_ref: &ColumnRef, comparator: Comparator, val: &Value) -> Expr {
    let op = match comparator {
        Comparator::Eq => BinaryOperator::Eq,
        Comparator::NotEq => BinaryOperator::NotEq,
        Comparator::Gt => BinaryOperator::Gt,
        Comparator::GtEq => BinaryOperator::GtEq,
        Comparator::Lt => BinaryOperator::Lt,
        Comparator::LtEq => BinaryOperator::LtEq,
        Comparator::In | Comparator::NotIn => {
            let list = val
                .clone()
                .into_list()
                .into_iter()
                .map(|item| value!(item))
                .collect();
            return Expr::in_list(column(column_ref), list, comparator == Comparator::NotIn);
        }
    };
    Expr::binary(column(column_ref), op, value!(val.clone()))
}

/// Accumulates a `WHERE` clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFilterBuilder {
    conditions: ConditionBuilder,
}

impl SqlFilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The accumulated condition, if any predicate was added.
    pub fn build(self) -> Option<Expr> {
        self.conditions.build()
    }

    /// `SELECT <base_table>.* FROM <base_table> [WHERE ...]`
    pub fn into_select(self, base_table: &str) -> Select {
        SelectBuilder::new()
            .select(vec![Expr::Wildcard {
                qualifier: Some(base_table.to_string()),
            }])
            .from(table_ref!(base_table), None)
            .where_opt(self.build())
            .build()
    }
}

impl FilterBuilder for SqlFilterBuilder {
    type Subquery = SqlSubquery;

    fn add_comparison(
        &mut self,
        connective: Connective,
        column: &ColumnRef,
        comparator: Comparator,
        value: &Value,
    ) {
        self.conditions
            .push(conjunction(connective), comparison(column, comparator, value));
    }

    fn add_null_test(&mut self, connective: Connective, column_ref: &ColumnRef, negated: bool) {
        self.conditions.push(
            conjunction(connective),
            Expr::is_null(column(column_ref), negated),
        );
    }

    fn open_group<F>(&mut self, connective: Connective, _inner: Connective, build: F)
    where
        F: FnOnce(&mut Self),
    {
        self.conditions.group(conjunction(connective), |conditions| {
            let mut nested = SqlFilterBuilder {
                conditions: std::mem::take(conditions),
            };
            build(&mut nested);
            *conditions = nested.conditions;
        });
    }

    fn subquery(&self) -> Self::Subquery {
        SqlSubquery::default()
    }

    fn add_subquery_membership(
        &mut self,
        connective: Connective,
        base_column: &ColumnRef,
        membership: Membership,
        subquery: Self::Subquery,
    ) {
        let Some(select) = subquery.build() else {
            warn!(
                "Subquery for `{}` has no FROM clause. Skipping membership test.",
                base_column
            );
            return;
        };
        self.conditions.push(
            conjunction(connective),
            Expr::in_subquery(column(base_column), select, membership.is_negated()),
        );
    }
}

/// Collects the parts of a membership subquery until it is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlSubquery {
    select: Option<Expr>,
    from: Option<TableRef>,
    joins: Vec<(TableRef, Expr)>,
    conditions: ConditionBuilder,
}

impl SqlSubquery {
    /// `None` when no table was given.
    pub fn build(self) -> Option<Select> {
        let from = self.from?;
        let columns = self.select.into_iter().collect();

        let mut builder = SelectBuilder::new().select(columns).from(from, None);
        for (table, on) in self.joins {
            builder = builder.join(JoinKind::Inner, table, None, on);
        }
        Some(builder.where_opt(self.conditions.build()).build())
    }
}

impl SubqueryBuilder for SqlSubquery {
    fn select(&mut self, column_ref: &ColumnRef) -> &mut Self {
        self.select = Some(column(column_ref));
        self
    }

    fn from(&mut self, table: &str) -> &mut Self {
        self.from = Some(table_ref!(table));
        self
    }

    fn inner_join(&mut self, table: &str, on_left: &ColumnRef, on_right: &ColumnRef) -> &mut Self {
        let on = Expr::binary(column(on_left), BinaryOperator::Eq, column(on_right));
        self.joins.push((table_ref!(table), on));
        self
    }

    fn where_comparison(
        &mut self,
        column: &ColumnRef,
        comparator: Comparator,
        value: &Value,
    ) -> &mut Self {
        self.conditions.and_where(comparison(column, comparator, value));
        self
    }

    fn where_null(&mut self, column_ref: &ColumnRef, negated: bool) -> &mut Self {
        self.conditions
            .and_where(Expr::is_null(column(column_ref), negated));
        self
    }
}

/// Compiles `filter` and wraps it into `SELECT <base_table>.* FROM <base_table> WHERE ...`.
pub fn select_filtered(
    base_table: &str,
    registry: &RelationRegistry,
    filter: &FilterNode,
) -> Result<Select, FilterError> {
    let builder = Compiler::default().compile(base_table, registry, filter, SqlFilterBuilder::new())?;
    Ok(builder.into_select(base_table))
}

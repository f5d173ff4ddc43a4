//! Accumulates `WHERE` predicates the way a fluent query builder does:
//! every predicate is attached with its own connective (`where` / `orWhere`),
//! and groups are built in a nested builder and attached as one parenthesised
//! predicate.

use crate::query::ast::expr::{BinaryOperator, Expr};

/// How a predicate is attached to the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    And,
    Or,
}

impl From<Conjunction> for BinaryOperator {
    fn from(conjunction: Conjunction) -> Self {
        match conjunction {
            Conjunction::And => BinaryOperator::And,
            Conjunction::Or => BinaryOperator::Or,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionBuilder {
    predicates: Vec<(Conjunction, Expr)>,
}

impl ConditionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate joined to the previous ones by `conjunction`.
    /// The conjunction of the very first predicate is ignored.
    pub fn push(&mut self, conjunction: Conjunction, expr: Expr) -> &mut Self {
        self.predicates.push((conjunction, expr));
        self
    }

    pub fn and_where(&mut self, expr: Expr) -> &mut Self {
        self.push(Conjunction::And, expr)
    }

    pub fn or_where(&mut self, expr: Expr) -> &mut Self {
        self.push(Conjunction::Or, expr)
    }

    /// Builds a group in a fresh builder and attaches it as a single
    /// parenthesised predicate. Empty groups are dropped.
    pub fn group<F>(&mut self, conjunction: Conjunction, build: F) -> &mut Self
    where
        F: FnOnce(&mut ConditionBuilder),
    {
        let mut inner = ConditionBuilder::new();
        build(&mut inner);
        if let Some(expr) = inner.build() {
            self.push(conjunction, Expr::nested(expr));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Folds the accumulated predicates left to right into one expression.
    pub fn build(self) -> Option<Expr> {
        let mut iter = self.predicates.into_iter();
        let (_, first) = iter.next()?;
        Some(iter.fold(first, |left, (conjunction, right)| {
            Expr::binary(left, conjunction.into(), right)
        }))
    }
}

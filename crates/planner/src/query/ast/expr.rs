//! Defines the AST for SQL expressions.

use crate::query::ast::select::Select;
use model::core::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column or table identifier, e.g., `posts` or `posts.id`.
    Identifier(Ident),

    /// A literal value, such as a string, number, boolean, or NULL.
    Value(Value),

    /// A binary operation, e.g., `column = 'value'` or `a AND b`.
    BinaryOp(Box<BinaryOp>),

    /// `*` or `posts.*`
    Wildcard { qualifier: Option<String> },

    /// `expr [NOT] IN (a, b, c)`
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },

    /// `expr [NOT] IN (SELECT ...)`
    InSubquery {
        expr: Box<Expr>,
        subquery: Box<Select>,
        negated: bool,
    },

    /// `expr IS [NOT] NULL`
    IsNull { expr: Box<Expr>, negated: bool },

    /// A parenthesised sub-expression, e.g. `(a OR b)`.
    Nested(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub qualifier: Option<String>, // e.g., the 'posts' in 'posts.id'
    pub name: String,              // e.g., the 'id' in 'posts.id'
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub left: Expr,
    pub op: BinaryOperator,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,    // =
    NotEq, // <>
    Lt,    // <
    LtEq,  // <=
    Gt,    // >
    GtEq,  // >=

    // Logical
    And,
    Or,
}

impl Expr {
    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
        Expr::BinaryOp(Box::new(BinaryOp { left, op, right }))
    }

    pub fn is_null(expr: Expr, negated: bool) -> Expr {
        Expr::IsNull {
            expr: Box::new(expr),
            negated,
        }
    }

    pub fn in_list(expr: Expr, list: Vec<Expr>, negated: bool) -> Expr {
        Expr::InList {
            expr: Box::new(expr),
            list,
            negated,
        }
    }

    pub fn in_subquery(expr: Expr, subquery: Select, negated: bool) -> Expr {
        Expr::InSubquery {
            expr: Box::new(expr),
            subquery: Box::new(subquery),
            negated,
        }
    }

    pub fn nested(expr: Expr) -> Expr {
        Expr::Nested(Box::new(expr))
    }
}

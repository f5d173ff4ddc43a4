use crate::query::ast::expr::{Expr, Ident};

pub mod ast;
pub mod builder;
pub mod dialect;
pub mod macros;
pub mod renderer;

/// A column reference qualified by its table, e.g. `posts.id`.
pub fn qualified(table: &str, column: &str) -> Expr {
    Expr::Identifier(Ident {
        qualifier: Some(table.to_string()),
        name: column.to_string(),
    })
}

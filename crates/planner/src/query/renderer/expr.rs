use model::core::value::Value;

use crate::query::{
    ast::expr::{BinaryOp, BinaryOperator, Expr, Ident},
    renderer::{Render, Renderer},
};

impl Render for Expr {
    fn render(&self, r: &mut Renderer) {
        match self {
            Expr::Identifier(ident) => ident.render(r),
            Expr::Value(Value::List(items)) => {
                r.sql.push('(');
                render_values(items, r);
                r.sql.push(')');
            }
            Expr::Value(val) => r.add_param(val.clone()),
            Expr::BinaryOp(op) => op.render(r),
            Expr::Wildcard { qualifier } => {
                if let Some(qualifier) = qualifier {
                    r.sql.push_str(&r.dialect.quote_identifier(qualifier));
                    r.sql.push('.');
                }
                r.sql.push('*');
            }
            Expr::InList {
                expr,
                list,
                negated,
            } => {
                // `x IN ()` is not valid SQL; an empty list matches nothing
                // and an empty exclusion list matches everything.
                if list.is_empty() {
                    r.sql.push_str(if *negated { "(1 = 1)" } else { "(1 = 0)" });
                    return;
                }
                expr.render(r);
                r.sql.push_str(if *negated { " NOT IN (" } else { " IN (" });
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        r.sql.push_str(", ");
                    }
                    item.render(r);
                }
                r.sql.push(')');
            }
            Expr::InSubquery {
                expr,
                subquery,
                negated,
            } => {
                expr.render(r);
                r.sql.push_str(if *negated { " NOT IN (" } else { " IN (" });
                subquery.render(r);
                r.sql.push(')');
            }
            Expr::IsNull { expr, negated } => {
                expr.render(r);
                r.sql
                    .push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Expr::Nested(inner) => {
                // Binary operations already carry their own parentheses.
                if matches!(**inner, Expr::BinaryOp(_)) {
                    inner.render(r);
                } else {
                    r.sql.push('(');
                    inner.render(r);
                    r.sql.push(')');
                }
            }
        }
    }
}

fn render_values(items: &[Value], r: &mut Renderer) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            r.sql.push_str(", ");
        }
        r.add_param(item.clone());
    }
}

impl Render for Ident {
    fn render(&self, r: &mut Renderer) {
        if let Some(qualifier) = &self.qualifier {
            r.sql.push_str(&r.dialect.quote_identifier(qualifier));
            r.sql.push('.');
        }
        r.sql.push_str(&r.dialect.quote_identifier(&self.name));
    }
}

impl Render for BinaryOp {
    fn render(&self, r: &mut Renderer) {
        r.sql.push('(');
        self.left.render(r);

        let op_str = match self.op {
            BinaryOperator::Eq => " = ",
            BinaryOperator::NotEq => " <> ",
            BinaryOperator::Lt => " < ",
            BinaryOperator::LtEq => " <= ",
            BinaryOperator::Gt => " > ",
            BinaryOperator::GtEq => " >= ",
            BinaryOperator::And => " AND ",
            BinaryOperator::Or => " OR ",
        };
        r.sql.push_str(op_str);

        self.right.render(r);
        r.sql.push(')');
    }
}

//! Classifies filter keys into logical connectives, comparison operators and
//! field names.

use serde::Serialize;
use std::fmt;

/// Boolean connective joining predicates within a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn token(&self) -> &'static str {
        match self {
            Connective::And => "and",
            Connective::Or => "or",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token {
            "and" => Some(Connective::And),
            "or" => Some(Connective::Or),
            _ => None,
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Comparison operators accepted inside a comparison object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
}

impl ComparisonOp {
    pub const ALL: [ComparisonOp; 8] = [
        ComparisonOp::Eq,
        ComparisonOp::Ne,
        ComparisonOp::Gt,
        ComparisonOp::Gte,
        ComparisonOp::Lt,
        ComparisonOp::Lte,
        ComparisonOp::In,
        ComparisonOp::Nin,
    ];

    /// The operator name without the reserved marker.
    pub fn token(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "eq",
            ComparisonOp::Ne => "ne",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Gte => "gte",
            ComparisonOp::Lt => "lt",
            ComparisonOp::Lte => "lte",
            ComparisonOp::In => "in",
            ComparisonOp::Nin => "nin",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        ComparisonOp::ALL.into_iter().find(|op| op.token() == token)
    }

    pub fn comparator(&self) -> Comparator {
        match self {
            ComparisonOp::Eq => Comparator::Eq,
            ComparisonOp::Ne => Comparator::NotEq,
            ComparisonOp::Gt => Comparator::Gt,
            ComparisonOp::Gte => Comparator::GtEq,
            ComparisonOp::Lt => Comparator::Lt,
            ComparisonOp::Lte => Comparator::LtEq,
            ComparisonOp::In => Comparator::In,
            ComparisonOp::Nin => Comparator::NotIn,
        }
    }

    /// `$ne` and `$nin` exclude rather than select.
    pub fn is_negated(&self) -> bool {
        matches!(self, ComparisonOp::Ne | ComparisonOp::Nin)
    }

    /// `$in` and `$nin` take a list operand.
    pub fn takes_list(&self) -> bool {
        matches!(self, ComparisonOp::In | ComparisonOp::Nin)
    }

    /// `$gt`, `$gte`, `$lt`, `$lte`.
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            ComparisonOp::Gt | ComparisonOp::Gte | ComparisonOp::Lt | ComparisonOp::Lte
        )
    }
}

/// Relational comparator emitted to the query builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Comparator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "NOT IN")]
    NotIn,
}

impl Comparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::NotEq => "!=",
            Comparator::Gt => ">",
            Comparator::GtEq => ">=",
            Comparator::Lt => "<",
            Comparator::LtEq => "<=",
            Comparator::In => "IN",
            Comparator::NotIn => "NOT IN",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a key in a filter mapping stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind<'a> {
    Logical(Connective),
    Comparison(ComparisonOp),
    /// Carries the reserved marker but names no known operator.
    UnknownOperator(&'a str),
    Field(&'a str),
}

/// Key classifier for one reserved marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    marker: char,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new('$')
    }
}

impl Classifier {
    pub fn new(marker: char) -> Self {
        Self { marker }
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    pub fn is_operator(&self, key: &str) -> bool {
        key.starts_with(self.marker)
    }

    pub fn is_logical(&self, key: &str) -> bool {
        matches!(self.classify(key), KeyKind::Logical(_))
    }

    pub fn is_comparison(&self, key: &str) -> bool {
        matches!(self.classify(key), KeyKind::Comparison(_))
    }

    pub fn classify<'a>(&self, key: &'a str) -> KeyKind<'a> {
        let Some(token) = key.strip_prefix(self.marker) else {
            return KeyKind::Field(key);
        };

        if let Some(connective) = Connective::parse(token) {
            KeyKind::Logical(connective)
        } else if let Some(op) = ComparisonOp::parse(token) {
            KeyKind::Comparison(op)
        } else {
            KeyKind::UnknownOperator(key)
        }
    }

    /// Maps a marked comparison key (`$gte`) to its comparator, if known.
    pub fn comparator_for(&self, key: &str) -> Option<Comparator> {
        match self.classify(key) {
            KeyKind::Comparison(op) => Some(op.comparator()),
            _ => None,
        }
    }
}

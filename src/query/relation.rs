use std::fmt;

use super::{identifier::Identifier, operator::Operator, term::Term};

/// One clause of a WHERE conjunction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `a = 1`, `a IN (1, 2)`, `a CONTAINS 'x'`, `a IS NOT NULL`
    SingleColumn {
        entity: Identifier,
        operator: Operator,
        value: Term,
    },
    /// `(a, b) = (1, 2)`, `(a, b) IN ((1, 2), (3, 4))`
    MultiColumn {
        entities: Vec<Identifier>,
        operator: Operator,
        value: Term,
    },
    /// `token(a, b) > 10`
    Token {
        entities: Vec<Identifier>,
        operator: Operator,
        value: Term,
    },
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::SingleColumn {
                entity,
                operator,
                value,
            } => write!(f, "{} {} {}", entity, operator, value),
            Relation::MultiColumn {
                entities,
                operator,
                value,
            } => write!(f, "({}) {} {}", join(entities), operator, value),
            Relation::Token {
                entities,
                operator,
                value,
            } => write!(f, "token({}) {} {}", join(entities), operator, value),
        }
    }
}

fn join(ids: &[Identifier]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

impl Relation {
    pub fn new(entity: Identifier, operator: Operator, value: Term) -> Self {
        Relation::SingleColumn {
            entity,
            operator,
            value,
        }
    }

    pub fn operator(&self) -> Operator {
        match self {
            Relation::SingleColumn { operator, .. }
            | Relation::MultiColumn { operator, .. }
            | Relation::Token { operator, .. } => *operator,
        }
    }

    pub fn value(&self) -> &Term {
        match self {
            Relation::SingleColumn { value, .. }
            | Relation::MultiColumn { value, .. }
            | Relation::Token { value, .. } => value,
        }
    }

    /// Columns referenced on the left-hand side, in the order written.
    pub fn columns(&self) -> Vec<&Identifier> {
        match self {
            Relation::SingleColumn { entity, .. } => vec![entity],
            Relation::MultiColumn { entities, .. } | Relation::Token { entities, .. } => {
                entities.iter().collect()
            }
        }
    }

    pub fn applies_to(&self, column: &Identifier) -> bool {
        self.columns().contains(&column)
    }

    /// Returns a copy with every occurrence of `from` replaced by `to`. The
    /// kind, operator and value are kept as they are.
    pub fn rename_identifier(&self, from: &Identifier, to: &Identifier) -> Relation {
        let rename = |id: &Identifier| if id == from { to.clone() } else { id.clone() };
        match self {
            Relation::SingleColumn {
                entity,
                operator,
                value,
            } => Relation::SingleColumn {
                entity: rename(entity),
                operator: *operator,
                value: value.clone(),
            },
            Relation::MultiColumn {
                entities,
                operator,
                value,
            } => Relation::MultiColumn {
                entities: entities.iter().map(rename).collect(),
                operator: *operator,
                value: value.clone(),
            },
            Relation::Token {
                entities,
                operator,
                value,
            } => Relation::Token {
                entities: entities.iter().map(rename).collect(),
                operator: *operator,
                value: value.clone(),
            },
        }
    }
}

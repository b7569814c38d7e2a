use std::fmt;

use super::{constant::Constant, identifier::Identifier};

/// Right-hand side of a relation. Terms never reference columns, so a column
/// rename leaves them untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Literal(Constant),
    Tuple(Vec<Term>),
    FunctionCall { name: Identifier, args: Vec<Term> },
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Literal(c) => write!(f, "{}", c),
            Term::Tuple(items) => write!(f, "({})", join(items)),
            Term::FunctionCall { name, args } => write!(f, "{}({})", name, join(args)),
        }
    }
}

fn join(terms: &[Term]) -> String {
    terms
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

impl Term {
    pub fn new_from_val(val: Constant) -> Self {
        Term::Literal(val)
    }
}

#[cfg(test)]
mod tests {
    use crate::query::{constant::Constant, identifier::Identifier};

    use super::Term;

    #[test]
    fn test_display() {
        let t = Term::Tuple(vec![
            Term::new_from_val(Constant::new_from_i64(1)),
            Term::FunctionCall {
                name: Identifier::new("now"),
                args: vec![],
            },
            Term::Tuple(vec![Term::new_from_val(Constant::new_from_string("a"))]),
        ]);
        assert_eq!("(1, now(), ('a'))", t.to_string());
    }
}

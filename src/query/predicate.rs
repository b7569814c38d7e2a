use std::fmt;

use crate::parse::{grammar::GrammarEngine, lexer::SyntaxError};

use super::{identifier::Identifier, relation::Relation};

/// A conjunction of relations: the structured form of a WHERE clause.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Predicate {
    relations: Vec<Relation>,
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let content = self
            .relations
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<String>>()
            .join(" AND ");

        write!(f, "{}", content)
    }
}

impl Predicate {
    pub fn new() -> Self {
        Predicate {
            relations: Vec::new(),
        }
    }

    pub fn new_from_relations(relations: Vec<Relation>) -> Self {
        Predicate { relations }
    }

    /// Decodes predicate text through `grammar`.
    pub fn from_text<G: GrammarEngine + ?Sized>(
        grammar: &G,
        text: &str,
    ) -> Result<Self, SyntaxError> {
        Ok(Predicate::new_from_relations(grammar.parse_predicate(text)?))
    }

    /// Encodes the relations back to canonical predicate text.
    pub fn to_text<G: GrammarEngine + ?Sized>(&self, grammar: &G) -> String {
        grammar.render_predicate(&self.relations)
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Distinct referenced columns, in order of first appearance.
    pub fn columns(&self) -> Vec<&Identifier> {
        let mut ret: Vec<&Identifier> = Vec::new();
        for id in self.relations.iter().flat_map(|r| r.columns()) {
            if !ret.contains(&id) {
                ret.push(id);
            }
        }
        ret
    }
}

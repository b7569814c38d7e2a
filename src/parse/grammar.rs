use crate::query::{identifier::Identifier, predicate::Predicate, relation::Relation};

use super::{lexer::SyntaxError, parser::Parser, select_statement::SelectStatement};

/// What the view core needs from a query grammar: decode predicate text,
/// print relations canonically, and decode a full select statement.
pub trait GrammarEngine {
    fn parse_predicate(&self, text: &str) -> Result<Vec<Relation>, SyntaxError>;

    fn render_predicate(&self, relations: &[Relation]) -> String;

    fn parse_statement(&self, text: &str) -> Result<SelectStatement, SyntaxError>;
}

/// The built-in CQL-flavoured grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct CqlGrammar;

impl CqlGrammar {
    /// Parses a single, possibly quoted, identifier such as `col` or `"Col"`.
    pub fn parse_identifier(&self, text: &str) -> Result<Identifier, SyntaxError> {
        let mut parser = Parser::new(text)?;
        let id = parser.identifier()?;
        parser.end()?;
        Ok(id)
    }
}

impl GrammarEngine for CqlGrammar {
    fn parse_predicate(&self, text: &str) -> Result<Vec<Relation>, SyntaxError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut parser = Parser::new(text)?;
        let pred = parser.predicate()?;
        parser.end()?;
        Ok(pred.relations().to_vec())
    }

    fn render_predicate(&self, relations: &[Relation]) -> String {
        Predicate::new_from_relations(relations.to_vec()).to_string()
    }

    fn parse_statement(&self, text: &str) -> Result<SelectStatement, SyntaxError> {
        let mut parser = Parser::new(text)?;
        let stmt = parser.query()?;
        parser.end()?;
        Ok(stmt)
    }
}

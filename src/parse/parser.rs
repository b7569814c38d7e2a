use crate::query::{
    constant::Constant, identifier::Identifier, operator::Operator, predicate::Predicate,
    relation::Relation, term::Term,
};

use super::{
    lexer::{Lexer, SyntaxError},
    select_statement::{SelectStatement, Selection},
};

#[derive(Debug)]
pub struct Parser<'a> {
    lex: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Result<Self, SyntaxError> {
        Ok(Parser {
            lex: Lexer::new(s)?,
        })
    }

    pub fn identifier(&mut self) -> Result<Identifier, SyntaxError> {
        self.lex.eat_id()
    }

    pub fn constant(&mut self) -> Result<Constant, SyntaxError> {
        if self.lex.match_string_constant() {
            Ok(Constant::new_from_string(self.lex.eat_string_constant()?))
        } else if self.lex.match_int_constant() {
            Ok(Constant::new_from_i64(self.lex.eat_int_constant()?))
        } else if self.lex.match_decimal_constant() {
            Ok(Constant::new_from_decimal(self.lex.eat_decimal_constant()?))
        } else if self.lex.match_keyword("true") {
            self.lex.eat_keyword("true")?;
            Ok(Constant::Bool(true))
        } else if self.lex.match_keyword("false") {
            self.lex.eat_keyword("false")?;
            Ok(Constant::Bool(false))
        } else if self.lex.match_keyword("null") {
            self.lex.eat_keyword("null")?;
            Ok(Constant::Null)
        } else {
            Err(self.lex.unexpected("a constant"))
        }
    }

    pub fn term(&mut self) -> Result<Term, SyntaxError> {
        if self.lex.match_delim('(') {
            self.lex.eat_delim('(')?;
            return Ok(Term::Tuple(self.term_list()?));
        }
        if self.lex.match_id() {
            let pos = self.lex.position();
            let name = self.identifier()?;
            if !self.lex.match_delim('(') {
                return Err(SyntaxError::new(
                    pos,
                    format!("column {} is not allowed on the right-hand side", name),
                ));
            }
            self.lex.eat_delim('(')?;
            let args = self.term_list()?;
            return Ok(Term::FunctionCall { name, args });
        }
        Ok(Term::new_from_val(self.constant()?))
    }

    // expects the opening '(' to be consumed already
    fn term_list(&mut self) -> Result<Vec<Term>, SyntaxError> {
        let mut ret = Vec::new();
        if self.lex.match_delim(')') {
            self.lex.eat_delim(')')?;
            return Ok(ret);
        }
        loop {
            ret.push(self.term()?);
            if self.lex.match_delim(',') {
                self.lex.eat_delim(',')?;
            } else {
                break;
            }
        }
        self.lex.eat_delim(')')?;

        Ok(ret)
    }

    fn tuple_literal(&mut self) -> Result<Term, SyntaxError> {
        if !self.lex.match_delim('(') {
            return Err(self.lex.unexpected("'('"));
        }
        self.term()
    }

    fn identifier_list(&mut self) -> Result<Vec<Identifier>, SyntaxError> {
        let mut ret = vec![self.identifier()?];
        while self.lex.match_delim(',') {
            self.lex.eat_delim(',')?;
            ret.push(self.identifier()?);
        }

        Ok(ret)
    }

    fn single_column_operation(&mut self) -> Result<(Operator, Term), SyntaxError> {
        if self.lex.match_comparison() {
            let operator = self.lex.eat_comparison()?;
            Ok((operator, self.term()?))
        } else if self.lex.match_keyword("in") {
            self.lex.eat_keyword("in")?;
            Ok((Operator::In, self.tuple_literal()?))
        } else if self.lex.match_keyword("contains") {
            self.lex.eat_keyword("contains")?;
            let operator = if self.lex.match_keyword("key") {
                self.lex.eat_keyword("key")?;
                Operator::ContainsKey
            } else {
                Operator::Contains
            };
            Ok((operator, self.term()?))
        } else if self.lex.match_keyword("like") {
            self.lex.eat_keyword("like")?;
            Ok((Operator::Like, self.term()?))
        } else if self.lex.match_keyword("is") {
            self.lex.eat_keyword("is")?;
            self.lex.eat_keyword("not")?;
            self.lex.eat_keyword("null")?;
            Ok((Operator::IsNot, Term::new_from_val(Constant::Null)))
        } else {
            Err(self.lex.unexpected("an operator"))
        }
    }

    pub fn relation(&mut self) -> Result<Relation, SyntaxError> {
        if self.lex.match_keyword("token") {
            self.lex.eat_keyword("token")?;
            self.lex.eat_delim('(')?;
            let entities = self.identifier_list()?;
            self.lex.eat_delim(')')?;
            let operator = self.lex.eat_comparison()?;
            let value = self.term()?;
            return Ok(Relation::Token {
                entities,
                operator,
                value,
            });
        }

        if self.lex.match_delim('(') {
            self.lex.eat_delim('(')?;
            let entities = self.identifier_list()?;
            self.lex.eat_delim(')')?;
            let operator = if self.lex.match_keyword("in") {
                self.lex.eat_keyword("in")?;
                Operator::In
            } else {
                self.lex.eat_comparison()?
            };
            let value = self.tuple_literal()?;
            return Ok(Relation::MultiColumn {
                entities,
                operator,
                value,
            });
        }

        let entity = self.identifier()?;
        let (operator, value) = self.single_column_operation()?;
        Ok(Relation::new(entity, operator, value))
    }

    pub fn predicate(&mut self) -> Result<Predicate, SyntaxError> {
        let mut relations = vec![self.relation()?];
        while self.lex.match_keyword("and") {
            self.lex.eat_keyword("and")?;
            relations.push(self.relation()?);
        }

        Ok(Predicate::new_from_relations(relations))
    }

    pub fn query(&mut self) -> Result<SelectStatement, SyntaxError> {
        self.lex.eat_keyword("select")?;
        let selection = if self.lex.match_delim('*') {
            self.lex.eat_delim('*')?;
            Selection::Wildcard
        } else {
            Selection::Columns(self.identifier_list()?)
        };
        self.lex.eat_keyword("from")?;
        let first = self.identifier()?;
        let (keyspace, table) = if self.lex.match_delim('.') {
            self.lex.eat_delim('.')?;
            (Some(first), self.identifier()?)
        } else {
            (None, first)
        };
        let mut pred = Predicate::new();
        if self.lex.match_keyword("where") {
            self.lex.eat_keyword("where")?;
            pred = self.predicate()?;
        }
        let mut allow_filtering = false;
        if self.lex.match_keyword("allow") {
            self.lex.eat_keyword("allow")?;
            self.lex.eat_keyword("filtering")?;
            allow_filtering = true;
        }

        Ok(SelectStatement::new(
            selection,
            keyspace,
            table,
            pred,
            allow_filtering,
        ))
    }

    /// Accepts an optional trailing ';' and rejects anything after it.
    pub fn end(&mut self) -> Result<(), SyntaxError> {
        if self.lex.match_delim(';') {
            self.lex.eat_delim(';')?;
        }
        if !self.lex.is_at_end() {
            return Err(self.lex.unexpected("end of input"));
        }
        Ok(())
    }
}

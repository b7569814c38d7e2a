use std::collections::HashSet;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

use crate::query::{identifier::Identifier, operator::Operator};

/// Words the lexer never hands out as plain identifiers. A column whose name
/// collides with one of these has to be written double-quoted.
pub(crate) const KEYWORDS: [&str; 16] = [
    "select", "from", "where", "and", "in", "contains", "key", "is", "not", "null", "like",
    "allow", "filtering", "token", "true", "false",
];

pub(crate) fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word.to_lowercase().as_str())
}

#[derive(Debug)]
pub struct Lexer<'a> {
    keywords: HashSet<&'a str>,
    input: Peekable<Chars<'a>>,
    pos: usize,
    token_pos: usize,
    current_token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Delim(char),
    Comparison(Operator),
    IntConstant(i64),
    /// Kept as written, e.g. `-0.50`.
    DecimalConstant(String),
    StringConstant(String),
    Keyword(String),
    Id(String),
    QuotedId(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Delim(c) => write!(f, "'{}'", c),
            Token::Comparison(op) => write!(f, "'{}'", op),
            Token::IntConstant(i) => write!(f, "integer {}", i),
            Token::DecimalConstant(d) => write!(f, "decimal {}", d),
            Token::StringConstant(s) => write!(f, "string '{}'", s),
            Token::Keyword(kw) => write!(f, "keyword {}", kw.to_uppercase()),
            Token::Id(id) => write!(f, "identifier {}", id),
            Token::QuotedId(id) => write!(f, "identifier \"{}\"", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at position {position}: {message}")]
pub struct SyntaxError {
    pub position: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        SyntaxError {
            position,
            message: message.into(),
        }
    }
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Result<Self, SyntaxError> {
        let mut lexer = Lexer {
            keywords: HashSet::from(KEYWORDS),
            input: input.chars().peekable(),
            pos: 0,
            token_pos: 0,
            current_token: None,
        };
        lexer.next_token()?;
        Ok(lexer)
    }

    /// Character offset of the current token.
    pub fn position(&self) -> usize {
        self.token_pos
    }

    pub fn is_at_end(&self) -> bool {
        self.current_token.is_none()
    }

    pub fn match_delim(&self, d: char) -> bool {
        if let Some(Token::Delim(c)) = &self.current_token {
            *c == d
        } else {
            false
        }
    }

    pub fn match_comparison(&self) -> bool {
        matches!(&self.current_token, Some(Token::Comparison(_)))
    }

    pub fn match_int_constant(&self) -> bool {
        matches!(&self.current_token, Some(Token::IntConstant(_)))
    }

    pub fn match_decimal_constant(&self) -> bool {
        matches!(&self.current_token, Some(Token::DecimalConstant(_)))
    }

    pub fn match_string_constant(&self) -> bool {
        matches!(&self.current_token, Some(Token::StringConstant(_)))
    }

    pub fn match_keyword(&self, w: &str) -> bool {
        if let Some(Token::Keyword(kw)) = &self.current_token {
            kw == w
        } else {
            false
        }
    }

    pub fn match_id(&self) -> bool {
        match &self.current_token {
            Some(Token::Id(id)) => !self.keywords.contains(id.as_str()),
            Some(Token::QuotedId(_)) => true,
            _ => false,
        }
    }

    pub fn eat_delim(&mut self, d: char) -> Result<(), SyntaxError> {
        if !self.match_delim(d) {
            return Err(self.unexpected(&format!("'{}'", d)));
        }
        self.next_token()
    }

    pub fn eat_comparison(&mut self) -> Result<Operator, SyntaxError> {
        if let Some(Token::Comparison(op)) = self.current_token {
            self.next_token()?;
            Ok(op)
        } else {
            Err(self.unexpected("a comparison operator"))
        }
    }

    pub fn eat_int_constant(&mut self) -> Result<i64, SyntaxError> {
        if let Some(Token::IntConstant(i)) = self.current_token {
            self.next_token()?;
            Ok(i)
        } else {
            Err(self.unexpected("an integer"))
        }
    }

    pub fn eat_decimal_constant(&mut self) -> Result<String, SyntaxError> {
        if !self.match_decimal_constant() {
            return Err(self.unexpected("a decimal"));
        }
        if let Some(Token::DecimalConstant(d)) = self.current_token.take() {
            self.next_token()?;
            Ok(d)
        } else {
            Err(self.unexpected("a decimal"))
        }
    }

    pub fn eat_string_constant(&mut self) -> Result<String, SyntaxError> {
        if !self.match_string_constant() {
            return Err(self.unexpected("a string"));
        }
        if let Some(Token::StringConstant(s)) = self.current_token.take() {
            self.next_token()?;
            Ok(s)
        } else {
            Err(self.unexpected("a string"))
        }
    }

    pub fn eat_keyword(&mut self, w: &str) -> Result<(), SyntaxError> {
        if !self.match_keyword(w) {
            return Err(self.unexpected(&w.to_uppercase()));
        }
        self.next_token()
    }

    /// Unquoted identifiers are case-insensitive and fold to lower case,
    /// quoted ones are kept verbatim.
    pub fn eat_id(&mut self) -> Result<Identifier, SyntaxError> {
        if !self.match_id() {
            return Err(self.unexpected("an identifier"));
        }
        match self.current_token.take() {
            Some(Token::Id(id)) => {
                self.next_token()?;
                Ok(Identifier::new(id.to_lowercase()))
            }
            Some(Token::QuotedId(id)) => {
                self.next_token()?;
                Ok(Identifier::new(id))
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    pub fn unexpected(&self, expected: &str) -> SyntaxError {
        let found = match &self.current_token {
            Some(token) => token.to_string(),
            None => "end of input".to_string(),
        };
        SyntaxError::new(self.token_pos, format!("expected {}, found {}", expected, found))
    }

    fn next_token(&mut self) -> Result<(), SyntaxError> {
        self.current_token = self.read_token()?;
        Ok(())
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.input.next();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn read_token(&mut self) -> Result<Option<Token>, SyntaxError> {
        self.skip_whitespace();
        self.token_pos = self.pos;
        if let Some(&c) = self.input.peek() {
            match c {
                '\'' => self.read_string_constant().map(Some),
                '"' => self.read_quoted_id().map(Some),
                '0'..='9' => self.read_number(false).map(Some),
                'a'..='z' | 'A'..='Z' | '_' => Ok(Some(self.read_word())),
                _ => self.read_delim(),
            }
        } else {
            Ok(None)
        }
    }

    fn read_string_constant(&mut self) -> Result<Token, SyntaxError> {
        self.bump(); // opening quote
        let mut s = String::new();
        while let Some(c) = self.bump() {
            if c == '\'' {
                // '' is an escaped quote inside the literal
                if self.input.peek() == Some(&'\'') {
                    self.bump();
                    s.push('\'');
                    continue;
                }
                return Ok(Token::StringConstant(s));
            }
            s.push(c);
        }
        Err(SyntaxError::new(self.token_pos, "unterminated string constant"))
    }

    fn read_quoted_id(&mut self) -> Result<Token, SyntaxError> {
        self.bump(); // opening quote
        let mut s = String::new();
        while let Some(c) = self.bump() {
            if c == '"' {
                if self.input.peek() == Some(&'"') {
                    self.bump();
                    s.push('"');
                    continue;
                }
                if s.is_empty() {
                    return Err(SyntaxError::new(self.token_pos, "empty quoted identifier"));
                }
                return Ok(Token::QuotedId(s));
            }
            s.push(c);
        }
        Err(SyntaxError::new(
            self.token_pos,
            "unterminated quoted identifier",
        ))
    }

    /// Integer or decimal constant. A '.' after the integer part must be
    /// followed by at least one digit.
    fn read_number(&mut self, negative: bool) -> Result<Token, SyntaxError> {
        let mut text = String::new();
        if negative {
            text.push('-');
        }
        self.read_digits(&mut text);
        if self.input.peek() != Some(&'.') {
            let token_pos = self.token_pos;
            return text
                .parse::<i64>()
                .map(Token::IntConstant)
                .map_err(|_| SyntaxError::new(token_pos, "integer constant out of range"));
        }
        self.bump();
        text.push('.');
        let int_len = text.len();
        self.read_digits(&mut text);
        if text.len() == int_len {
            return Err(SyntaxError::new(self.pos, "expected digits after '.'"));
        }
        Ok(Token::DecimalConstant(text))
    }

    fn read_digits(&mut self, text: &mut String) {
        while let Some(&c) = self.input.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            text.push(c);
            self.bump();
        }
    }

    fn read_word(&mut self) -> Token {
        let mut word = String::new();
        while let Some(&c) = self.input.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if self.keywords.contains(word.to_lowercase().as_str()) {
            Token::Keyword(word.to_lowercase())
        } else {
            Token::Id(word)
        }
    }

    fn read_delim(&mut self) -> Result<Option<Token>, SyntaxError> {
        let Some(c) = self.bump() else {
            return Ok(None);
        };
        let next = self.input.peek().copied();
        let token = match (c, next) {
            ('-', Some('0'..='9')) => return self.read_number(true).map(Some),
            ('=', _) => Token::Comparison(Operator::Eq),
            ('<', Some('=')) => {
                self.bump();
                Token::Comparison(Operator::Lte)
            }
            ('>', Some('=')) => {
                self.bump();
                Token::Comparison(Operator::Gte)
            }
            ('!', Some('=')) => {
                self.bump();
                Token::Comparison(Operator::Neq)
            }
            ('<', _) => Token::Comparison(Operator::Lt),
            ('>', _) => Token::Comparison(Operator::Gt),
            _ => Token::Delim(c),
        };
        Ok(Some(token))
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.input.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {

    use super::{Lexer, SyntaxError};
    use crate::query::{identifier::Identifier, operator::Operator};

    #[test]
    fn test_lexer1() {
        let s = "a_b = 111";
        let mut lex = Lexer::new(s).unwrap();
        assert!(lex.match_id());
        let x = lex.eat_id().unwrap();
        assert_eq!(Operator::Eq, lex.eat_comparison().unwrap());
        let y = lex.eat_int_constant().unwrap();
        assert_eq!(Identifier::new("a_b"), x);
        assert_eq!(111, y);
        assert!(lex.is_at_end());
    }

    #[test]
    fn test_lexer2() {
        let s = "-222 <= c_d";
        let mut lex = Lexer::new(s).unwrap();
        let y = lex.eat_int_constant().unwrap();
        assert_eq!(Operator::Lte, lex.eat_comparison().unwrap());
        let x = lex.eat_id().unwrap();
        assert_eq!(-222, y);
        assert_eq!("c_d", x.as_str());
    }

    #[test]
    fn test_lexer_decimal() {
        let mut lex = Lexer::new("1.5 -0.25 9223372036854775808.0 -9223372036854775808").unwrap();
        assert!(lex.match_decimal_constant());
        assert_eq!("1.5", lex.eat_decimal_constant().unwrap());
        assert_eq!("-0.25", lex.eat_decimal_constant().unwrap());
        assert_eq!("9223372036854775808.0", lex.eat_decimal_constant().unwrap());
        assert_eq!(i64::MIN, lex.eat_int_constant().unwrap());
        assert!(lex.is_at_end());
    }

    #[test]
    fn test_lexer_identifier_case() {
        let mut lex = Lexer::new("MixedCase \"MixedCase\" \"with \"\"quote\"\"\"").unwrap();
        assert_eq!("mixedcase", lex.eat_id().unwrap().as_str());
        assert_eq!("MixedCase", lex.eat_id().unwrap().as_str());
        assert_eq!("with \"quote\"", lex.eat_id().unwrap().as_str());
    }

    #[test]
    fn test_lexer_keywords_are_not_ids() {
        let mut lex = Lexer::new("AND x").unwrap();
        assert!(!lex.match_id());
        assert!(lex.match_keyword("and"));
        lex.eat_keyword("and").unwrap();
        assert!(lex.match_id());
    }

    #[test]
    fn test_lexer_string_escape() {
        let mut lex = Lexer::new("'it''s'").unwrap();
        assert_eq!("it's", lex.eat_string_constant().unwrap());
    }

    #[test]
    fn test_lexer_errors() {
        assert_eq!(
            SyntaxError::new(4, "unterminated string constant"),
            Lexer::new("a = 'oops").and_then(|mut l| {
                l.eat_id()?;
                l.eat_comparison()?;
                l.eat_string_constant()
            }).unwrap_err()
        );
        assert!(Lexer::new("\"\"").is_err());
        assert!(Lexer::new("99999999999999999999").is_err());
        assert_eq!(
            SyntaxError::new(2, "expected digits after '.'"),
            Lexer::new("1. ").unwrap_err()
        );

        let mut lex = Lexer::new("a b").unwrap();
        lex.eat_id().unwrap();
        let err = lex.eat_comparison().unwrap_err();
        assert_eq!(2, err.position);
    }
}

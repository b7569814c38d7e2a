use std::fmt;

use crate::parse::lexer::is_keyword;

/// A column (or table) name exactly as stored. Comparison is exact: `foo`
/// and `Foo` are different identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    text: String,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cql_string())
    }
}

impl From<&str> for Identifier {
    fn from(text: &str) -> Self {
        Identifier::new(text)
    }
}

impl From<String> for Identifier {
    fn from(text: String) -> Self {
        Identifier::new(text)
    }
}

impl Identifier {
    pub fn new(text: impl Into<String>) -> Self {
        Identifier { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Renders the identifier so that lexing it again yields the same text.
    /// Anything other than a plain lower-case word is double-quoted.
    pub fn to_cql_string(&self) -> String {
        if Self::is_unquoted_safe(&self.text) {
            self.text.clone()
        } else {
            format!("\"{}\"", self.text.replace('"', "\"\""))
        }
    }

    fn is_unquoted_safe(text: &str) -> bool {
        let mut chars = text.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        (first.is_ascii_lowercase() || first == '_')
            && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            && !is_keyword(text)
    }
}

#[cfg(test)]
mod tests {
    use super::Identifier;

    #[test]
    fn test_to_cql_string() {
        assert_eq!("col_a1", Identifier::new("col_a1").to_cql_string());
        assert_eq!("\"ColA\"", Identifier::new("ColA").to_cql_string());
        assert_eq!("\"key\"", Identifier::new("key").to_cql_string());
        assert_eq!("\"a b\"", Identifier::new("a b").to_cql_string());
        assert_eq!("\"say \"\"hi\"\"\"", Identifier::new("say \"hi\"").to_cql_string());
        assert_eq!("\"1st\"", Identifier::new("1st").to_cql_string());
    }

    #[test]
    fn test_exact_comparison() {
        assert_ne!(Identifier::new("Foo"), Identifier::new("foo"));
        assert_eq!(Identifier::from("foo"), Identifier::new("foo".to_string()));
    }
}

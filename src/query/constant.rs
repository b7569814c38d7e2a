#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    Int(i64),
    /// Decimal literal kept as written, so it prints back unchanged.
    Decimal(String),
    Text(String),
    Bool(bool),
    Null,
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Int(i) => write!(f, "{}", i),
            Constant::Decimal(d) => write!(f, "{}", d),
            Constant::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::Null => write!(f, "NULL"),
        }
    }
}

impl Constant {
    pub fn new_from_i64(ival: i64) -> Self {
        Constant::Int(ival)
    }

    pub fn new_from_decimal(dval: impl Into<String>) -> Self {
        Constant::Decimal(dval.into())
    }

    pub fn new_from_string(sval: impl Into<String>) -> Self {
        Constant::Text(sval.into())
    }
}

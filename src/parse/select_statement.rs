use core::fmt;

use crate::query::{identifier::Identifier, predicate::Predicate};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    Wildcard,
    Columns(Vec<Identifier>),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Selection::Wildcard => write!(f, "*"),
            Selection::Columns(cols) => write!(
                f,
                "{}",
                cols.iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<String>>()
                    .join(", ")
            ),
        }
    }
}

/// Parsed form of a view's defining query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectStatement {
    selection: Selection,
    keyspace: Option<Identifier>,
    table: Identifier,
    where_clause: Predicate,
    allow_filtering: bool,
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SELECT {} FROM ", self.selection)?;
        if let Some(ks) = &self.keyspace {
            write!(f, "{}.", ks)?;
        }
        write!(f, "{}", self.table)?;
        if !self.where_clause.is_empty() {
            write!(f, " WHERE {}", self.where_clause)?;
        }
        if self.allow_filtering {
            write!(f, " ALLOW FILTERING")?;
        }
        Ok(())
    }
}

impl SelectStatement {
    pub fn new(
        selection: Selection,
        keyspace: Option<Identifier>,
        table: Identifier,
        where_clause: Predicate,
        allow_filtering: bool,
    ) -> Self {
        SelectStatement {
            selection,
            keyspace,
            table,
            where_clause,
            allow_filtering,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn keyspace(&self) -> Option<&Identifier> {
        self.keyspace.as_ref()
    }

    pub fn table(&self) -> &Identifier {
        &self.table
    }

    pub fn where_clause(&self) -> &Predicate {
        &self.where_clause
    }

    pub fn allow_filtering(&self) -> bool {
        self.allow_filtering
    }
}

use std::fmt;

use crate::query::identifier::Identifier;

use super::data_type::DataType;

/// Where a column sits in the table. Positions of partition key and
/// clustering columns are significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    PartitionKey(usize),
    Clustering(usize),
    Regular,
    Static,
}

impl ColumnKind {
    pub fn is_primary_key(&self) -> bool {
        matches!(self, ColumnKind::PartitionKey(_) | ColumnKind::Clustering(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnDefinition {
    name: Identifier,
    kind: ColumnKind,
    data_type: DataType,
}

impl fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        if self.kind == ColumnKind::Static {
            write!(f, " static")?;
        }
        Ok(())
    }
}

impl ColumnDefinition {
    pub fn new(name: Identifier, kind: ColumnKind, data_type: DataType) -> Self {
        ColumnDefinition {
            name,
            kind,
            data_type,
        }
    }

    pub fn name(&self) -> &Identifier {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn with_name(&self, name: Identifier) -> Self {
        ColumnDefinition {
            name,
            kind: self.kind,
            data_type: self.data_type,
        }
    }
}

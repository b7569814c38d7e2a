use thiserror::Error;

use crate::query::identifier::Identifier;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("unknown column {0}")]
    UnknownColumn(Identifier),

    #[error("column {0} already exists")]
    ColumnExists(Identifier),

    #[error("column {0} is defined twice")]
    DuplicateColumn(Identifier),

    #[error("column name must not be empty")]
    EmptyColumnName,

    #[error("unknown data type {0}")]
    UnknownDataType(String),
}

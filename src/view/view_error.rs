use thiserror::Error;

use crate::{
    metadata::metadata_error::MetadataError, parse::lexer::SyntaxError,
    query::identifier::Identifier,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("invalid where clause: {0}")]
    InvalidWhereClause(SyntaxError),

    /// Text that was generated or previously accepted no longer parses.
    #[error("{context}: {source}")]
    Internal {
        context: &'static str,
        #[source]
        source: SyntaxError,
    },

    #[error("where clause references column {column} which is not part of the view")]
    ConsistencyViolation { column: Identifier },
}

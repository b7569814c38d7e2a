use std::{
    fmt,
    hash::{Hash, Hasher},
};

use tracing::{debug, info, warn};

use crate::{
    metadata::{
        schema_registry::{RegistryError, SchemaRegistry},
        table_metadata::{TableId, TableMetadata},
    },
    parse::{
        grammar::{CqlGrammar, GrammarEngine},
        select_statement::SelectStatement,
    },
    query::{identifier::Identifier, predicate::Predicate, rewriter::RelationRewriter},
};

use super::{select_builder::build_select_statement, view_error::ViewError};

const WHERE_CLAUSE_CONTEXT: &str =
    "unexpected error parsing materialized view's where clause while handling column rename";
const SELECT_CONTEXT: &str = "unexpected error parsing materialized view's select statement";

/// Definition of a materialized view over one base table.
///
/// `where_clause` is the source of truth for the filter; `select` is always
/// the parse of the query text generated from the base table name, the
/// view's columns and `where_clause`.
#[derive(Debug, Clone)]
pub struct ViewDefinition {
    keyspace_name: String,
    view_name: String,
    base_table_id: TableId,
    base_table_name: String,
    include_all_columns: bool,
    metadata: TableMetadata,
    where_clause: String,
    select: SelectStatement,
}

// base_table_name and select are derived data and take no part in identity
impl PartialEq for ViewDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.keyspace_name == other.keyspace_name
            && self.view_name == other.view_name
            && self.base_table_id == other.base_table_id
            && self.include_all_columns == other.include_all_columns
            && self.where_clause == other.where_clause
            && self.metadata == other.metadata
    }
}

impl Eq for ViewDefinition {}

impl Hash for ViewDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.keyspace_name.hash(state);
        self.view_name.hash(state);
        self.base_table_id.hash(state);
        self.include_all_columns.hash(state);
        self.where_clause.hash(state);
        self.metadata.hash(state);
    }
}

impl fmt::Display for ViewDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ViewDefinition{{keyspace_name={}, view_name={}, base_table_id={}, base_table_name={}, include_all_columns={}, where_clause={}, metadata={}}}",
            self.keyspace_name,
            self.view_name,
            self.base_table_id,
            self.base_table_name,
            self.include_all_columns,
            self.where_clause,
            self.metadata
        )
    }
}

impl ViewDefinition {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        keyspace_name: impl Into<String>,
        view_name: impl Into<String>,
        base_table_id: TableId,
        base_table_name: impl Into<String>,
        include_all_columns: bool,
        select: SelectStatement,
        where_clause: impl Into<String>,
        metadata: TableMetadata,
    ) -> Self {
        ViewDefinition {
            keyspace_name: keyspace_name.into(),
            view_name: view_name.into(),
            base_table_id,
            base_table_name: base_table_name.into(),
            include_all_columns,
            metadata,
            where_clause: where_clause.into(),
            select,
        }
    }

    /// Builds a view over `base` from user-supplied predicate text. The text
    /// is stored in canonical form and the select statement derived from it.
    pub fn create<G: GrammarEngine + ?Sized>(
        grammar: &G,
        view_name: impl Into<String>,
        base: &TableMetadata,
        include_all_columns: bool,
        metadata: TableMetadata,
        where_clause: &str,
    ) -> Result<Self, ViewError> {
        let predicate =
            Predicate::from_text(grammar, where_clause).map_err(ViewError::InvalidWhereClause)?;
        let (where_clause, select) =
            derive_select(grammar, base.name(), &metadata, &predicate)?;

        Ok(ViewDefinition::new(
            base.keyspace(),
            view_name,
            base.id(),
            base.name(),
            include_all_columns,
            select,
            where_clause,
            metadata,
        ))
    }

    pub fn keyspace_name(&self) -> &str {
        &self.keyspace_name
    }

    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    pub fn base_table_id(&self) -> TableId {
        self.base_table_id
    }

    pub fn base_table_name(&self) -> &str {
        &self.base_table_name
    }

    pub fn include_all_columns(&self) -> bool {
        self.include_all_columns
    }

    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    pub fn where_clause(&self) -> &str {
        &self.where_clause
    }

    pub fn select(&self) -> &SelectStatement {
        &self.select
    }

    /// Structured form of `where_clause`.
    pub fn predicate<G: GrammarEngine + ?Sized>(&self, grammar: &G) -> Result<Predicate, ViewError> {
        Predicate::from_text(grammar, &self.where_clause).map_err(|source| ViewError::Internal {
            context: WHERE_CLAUSE_CONTEXT,
            source,
        })
    }

    /// True if the view selects `column`.
    pub fn includes(&self, column: &Identifier) -> bool {
        self.metadata.get_column_definition(column).is_some()
    }

    /// An independent definition with its own copy of the metadata.
    pub fn copy(&self) -> ViewDefinition {
        self.clone()
    }

    pub fn base_table_metadata(
        &self,
        registry: &SchemaRegistry,
    ) -> Result<Option<TableMetadata>, RegistryError> {
        registry.resolve(self.base_table_id)
    }

    /// Returns this view with column `from` renamed to `to` in its metadata,
    /// where clause and select statement. `self` is never modified, so a
    /// failure at any step leaves no half-renamed definition behind.
    pub fn renamed<G: GrammarEngine + ?Sized>(
        &self,
        grammar: &G,
        from: &Identifier,
        to: &Identifier,
    ) -> Result<ViewDefinition, ViewError> {
        let mut metadata = self.metadata.clone();
        metadata.rename_column(from, to)?;
        debug!(view = %self.view_name, %from, %to, "renamed view column in metadata");

        let predicate = self.predicate(grammar)?;
        let rewriter = RelationRewriter::new(from, to);
        debug!(
            view = %self.view_name,
            relations = predicate.relations().len(),
            occurrences = rewriter.occurrences(predicate.relations()),
            "parsed where clause"
        );

        let predicate = Predicate::new_from_relations(rewriter.rewrite(predicate.relations()));
        let (where_clause, select) =
            derive_select(grammar, &self.base_table_name, &metadata, &predicate)?;
        debug!(view = %self.view_name, %where_clause, "regenerated select statement");

        Ok(ViewDefinition {
            keyspace_name: self.keyspace_name.clone(),
            view_name: self.view_name.clone(),
            base_table_id: self.base_table_id,
            base_table_name: self.base_table_name.clone(),
            include_all_columns: self.include_all_columns,
            metadata,
            where_clause,
            select,
        })
    }

    /// Replaces column `from` with `to` in the view's partition, clustering or
    /// included columns and in its where clause. On error the definition is
    /// left as it was.
    pub fn rename_column(&mut self, from: &Identifier, to: &Identifier) -> Result<(), ViewError> {
        match self.renamed(&CqlGrammar, from, to) {
            Ok(renamed) => {
                *self = renamed;
                info!(
                    keyspace = %self.keyspace_name,
                    view = %self.view_name,
                    %from,
                    %to,
                    "renamed view column"
                );
                Ok(())
            }
            Err(e) => {
                warn!(view = %self.view_name, %from, %to, error = %e, "view column rename failed");
                Err(e)
            }
        }
    }
}

fn derive_select<G: GrammarEngine + ?Sized>(
    grammar: &G,
    base_table_name: &str,
    metadata: &TableMetadata,
    predicate: &Predicate,
) -> Result<(String, SelectStatement), ViewError> {
    if let Some(column) = predicate.columns().into_iter().find(|c| !metadata.has_column(c)) {
        return Err(ViewError::ConsistencyViolation {
            column: column.clone(),
        });
    }
    let where_clause = predicate.to_text(grammar);
    let raw_select = build_select_statement(base_table_name, &metadata.all_columns(), &where_clause);
    let select = grammar
        .parse_statement(&raw_select)
        .map_err(|source| ViewError::Internal {
            context: SELECT_CONTEXT,
            source,
        })?;

    Ok((where_clause, select))
}

use std::{
    collections::HashMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use lazy_static::lazy_static;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    parse::grammar::CqlGrammar,
    query::identifier::Identifier,
    view::{view_definition::ViewDefinition, view_error::ViewError},
};

use super::{
    metadata_error::MetadataError,
    table_metadata::{TableId, TableMetadata},
};

lazy_static! {
    static ref INSTANCE: SchemaRegistry = SchemaRegistry::new();
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown table {0}")]
    UnknownTable(TableId),

    #[error("table {keyspace}.{name} already exists")]
    TableExists { keyspace: String, name: String },

    #[error("materialized view {keyspace}.{name} already exists")]
    ViewExists { keyspace: String, name: String },

    #[error("unknown materialized view {keyspace}.{name}")]
    UnknownView { keyspace: String, name: String },

    #[error("table {0} still has materialized views")]
    HasDependentViews(TableId),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("schema registry lock poisoned")]
    Poisoned,
}

#[derive(Debug, Default)]
struct Schema {
    tables: HashMap<TableId, TableMetadata>,
    views: HashMap<(String, String), ViewDefinition>,
}

/// Base tables by id and views by keyspace and name.
///
/// All state sits behind one lock so that a column rename replaces the base
/// table and its views in a single step.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schema: RwLock<Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        SchemaRegistry::default()
    }

    /// The process-wide registry.
    pub fn instance() -> &'static SchemaRegistry {
        &INSTANCE
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Schema>, RegistryError> {
        self.schema.read().map_err(|_| RegistryError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Schema>, RegistryError> {
        self.schema.write().map_err(|_| RegistryError::Poisoned)
    }

    pub fn register_table(&self, table: TableMetadata) -> Result<(), RegistryError> {
        let mut schema = self.write()?;
        let clash = schema.tables.values().any(|t| {
            t.id() == table.id() || (t.keyspace() == table.keyspace() && t.name() == table.name())
        });
        if clash {
            return Err(RegistryError::TableExists {
                keyspace: table.keyspace().to_string(),
                name: table.name().to_string(),
            });
        }
        info!(keyspace = table.keyspace(), table = table.name(), id = %table.id(), "registered table");
        schema.tables.insert(table.id(), table);
        Ok(())
    }

    pub fn drop_table(&self, id: TableId) -> Result<TableMetadata, RegistryError> {
        let mut schema = self.write()?;
        if schema.views.values().any(|v| v.base_table_id() == id) {
            return Err(RegistryError::HasDependentViews(id));
        }
        let table = schema
            .tables
            .remove(&id)
            .ok_or(RegistryError::UnknownTable(id))?;
        info!(keyspace = table.keyspace(), table = table.name(), "dropped table");
        Ok(table)
    }

    pub fn resolve(&self, id: TableId) -> Result<Option<TableMetadata>, RegistryError> {
        Ok(self.read()?.tables.get(&id).cloned())
    }

    pub fn table_by_name(
        &self,
        keyspace: &str,
        name: &str,
    ) -> Result<Option<TableMetadata>, RegistryError> {
        Ok(self
            .read()?
            .tables
            .values()
            .find(|t| t.keyspace() == keyspace && t.name() == name)
            .cloned())
    }

    pub fn register_view(&self, view: ViewDefinition) -> Result<(), RegistryError> {
        let mut schema = self.write()?;
        if !schema.tables.contains_key(&view.base_table_id()) {
            return Err(RegistryError::UnknownTable(view.base_table_id()));
        }
        let key = (
            view.keyspace_name().to_string(),
            view.view_name().to_string(),
        );
        if schema.views.contains_key(&key) {
            return Err(RegistryError::ViewExists {
                keyspace: key.0,
                name: key.1,
            });
        }
        info!(keyspace = %key.0, view = %key.1, base = view.base_table_name(), "registered materialized view");
        schema.views.insert(key, view);
        Ok(())
    }

    pub fn drop_view(&self, keyspace: &str, name: &str) -> Result<ViewDefinition, RegistryError> {
        let mut schema = self.write()?;
        let view = schema
            .views
            .remove(&(keyspace.to_string(), name.to_string()))
            .ok_or_else(|| RegistryError::UnknownView {
                keyspace: keyspace.to_string(),
                name: name.to_string(),
            })?;
        info!(keyspace, view = name, "dropped materialized view");
        Ok(view)
    }

    pub fn view(&self, keyspace: &str, name: &str) -> Result<Option<ViewDefinition>, RegistryError> {
        Ok(self
            .read()?
            .views
            .get(&(keyspace.to_string(), name.to_string()))
            .cloned())
    }

    /// Views over the given base table, ordered by name.
    pub fn views_for_base_table(&self, id: TableId) -> Result<Vec<ViewDefinition>, RegistryError> {
        let schema = self.read()?;
        let mut ret: Vec<ViewDefinition> = schema
            .views
            .values()
            .filter(|v| v.base_table_id() == id)
            .cloned()
            .collect();
        ret.sort_by(|a, b| a.view_name().cmp(b.view_name()));
        Ok(ret)
    }

    /// Renames a base-table column and the same column in every view that
    /// includes it. Nothing is installed unless every rename succeeds.
    pub fn rename_column(
        &self,
        table_id: TableId,
        from: &Identifier,
        to: &Identifier,
    ) -> Result<(), RegistryError> {
        let mut schema = self.write()?;
        let mut table = schema
            .tables
            .get(&table_id)
            .cloned()
            .ok_or(RegistryError::UnknownTable(table_id))?;
        table.rename_column(from, to)?;

        let mut renamed_views = Vec::new();
        for (key, view) in schema.views.iter() {
            if view.base_table_id() == table_id && view.includes(from) {
                let renamed = view.renamed(&CqlGrammar, from, to)?;
                debug!(view = %key.1, "prepared view for column rename");
                renamed_views.push((key.clone(), renamed));
            }
        }

        info!(
            table = table.name(),
            %from,
            %to,
            views = renamed_views.len(),
            "renamed table column"
        );
        schema.tables.insert(table_id, table);
        for (key, view) in renamed_views {
            schema.views.insert(key, view);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        metadata::{
            data_type::DataType,
            metadata_error::MetadataError,
            table_metadata::{TableId, TableMetadata},
        },
        parse::grammar::CqlGrammar,
        query::identifier::Identifier,
        view::{view_definition::ViewDefinition, view_error::ViewError},
    };

    use super::{RegistryError, SchemaRegistry};

    fn id(s: &str) -> Identifier {
        Identifier::new(s)
    }

    fn base() -> TableMetadata {
        let mut tm = TableMetadata::new("ks", "users", TableId::random());
        tm.add_partition_key_column(id("uid"), DataType::Uuid).unwrap();
        tm.add_clustering_column(id("ts"), DataType::Timestamp).unwrap();
        tm.add_regular_column(id("email"), DataType::Text).unwrap();
        tm.add_regular_column(id("age"), DataType::Int).unwrap();
        tm
    }

    fn view_over(base: &TableMetadata, name: &str, cols: &[&str], where_clause: &str) -> ViewDefinition {
        let mut metadata = TableMetadata::new(base.keyspace(), name, TableId::random());
        metadata
            .add_partition_key_column(id(cols[0]), DataType::Text)
            .unwrap();
        for c in &cols[1..] {
            metadata.add_clustering_column(id(c), DataType::Text).unwrap();
        }
        ViewDefinition::create(&CqlGrammar, name, base, false, metadata, where_clause).unwrap()
    }

    #[test]
    fn test_register_and_resolve() {
        let registry = SchemaRegistry::new();
        let t = base();
        registry.register_table(t.clone()).unwrap();
        assert_eq!(Some(t.clone()), registry.resolve(t.id()).unwrap());
        assert_eq!(Some(t.clone()), registry.table_by_name("ks", "users").unwrap());
        assert_eq!(None, registry.resolve(TableId::random()).unwrap());
        assert!(matches!(
            registry.register_table(t.clone()),
            Err(RegistryError::TableExists { .. })
        ));
    }

    #[test]
    fn test_register_view_requires_base_table() {
        let registry = SchemaRegistry::new();
        let t = base();
        let v = view_over(&t, "by_email", &["email", "uid", "ts"], "email IS NOT NULL");
        assert_eq!(
            Err(RegistryError::UnknownTable(t.id())),
            registry.register_view(v.clone())
        );
        registry.register_table(t.clone()).unwrap();
        registry.register_view(v.clone()).unwrap();
        assert_eq!(Some(v.clone()), registry.view("ks", "by_email").unwrap());
        assert!(matches!(
            registry.register_view(v),
            Err(RegistryError::ViewExists { .. })
        ));
        assert_eq!(
            Err(RegistryError::HasDependentViews(t.id())),
            registry.drop_table(t.id()).map(|_| ())
        );
        registry.drop_view("ks", "by_email").unwrap();
        registry.drop_table(t.id()).unwrap();
        assert_eq!(None, registry.resolve(t.id()).unwrap());
    }

    #[test]
    fn test_rename_column_updates_dependent_views() {
        let registry = SchemaRegistry::new();
        let t = base();
        registry.register_table(t.clone()).unwrap();
        registry
            .register_view(view_over(
                &t,
                "by_email",
                &["email", "uid", "ts"],
                "email IS NOT NULL AND uid IS NOT NULL AND ts IS NOT NULL",
            ))
            .unwrap();
        registry
            .register_view(view_over(&t, "by_age", &["age", "uid", "ts"], "age > 18"))
            .unwrap();

        registry
            .rename_column(t.id(), &id("email"), &id("mail"))
            .unwrap();

        let table = registry.resolve(t.id()).unwrap().unwrap();
        assert!(table.has_column(&id("mail")));
        let by_email = registry.view("ks", "by_email").unwrap().unwrap();
        assert!(by_email.includes(&id("mail")));
        assert_eq!(
            "mail IS NOT NULL AND uid IS NOT NULL AND ts IS NOT NULL",
            by_email.where_clause()
        );
        let by_age = registry.view("ks", "by_age").unwrap().unwrap();
        assert_eq!("age > 18", by_age.where_clause());

        let names: Vec<String> = registry
            .views_for_base_table(t.id())
            .unwrap()
            .iter()
            .map(|v| v.view_name().to_string())
            .collect();
        assert_eq!(vec!["by_age", "by_email"], names);
    }

    #[test]
    fn test_failed_rename_changes_nothing() {
        let registry = SchemaRegistry::new();
        let t = base();
        registry.register_table(t.clone()).unwrap();
        // the view has its own "mail" column, so renaming email -> mail clashes there only
        let v = view_over(&t, "clash", &["email", "mail"], "email = 'x'");
        registry.register_view(v.clone()).unwrap();

        let err = registry
            .rename_column(t.id(), &id("email"), &id("mail"))
            .unwrap_err();
        assert_eq!(
            RegistryError::View(ViewError::Metadata(MetadataError::ColumnExists(id("mail")))),
            err
        );
        assert_eq!(Some(t.clone()), registry.resolve(t.id()).unwrap());
        assert_eq!(Some(v), registry.view("ks", "clash").unwrap());
    }

    #[test]
    fn test_rename_unknown_table_or_column() {
        let registry = SchemaRegistry::new();
        let t = base();
        assert_eq!(
            Err(RegistryError::UnknownTable(t.id())),
            registry.rename_column(t.id(), &id("email"), &id("x"))
        );
        registry.register_table(t.clone()).unwrap();
        assert_eq!(
            Err(RegistryError::Metadata(MetadataError::UnknownColumn(id("nope")))),
            registry.rename_column(t.id(), &id("nope"), &id("x"))
        );
    }

    #[test]
    fn test_instance_is_shared() {
        let a = SchemaRegistry::instance() as *const SchemaRegistry;
        let b = SchemaRegistry::instance() as *const SchemaRegistry;
        assert_eq!(a, b);
    }
}

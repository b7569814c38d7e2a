use std::{
    collections::HashMap,
    fmt,
    hash::{Hash, Hasher},
};

use uuid::Uuid;

use crate::query::identifier::Identifier;

use super::{
    column_definition::{ColumnDefinition, ColumnKind},
    data_type::DataType,
    metadata_error::MetadataError,
};

/// Stable table identity that survives table renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(Uuid);

impl TableId {
    pub fn random() -> Self {
        TableId(Uuid::new_v4())
    }

}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Column layout of a table or view.
///
/// Partition key and clustering columns keep their declared order; the
/// remaining columns form an unordered set. `Clone` is a deep copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMetadata {
    keyspace: String,
    name: String,
    id: TableId,
    partition_key: Vec<Identifier>,
    clustering: Vec<Identifier>,
    columns: HashMap<Identifier, ColumnDefinition>,
}

impl Hash for TableMetadata {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.keyspace.hash(state);
        self.name.hash(state);
        self.id.hash(state);
        self.partition_key.hash(state);
        self.clustering.hash(state);
        // HashMap iteration order is unspecified
        let mut defs: Vec<&ColumnDefinition> = self.columns.values().collect();
        defs.sort_by(|a, b| a.name().cmp(b.name()));
        defs.hash(state);
    }
}

impl fmt::Display for TableMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self
            .all_columns()
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        let partition = join(&self.partition_key);
        let mut key = format!("({})", partition);
        if !self.clustering.is_empty() {
            key = format!("{}, {}", key, join(&self.clustering));
        }
        write!(
            f,
            "{}.{} ({}, PRIMARY KEY ({}))",
            self.keyspace, self.name, columns, key
        )
    }
}

fn join(ids: &[Identifier]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

impl TableMetadata {
    pub fn new(keyspace: impl Into<String>, name: impl Into<String>, id: TableId) -> Self {
        TableMetadata {
            keyspace: keyspace.into(),
            name: name.into(),
            id,
            partition_key: Vec::new(),
            clustering: Vec::new(),
            columns: HashMap::new(),
        }
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    fn add_column(&mut self, def: ColumnDefinition) -> Result<(), MetadataError> {
        if def.name().as_str().is_empty() {
            return Err(MetadataError::EmptyColumnName);
        }
        if self.columns.contains_key(def.name()) {
            return Err(MetadataError::DuplicateColumn(def.name().clone()));
        }
        self.columns.insert(def.name().clone(), def);
        Ok(())
    }

    pub fn add_partition_key_column(
        &mut self,
        name: Identifier,
        data_type: DataType,
    ) -> Result<(), MetadataError> {
        let kind = ColumnKind::PartitionKey(self.partition_key.len());
        self.add_column(ColumnDefinition::new(name.clone(), kind, data_type))?;
        self.partition_key.push(name);
        Ok(())
    }

    pub fn add_clustering_column(
        &mut self,
        name: Identifier,
        data_type: DataType,
    ) -> Result<(), MetadataError> {
        let kind = ColumnKind::Clustering(self.clustering.len());
        self.add_column(ColumnDefinition::new(name.clone(), kind, data_type))?;
        self.clustering.push(name);
        Ok(())
    }

    pub fn add_regular_column(
        &mut self,
        name: Identifier,
        data_type: DataType,
    ) -> Result<(), MetadataError> {
        self.add_column(ColumnDefinition::new(name, ColumnKind::Regular, data_type))
    }

    pub fn add_static_column(
        &mut self,
        name: Identifier,
        data_type: DataType,
    ) -> Result<(), MetadataError> {
        self.add_column(ColumnDefinition::new(name, ColumnKind::Static, data_type))
    }

    pub fn get_column_definition(&self, name: &Identifier) -> Option<&ColumnDefinition> {
        self.columns.get(name)
    }

    pub fn has_column(&self, name: &Identifier) -> bool {
        self.columns.contains_key(name)
    }

    fn lookup(&self, names: &[Identifier]) -> Vec<&ColumnDefinition> {
        names
            .iter()
            .filter_map(|name| self.columns.get(name))
            .collect()
    }

    pub fn partition_key_columns(&self) -> Vec<&ColumnDefinition> {
        self.lookup(&self.partition_key)
    }

    pub fn clustering_columns(&self) -> Vec<&ColumnDefinition> {
        self.lookup(&self.clustering)
    }

    /// Regular and static columns, sorted by name.
    pub fn regular_and_static_columns(&self) -> Vec<&ColumnDefinition> {
        let mut ret: Vec<&ColumnDefinition> = self
            .columns
            .values()
            .filter(|c| !c.kind().is_primary_key())
            .collect();
        ret.sort_by(|a, b| a.name().cmp(b.name()));
        ret
    }

    /// Partition key columns, then clustering columns, then the rest.
    pub fn all_columns(&self) -> Vec<&ColumnDefinition> {
        let mut ret = self.partition_key_columns();
        ret.extend(self.clustering_columns());
        ret.extend(self.regular_and_static_columns());
        ret
    }

    /// Renames a column in place. A key column keeps its slot.
    pub fn rename_column(&mut self, from: &Identifier, to: &Identifier) -> Result<(), MetadataError> {
        if !self.columns.contains_key(from) {
            return Err(MetadataError::UnknownColumn(from.clone()));
        }
        if from == to {
            return Ok(());
        }
        if to.as_str().is_empty() {
            return Err(MetadataError::EmptyColumnName);
        }
        if self.columns.contains_key(to) {
            return Err(MetadataError::ColumnExists(to.clone()));
        }

        if let Some(def) = self.columns.remove(from) {
            self.columns.insert(to.clone(), def.with_name(to.clone()));
        }
        for slot in self
            .partition_key
            .iter_mut()
            .chain(self.clustering.iter_mut())
        {
            if slot == from {
                *slot = to.clone();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::hash_map::DefaultHasher,
        hash::{Hash, Hasher},
    };

    use crate::{
        metadata::{
            column_definition::ColumnKind, data_type::DataType, metadata_error::MetadataError,
        },
        query::identifier::Identifier,
    };

    use super::{TableId, TableMetadata};

    fn id(s: &str) -> Identifier {
        Identifier::new(s)
    }

    fn hash_of<T: Hash>(t: &T) -> u64 {
        let mut h = DefaultHasher::new();
        t.hash(&mut h);
        h.finish()
    }

    fn sample(table_id: TableId) -> TableMetadata {
        let mut tm = TableMetadata::new("ks", "t", table_id);
        tm.add_partition_key_column(id("p1"), DataType::Int).unwrap();
        tm.add_partition_key_column(id("p2"), DataType::Text).unwrap();
        tm.add_clustering_column(id("c1"), DataType::Int).unwrap();
        tm.add_clustering_column(id("c2"), DataType::Timestamp)
            .unwrap();
        tm.add_regular_column(id("v1"), DataType::Text).unwrap();
        tm.add_static_column(id("s1"), DataType::Boolean).unwrap();
        tm
    }

    fn names(defs: Vec<&crate::metadata::column_definition::ColumnDefinition>) -> Vec<&str> {
        defs.into_iter().map(|d| d.name().as_str()).collect()
    }

    #[test]
    fn test_all_columns_order() {
        let tm = sample(TableId::random());
        assert_eq!(
            vec!["p1", "p2", "c1", "c2", "s1", "v1"],
            names(tm.all_columns())
        );
        assert_eq!(6, tm.all_columns().len());
        assert_eq!(
            Some(ColumnKind::Clustering(1)),
            tm.get_column_definition(&id("c2")).map(|c| c.kind())
        );
    }

    #[test]
    fn test_rename_preserves_slot() {
        let mut tm = sample(TableId::random());
        tm.rename_column(&id("p2"), &id("p2x")).unwrap();
        assert_eq!(vec!["p1", "p2x"], names(tm.partition_key_columns()));
        assert_eq!(
            Some(ColumnKind::PartitionKey(1)),
            tm.get_column_definition(&id("p2x")).map(|c| c.kind())
        );
        assert!(!tm.has_column(&id("p2")));

        tm.rename_column(&id("c1"), &id("C1")).unwrap();
        assert_eq!(vec!["C1", "c2"], names(tm.clustering_columns()));

        tm.rename_column(&id("v1"), &id("v9")).unwrap();
        assert_eq!(Some(DataType::Text), tm.get_column_definition(&id("v9")).map(|c| c.data_type()));
    }

    #[test]
    fn test_rename_errors() {
        let mut tm = sample(TableId::random());
        assert_eq!(
            Err(MetadataError::UnknownColumn(id("nope"))),
            tm.rename_column(&id("nope"), &id("x"))
        );
        assert_eq!(
            Err(MetadataError::ColumnExists(id("v1"))),
            tm.rename_column(&id("c1"), &id("v1"))
        );
        assert_eq!(Ok(()), tm.rename_column(&id("v1"), &id("v1")));
        assert_eq!(
            Err(MetadataError::DuplicateColumn(id("v1"))),
            tm.add_regular_column(id("v1"), DataType::Int)
        );
    }

    #[test]
    fn test_empty_column_name() {
        let mut tm = sample(TableId::random());
        let before = tm.clone();
        assert_eq!(
            Err(MetadataError::EmptyColumnName),
            tm.rename_column(&id("v1"), &id(""))
        );
        assert_eq!(before, tm);
        assert_eq!(
            Err(MetadataError::EmptyColumnName),
            tm.add_regular_column(id(""), DataType::Int)
        );
        assert_eq!(
            Err(MetadataError::EmptyColumnName),
            tm.add_partition_key_column(id(""), DataType::Int)
        );
        assert_eq!(vec!["p1", "p2"], names(tm.partition_key_columns()));
    }

    #[test]
    fn test_clone_is_deep() {
        let tm = sample(TableId::random());
        let mut copy = tm.clone();
        copy.rename_column(&id("v1"), &id("renamed")).unwrap();
        assert!(tm.has_column(&id("v1")));
        assert!(!tm.has_column(&id("renamed")));
        assert_ne!(tm, copy);
    }

    #[test]
    fn test_equality_ignores_regular_column_order() {
        let table_id = TableId::random();
        let mut a = TableMetadata::new("ks", "t", table_id);
        a.add_partition_key_column(id("p"), DataType::Int).unwrap();
        a.add_regular_column(id("x"), DataType::Int).unwrap();
        a.add_regular_column(id("y"), DataType::Int).unwrap();
        let mut b = TableMetadata::new("ks", "t", table_id);
        b.add_partition_key_column(id("p"), DataType::Int).unwrap();
        b.add_regular_column(id("y"), DataType::Int).unwrap();
        b.add_regular_column(id("x"), DataType::Int).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_equality_respects_key_order() {
        let table_id = TableId::random();
        let mut a = TableMetadata::new("ks", "t", table_id);
        a.add_partition_key_column(id("p1"), DataType::Int).unwrap();
        a.add_partition_key_column(id("p2"), DataType::Int).unwrap();
        let mut b = TableMetadata::new("ks", "t", table_id);
        b.add_partition_key_column(id("p2"), DataType::Int).unwrap();
        b.add_partition_key_column(id("p1"), DataType::Int).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let tm = sample(TableId::random());
        assert_eq!(
            "ks.t (p1 int, p2 text, c1 int, c2 timestamp, s1 boolean static, v1 text, PRIMARY KEY ((p1, p2), c1, c2))",
            tm.to_string()
        );
    }
}

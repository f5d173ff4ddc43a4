//! Declared relations from the base table to other tables.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_key() -> String {
    "id".to_string()
}

/// How the base table reaches the target table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RelationKind {
    /// The target table holds a foreign key to the base table.
    #[serde(rename = "oneToMany")]
    OneToMany {
        #[serde(rename = "foreignKey", alias = "foreign_key")]
        foreign_key: String,
    },

    /// Base and target are linked through a join table.
    #[serde(rename = "manyToMany")]
    ManyToMany {
        #[serde(rename = "joinTable", alias = "join_table")]
        join_table: String,
        /// Join-table column referencing the base table.
        #[serde(rename = "joinFrom", alias = "join_from", alias = "joinFromColumn")]
        join_from: String,
        /// Join-table column referencing the target table.
        #[serde(rename = "joinTo", alias = "join_to", alias = "joinToColumn")]
        join_to: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    #[serde(rename = "tableName", alias = "targetTable", alias = "target_table")]
    pub target_table: String,

    /// Primary key of the target table.
    #[serde(rename = "targetKey", alias = "target_key", default = "default_key")]
    pub target_key: String,

    #[serde(flatten)]
    pub kind: RelationKind,
}

impl RelationDescriptor {
    pub fn many_to_many(
        target_table: impl Into<String>,
        join_table: impl Into<String>,
        join_from: impl Into<String>,
        join_to: impl Into<String>,
    ) -> Self {
        Self {
            target_table: target_table.into(),
            target_key: default_key(),
            kind: RelationKind::ManyToMany {
                join_table: join_table.into(),
                join_from: join_from.into(),
                join_to: join_to.into(),
            },
        }
    }

    pub fn one_to_many(target_table: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Self {
            target_table: target_table.into(),
            target_key: default_key(),
            kind: RelationKind::OneToMany {
                foreign_key: foreign_key.into(),
            },
        }
    }

    pub fn with_target_key(mut self, target_key: impl Into<String>) -> Self {
        self.target_key = target_key.into();
        self
    }

    pub fn join_table(&self) -> Option<&str> {
        match &self.kind {
            RelationKind::ManyToMany { join_table, .. } => Some(join_table),
            RelationKind::OneToMany { .. } => None,
        }
    }

    fn validate(&self, relation: &str) -> Result<(), RegistryError> {
        let invalid = |reason: &str| RegistryError::InvalidDescriptor {
            relation: relation.to_string(),
            reason: reason.to_string(),
        };

        if relation.is_empty() || relation.contains('.') {
            return Err(invalid("relation names must be non-empty and contain no `.`"));
        }
        if self.target_table.is_empty() || self.target_key.is_empty() {
            return Err(invalid("target table and key must be non-empty"));
        }

        match &self.kind {
            RelationKind::OneToMany { foreign_key } if foreign_key.is_empty() => {
                Err(invalid("foreign key must be non-empty"))
            }
            RelationKind::ManyToMany {
                join_table,
                join_from,
                join_to,
            } => {
                if join_table.is_empty() || join_from.is_empty() || join_to.is_empty() {
                    Err(invalid("join table and join columns must be non-empty"))
                } else if join_table == &self.target_table {
                    Err(invalid("join table must differ from the target table"))
                } else {
                    Ok(())
                }
            }
            RelationKind::OneToMany { .. } => Ok(()),
        }
    }
}

/// Relation name → descriptor, with a reverse index from join-table name to
/// the relation that owns it.
///
/// Read-only once built, so one registry can serve any number of
/// compilations, including concurrent ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationRegistry {
    relations: BTreeMap<String, RelationDescriptor>,
    join_tables: BTreeMap<String, String>,
}

impl RelationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a registry from a JSON object of relation name → descriptor.
    pub fn from_json(source: &str) -> Result<Self, RegistryError> {
        let relations: BTreeMap<String, RelationDescriptor> = serde_json::from_str(source)?;
        Self::from_relations(relations)
    }

    pub fn from_relations<I, S>(relations: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (S, RelationDescriptor)>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for (name, descriptor) in relations {
            registry.register(name, descriptor)?;
        }
        Ok(registry)
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        descriptor: RelationDescriptor,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        descriptor.validate(&name)?;

        if self.relations.contains_key(&name) {
            return Err(RegistryError::DuplicateRelation(name));
        }

        if let Some(join_table) = descriptor.join_table() {
            if let Some(existing) = self.join_tables.get(join_table) {
                return Err(RegistryError::DuplicateJoinTable {
                    join_table: join_table.to_string(),
                    existing: existing.clone(),
                    relation: name,
                });
            }
            self.join_tables.insert(join_table.to_string(), name.clone());
        }

        self.relations.insert(name, descriptor);
        Ok(())
    }

    /// Builder-style `register`.
    pub fn with(
        mut self,
        name: impl Into<String>,
        descriptor: RelationDescriptor,
    ) -> Result<Self, RegistryError> {
        self.register(name, descriptor)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&RelationDescriptor> {
        self.relations.get(name)
    }

    /// Like `get`, but also hands back the name as stored in the registry.
    pub fn lookup(&self, name: &str) -> Option<(&str, &RelationDescriptor)> {
        self.relations
            .get_key_value(name)
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    /// Finds the relation whose join table is `join_table`.
    pub fn by_join_table(&self, join_table: &str) -> Option<(&str, &RelationDescriptor)> {
        let name = self.join_tables.get(join_table)?;
        self.lookup(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RelationDescriptor)> {
        self.relations
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

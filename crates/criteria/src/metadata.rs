//! Entity relationship metadata.
//!
//! The relational optimizer never inspects entity types at runtime; it reads
//! this table instead. A [`Schema`] is built in code or loaded from TOML:
//!
//! ```toml
//! [[entity]]
//! name = "Company"
//!
//! [[entity.relation]]
//! name = "departments"
//! target = "Department"
//! cardinality = "many"
//! ```

use std::path::Path;

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Relationship multiplicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// Single-valued (many-to-one, one-to-one).
    One,
    /// Collection-valued (one-to-many, many-to-many).
    Many,
}

/// A relationship attribute declared on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationMeta {
    /// Attribute name on the owning entity.
    pub name: String,
    /// Target entity name.
    pub target: String,
    pub cardinality: Cardinality,
}

/// Relationship metadata for one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMeta {
    /// Entity name, simple (`Company`) or qualified (`com.acme.Company`).
    pub name: String,

    #[serde(default, rename = "relation")]
    pub relations: Vec<RelationMeta>,
}

impl EntityMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relations: Vec::new(),
        }
    }

    /// Declare a single-valued relation.
    pub fn to_one(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.relation(name, target, Cardinality::One)
    }

    /// Declare a collection-valued relation.
    pub fn to_many(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.relation(name, target, Cardinality::Many)
    }

    fn relation(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        self.relations.push(RelationMeta {
            name: name.into(),
            target: target.into(),
            cardinality,
        });
        self
    }

    /// Unqualified entity name.
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    /// Query alias: the lower-cased simple name.
    pub fn alias(&self) -> String {
        self.simple_name().to_lowercase()
    }
}

/// Strip any package/module qualification from an entity name.
pub fn simple_name(name: &str) -> &str {
    name.rsplit(['.', ':']).next().unwrap_or(name)
}

/// Registry of entity metadata, keyed by simple name.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entities: IndexMap<String, EntityMeta>,
}

#[derive(Deserialize)]
struct SchemaFile {
    #[serde(default, rename = "entity")]
    entities: Vec<EntityMeta>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity, replacing any previous entry with the same simple
    /// name.
    pub fn with_entity(mut self, entity: EntityMeta) -> Self {
        self.insert(entity);
        self
    }

    pub fn insert(&mut self, entity: EntityMeta) {
        self.entities
            .insert(entity.simple_name().to_string(), entity);
    }

    /// Look up an entity by simple or qualified name.
    pub fn entity(&self, name: &str) -> Option<&EntityMeta> {
        self.entities.get(simple_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entity(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityMeta> {
        self.entities.values()
    }

    /// Parse a schema from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: SchemaFile = toml::from_str(text).context("invalid schema TOML")?;
        let mut schema = Schema::new();
        for entity in file.entities {
            if entity.name.trim().is_empty() {
                bail!("schema entity with empty name");
            }
            if schema.contains(&entity.name) {
                bail!("entity {} declared more than once", entity.name);
            }
            schema.insert(entity);
        }
        Ok(schema)
    }

    /// Load a schema from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read schema {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("failed to load {}", path.display()))
    }
}

//! Directory mapping configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! search_base = "ou=groups,dc=example,dc=com"
//! search_scope = "subtree"
//! object_classes = ["top", "groupOfUniqueNames"]
//!
//! [attributes]
//! name = "cn"
//! members = "uniqueMember"
//! ```

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Depth of a directory search below the search base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// Immediate children of the base only.
    One,
    /// The base and its whole subtree.
    Subtree,
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchScope::One => "one",
            SearchScope::Subtree => "subtree",
        })
    }
}

/// Everything a directory accumulator needs besides the criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryMapping {
    /// Object classes every match must carry.
    #[serde(default)]
    pub object_classes: Vec<String>,

    /// Logical property name → physical attribute name.
    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    #[serde(default)]
    pub search_base: String,

    pub search_scope: Option<SearchScope>,
}

impl DirectoryMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object_class(mut self, class: impl Into<String>) -> Self {
        self.object_classes.push(class.into());
        self
    }

    pub fn with_attribute(
        mut self,
        property: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        self.attributes.insert(property.into(), attribute.into());
        self
    }

    pub fn with_search_base(mut self, search_base: impl Into<String>) -> Self {
        self.search_base = search_base.into();
        self
    }

    pub fn with_search_scope(mut self, search_scope: SearchScope) -> Self {
        self.search_scope = Some(search_scope);
        self
    }

    /// Parse a mapping from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid directory mapping TOML")
    }

    /// Load a mapping from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read directory mapping {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("failed to load {}", path.display()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_toml() {
        let text = r#"
search_base = "ou=groups,dc=example,dc=com"
search_scope = "subtree"
object_classes = ["top", "groupOfUniqueNames"]

[attributes]
name = "cn"
members = "uniqueMember"
"#;
        let mapping = DirectoryMapping::from_toml_str(text).unwrap();
        assert_eq!(mapping.search_scope, Some(SearchScope::Subtree));
        assert_eq!(mapping.object_classes.len(), 2);
        assert_eq!(mapping.attributes.get("name").map(String::as_str), Some("cn"));
    }

    #[test]
    fn missing_scope_parses_as_none() {
        let mapping = DirectoryMapping::from_toml_str("search_base = \"dc=x\"").unwrap();
        assert_eq!(mapping.search_scope, None);
        assert!(mapping.attributes.is_empty());
    }

    #[test]
    fn unknown_scope_rejected() {
        assert!(DirectoryMapping::from_toml_str("search_scope = \"base\"").is_err());
    }
}

//! Serialized criteria sequences.
//!
//! A document groups the three criterion streams a caller can feed an
//! accumulator:
//!
//! ```json
//! {
//!   "restrictions": [
//!     { "operand": "city", "comparison": "equal", "value": "Phoenix" },
//!     { "operand": "state", "comparison": "equal", "value": "AZ", "logical": "and" }
//!   ],
//!   "orders": [{ "operand": "city", "order": "asc" }]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::accumulator::Accumulator;
use crate::criterion::Criterion;
use crate::directory::DirectoryCriteria;
use crate::error::{CriteriaError, CriteriaResult};
use crate::relational::RelationalCriteria;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriteriaDocument {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<Criterion>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<Criterion>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orders: Vec<Criterion>,
}

impl CriteriaDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid criteria document")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read criteria {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("failed to load {}", path.display()))
    }

    /// Feed joins, restrictions and orders, in that order. Nothing is applied
    /// unless everything is.
    pub fn apply_relational(&self, criteria: &mut RelationalCriteria) -> CriteriaResult<()> {
        let mut staged = criteria.clone();
        staged
            .add_joins(self.joins.iter().cloned())?
            .add_all(self.restrictions.iter().cloned())?
            .add_orders(self.orders.iter().cloned())?;
        *criteria = staged;
        Ok(())
    }

    /// Feed restrictions and orders. Joins have no directory meaning.
    pub fn apply_directory(&self, criteria: &mut DirectoryCriteria) -> CriteriaResult<()> {
        if !self.joins.is_empty() {
            return Err(CriteriaError::unsupported(
                "joins are not supported by the directory backend",
            ));
        }
        let mut staged = criteria.clone();
        staged.add_all(self.restrictions.iter().cloned())?;
        if !self.orders.is_empty() {
            staged.add_orders(self.orders.iter().cloned())?;
        }
        *criteria = staged;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ops::{comparison, logical, order};

    #[test]
    fn parses_and_skips_missing_sections() {
        let doc = CriteriaDocument::from_json(
            r#"{"restrictions": [{"operand": "city", "comparison": "equal", "value": "Phoenix"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.restrictions, vec![comparison::eq("city", "Phoenix")]);
        assert!(doc.joins.is_empty());
        assert!(doc.orders.is_empty());
    }

    #[test]
    fn round_trips_builder_output() {
        let doc = CriteriaDocument {
            restrictions: vec![
                comparison::eq("city", "Phoenix"),
                logical::and(comparison::eq("state", "AZ")),
            ],
            joins: Vec::new(),
            orders: vec![order::desc("city")],
        };
        let json = serde_json::to_string(&doc).unwrap();
        assert!(!json.contains("joins"));
        assert_eq!(CriteriaDocument::from_json(&json).unwrap(), doc);
    }

    #[test]
    fn rejects_malformed_json() {
        let text = r#"{"restrictions": [{"comparison": "approx"}]}"#;
        assert!(CriteriaDocument::from_json(text).is_err());
    }
}

//! Join/fetch planning.
//!
//! Walks the relationship metadata of the queried entity so one compiled
//! query loads its relations eagerly. The walk is depth-first in declaration
//! order, which keeps the emitted clauses deterministic:
//!
//! - every relation declared directly on the root entity is planned
//! - deeper relations are planned only when their target type has not been
//!   visited yet, so cyclic schemas terminate
//! - nothing beyond `max_depth` relation hops is planned

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CriteriaError;
use crate::metadata::{Cardinality, EntityMeta, Schema, simple_name};

/// How the optimizer loads related entities.
///
/// The strategies differ in result cardinality and are never mixed within a
/// single query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStrategy {
    /// Emit `left join fetch` for each planned relation and project
    /// `distinct`, collapsing rows multiplied by to-many joins back to one per
    /// root entity. Deeper hops are fetched from an alias on their owner's
    /// join (`left join fetch company.departments departments1 left join
    /// fetch departments1.employees`).
    #[default]
    JoinFetch,
    /// Leave the query shape alone and attach per-path fetch hints instead.
    /// Rows are never multiplied.
    FetchHints,
    /// No automatic fetching.
    Disabled,
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FetchStrategy::JoinFetch => "join_fetch",
            FetchStrategy::FetchHints => "fetch_hints",
            FetchStrategy::Disabled => "disabled",
        })
    }
}

impl FromStr for FetchStrategy {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "join_fetch" => Ok(FetchStrategy::JoinFetch),
            "fetch_hints" => Ok(FetchStrategy::FetchHints),
            "disabled" | "none" => Ok(FetchStrategy::Disabled),
            other => Err(CriteriaError::invalid(format!(
                "unknown fetch strategy {other:?}"
            ))),
        }
    }
}

/// Execution hint attached to a relation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchHint {
    /// Load the collection for all result rows in one secondary query.
    BatchFetch,
    /// Load the single-valued relation with an outer join.
    LeftFetch,
}

impl From<Cardinality> for FetchHint {
    fn from(cardinality: Cardinality) -> Self {
        match cardinality {
            Cardinality::Many => FetchHint::BatchFetch,
            Cardinality::One => FetchHint::LeftFetch,
        }
    }
}

/// A relation path chosen by the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFetch {
    /// Dotted path relative to the root entity (`departments.employees`).
    pub path: String,
    pub cardinality: Cardinality,
    /// Number of relation hops from the root, starting at 1.
    pub depth: u8,
}

/// Plan the relation paths to fetch for `root`.
pub fn plan_fetches(schema: &Schema, root: &EntityMeta, max_depth: u8) -> Vec<PlannedFetch> {
    let mut planner = Planner {
        schema,
        max_depth,
        visited: HashSet::from([root.simple_name().to_string()]),
        planned: Vec::new(),
    };
    planner.walk(root, "", 1);
    planner.planned
}

struct Planner<'a> {
    schema: &'a Schema,
    max_depth: u8,
    visited: HashSet<String>,
    planned: Vec<PlannedFetch>,
}

impl<'a> Planner<'a> {
    fn walk(&mut self, entity: &'a EntityMeta, prefix: &str, depth: u8) {
        if depth > self.max_depth {
            return;
        }
        for relation in &entity.relations {
            let target = simple_name(&relation.target);
            let first_visit = self.visited.insert(target.to_string());
            if !first_visit && depth > 1 {
                tracing::debug!(
                    entity = entity.simple_name(),
                    relation = %relation.name,
                    target_entity = target,
                    "skipping relation to already visited entity"
                );
                continue;
            }

            let path = format!("{prefix}{}", relation.name);
            self.planned.push(PlannedFetch {
                path: path.clone(),
                cardinality: relation.cardinality,
                depth,
            });

            if !first_visit {
                continue;
            }
            match self.schema.entity(target) {
                Some(meta) => self.walk(meta, &format!("{path}."), depth.saturating_add(1)),
                None => tracing::warn!(
                    entity = entity.simple_name(),
                    relation = %relation.name,
                    target_entity = target,
                    "relation target missing from schema; not walking further"
                ),
            }
        }
    }
}

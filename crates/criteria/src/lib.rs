//! Sift criteria compiler.
//!
//! Callers build a sequence of [`Criterion`] tokens with the builders in
//! [`ops`] and feed them to a backend [`Accumulator`]:
//!
//! - [`RelationalCriteria`] renders an entity-query string with named
//!   parameters and fetches relations automatically from [`Schema`] metadata
//! - [`DirectoryCriteria`] renders an LDAP-style filter with a search base
//!   and scope
//!
//! The compiled output is handed to an executor outside this crate.

pub mod accumulator;
pub mod config;
pub mod criterion;
pub mod directory;
pub mod document;
pub mod error;
pub mod metadata;
pub mod ops;
pub mod relational;

pub use accumulator::Accumulator;
pub use config::CompilerConfig;
pub use criterion::{
    ComparisonOperator, Criterion, EnclosureOperator, EntityRef, JoinOperator, LogicalOperator,
    OrderDirection, Value,
};
pub use directory::{DirectoryCriteria, DirectoryMapping, DirectoryQuery, SearchScope};
pub use document::CriteriaDocument;
pub use error::{CriteriaError, CriteriaResult};
pub use metadata::{Cardinality, EntityMeta, RelationMeta, Schema};
pub use relational::{FetchHint, FetchStrategy, Parameters, RelationalCriteria, RelationalQuery};

pub mod prelude {
    pub use crate::Accumulator;
    pub use crate::ops::comparison::*;
    pub use crate::ops::enclosure::{begin, begin_with, end, end_with};
    pub use crate::ops::join::{join, join_fetch, left_join, left_join_fetch};
    pub use crate::ops::logical::{and, and_all, or, or_all};
    pub use crate::ops::order::{asc, desc};
}

//! Stateless criterion builders.
//!
//! - `comparison`: restrictions, including the composite `between` / `is_in`
//! - `logical`: `and` / `or` connectives
//! - `enclosure`: manual grouping markers
//! - `join`: relation traversal (relational backend only)
//! - `order`: sort directions

pub mod comparison;
pub mod enclosure;
pub mod join;
pub mod logical;
pub mod order;

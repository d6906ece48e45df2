//! Compiler configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

use crate::relational::FetchStrategy;

/// Default bound on how far the fetch planner follows relations.
pub const DEFAULT_MAX_FETCH_DEPTH: u8 = 3;

/// Relational compiler configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// How related entities are fetched (default: join fetch).
    pub fetch_strategy: FetchStrategy,

    /// Maximum relation path length planned by the optimizer (default: 3).
    pub max_fetch_depth: u8,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            fetch_strategy: FetchStrategy::default(),
            max_fetch_depth: DEFAULT_MAX_FETCH_DEPTH,
        }
    }
}

impl CompilerConfig {
    /// Load configuration from environment variables.
    ///
    /// - `SIFT_FETCH_STRATEGY`: `join_fetch`, `fetch_hints` or `disabled`
    /// - `SIFT_MAX_FETCH_DEPTH`: positive integer
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source, falling back to the
    /// defaults for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let fetch_strategy = match lookup("SIFT_FETCH_STRATEGY") {
            Some(v) => v.parse().with_context(|| {
                format!(
                    "SIFT_FETCH_STRATEGY must be join_fetch, fetch_hints or disabled, \
                     got {v:?}"
                )
            })?,
            None => FetchStrategy::default(),
        };

        let max_fetch_depth = match lookup("SIFT_MAX_FETCH_DEPTH") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("SIFT_MAX_FETCH_DEPTH must be a valid u8, got {v:?}"))?,
            None => DEFAULT_MAX_FETCH_DEPTH,
        };

        Ok(Self {
            fetch_strategy,
            max_fetch_depth,
        })
    }

    pub fn with_fetch_strategy(mut self, fetch_strategy: FetchStrategy) -> Self {
        self.fetch_strategy = fetch_strategy;
        self
    }

    pub fn with_max_fetch_depth(mut self, max_fetch_depth: u8) -> Self {
        self.max_fetch_depth = max_fetch_depth;
        self
    }
}

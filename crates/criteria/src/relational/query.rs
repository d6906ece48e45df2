//! Compiled relational query.

use indexmap::IndexMap;
use serde::Serialize;

use super::fetch::FetchHint;
use crate::criterion::Value;

/// Named parameters in first-use order: `param1`, `param2`, …
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Parameters(IndexMap<String, Value>);

impl Parameters {
    /// Name the next bound value will receive.
    pub fn next_name(&self) -> String {
        format!("param{}", self.0.len() + 1)
    }

    /// Bind `value` under the next name and return that name.
    pub(crate) fn bind(&mut self, value: Value) -> String {
        let name = self.next_name();
        self.0.insert(name.clone(), value);
        name
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Query string plus everything the executor needs to run it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationalQuery {
    /// Entity-query-language text.
    pub ql: String,

    /// Bound parameters.
    pub parameters: Parameters,

    /// Fetch hints keyed by alias-qualified relation path.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub hints: IndexMap<String, FetchHint>,
}

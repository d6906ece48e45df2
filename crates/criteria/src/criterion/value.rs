//! Criterion values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value bound to a restriction.
///
/// Relational backends bind values as named parameters untouched;
/// directory backends render scalars into the filter text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// String value.
    String(String),
    /// Integer value.
    Integer(i64),
    /// Float value.
    Float(f64),
    /// Boolean value.
    Boolean(bool),
    /// Reference to another persisted entity.
    Entity(EntityRef),
    /// Collection value (e.g. bound to `member of` or `in` parameters).
    List(Vec<Value>),
}

/// Reference to an entity instance by type and identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Entity type name (e.g. "Department").
    pub entity: String,
    /// Identifier of the referenced instance.
    pub id: String,
}

impl EntityRef {
    pub fn new(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl Value {
    /// Render a scalar the way directory filters expect it.
    ///
    /// Returns `None` for collections, which have no filter representation.
    pub fn as_directory_literal(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Boolean(true) => Some("TRUE".to_string()),
            Value::Boolean(false) => Some("FALSE".to_string()),
            Value::Entity(r) => Some(r.id.clone()),
            Value::List(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s:?}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Entity(r) => write!(f, "{}#{}", r.entity, r.id),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<EntityRef> for Value {
    fn from(value: EntityRef) -> Self {
        Value::Entity(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn directory_literals() {
        assert_eq!(
            Value::from("testgroup*").as_directory_literal(),
            Some("testgroup*".to_string())
        );
        assert_eq!(Value::from(42).as_directory_literal(), Some("42".to_string()));
        assert_eq!(
            Value::from(true).as_directory_literal(),
            Some("TRUE".to_string())
        );
        assert_eq!(
            Value::from(EntityRef::new("Group", "cn=admins")).as_directory_literal(),
            Some("cn=admins".to_string())
        );
        assert_eq!(Value::from(vec![1, 2]).as_directory_literal(), None);
    }

    #[test]
    fn untagged_deserialization() {
        let v: Value = serde_json::from_str("\"Phoenix\"").unwrap();
        assert_eq!(v, Value::String("Phoenix".to_string()));

        let v: Value = serde_json::from_str("7").unwrap();
        assert_eq!(v, Value::Integer(7));

        let v: Value = serde_json::from_str("[\"a\", 1]").unwrap();
        assert_eq!(
            v,
            Value::List(vec![Value::String("a".to_string()), Value::Integer(1)])
        );

        let v: Value = serde_json::from_str(r#"{"entity": "Department", "id": "12"}"#).unwrap();
        assert_eq!(v, Value::Entity(EntityRef::new("Department", "12")));
    }

    #[test]
    fn display_quotes_strings() {
        assert_eq!(Value::from("AZ").to_string(), "\"AZ\"");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "[\"a\", \"b\"]");
    }
}

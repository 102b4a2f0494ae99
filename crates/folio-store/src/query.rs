//! Attribute query language for [`ObjectStore::search`](crate::ObjectStore::search).
//!
//! A [`Query`] is a conjunction of [`Filter`]s. Each filter names an
//! attribute path (`/`-separated, relative to the object being tested), an
//! [`Operator`], and a JSON operand.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operator of a [`Filter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Attribute equals the operand.
    Equals,
    /// Attribute is absent or differs from the operand.
    NotEquals,
    /// String attribute contains the operand as a substring, or array
    /// attribute contains the operand as an element.
    Contains,
    /// String attribute starts with the operand.
    StartsWith,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals => write!(f, "=="),
            Self::NotEquals => write!(f, "!="),
            Self::Contains => write!(f, "contains"),
            Self::StartsWith => write!(f, "starts-with"),
        }
    }
}

/// A single attribute predicate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub path: String,
    pub operator: Operator,
    pub value: Value,
}

impl Filter {
    /// Evaluate this predicate against an object.
    pub fn matches(&self, object: &Value) -> bool {
        let attribute = lookup(object, &self.path);
        match self.operator {
            Operator::Equals => attribute == Some(&self.value),
            Operator::NotEquals => attribute != Some(&self.value),
            Operator::Contains => match (attribute, &self.value) {
                (Some(Value::String(s)), Value::String(needle)) => s.contains(needle.as_str()),
                (Some(Value::Array(items)), needle) => items.contains(needle),
                _ => false,
            },
            Operator::StartsWith => match (attribute, &self.value) {
                (Some(Value::String(s)), Value::String(prefix)) => s.starts_with(prefix.as_str()),
                _ => false,
            },
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.path, self.operator, self.value)
    }
}

/// A search over the direct children of a collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    filters: Vec<Filter>,
    limit: Option<usize>,
}

impl Query {
    /// A query matching every child of the collection.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add a predicate. All predicates must hold for a child to match.
    pub fn filter(mut self, path: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            path: path.into(),
            operator,
            value: value.into(),
        });
        self
    }

    /// Stop after `n` matches.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn max_results(&self) -> Option<usize> {
        self.limit
    }

    /// `true` if every filter holds for `object`.
    pub fn matches(&self, object: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(object))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filters.is_empty() {
            write!(f, "*")?;
        }
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                write!(f, " && ")?;
            }
            write!(f, "{filter}")?;
        }
        if let Some(n) = self.limit {
            write!(f, " limit {n}")?;
        }
        Ok(())
    }
}

/// Resolve a `/`-separated attribute path inside a JSON value.
pub(crate) fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |node, segment| node.as_object()?.get(segment))
}

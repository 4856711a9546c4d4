use crate::{core::types::Value, db::table::Record};

/// An equality conjunction: every `column = value` pair must hold.
///
/// An empty predicate matches every record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Predicate {
    conditions: Vec<(String, Value)>,
}

impl Predicate {
    /// Creates a predicate that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one `column = value` condition.
    pub fn and(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conditions.push((column.to_owned(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Checks a record against every condition.
    ///
    /// Comparison is exact on type and value. A record without the referenced
    /// column does not match that condition; no error is raised, so queries
    /// keep working over partially-shaped older records.
    pub fn matches(&self, record: &Record) -> bool {
        self.conditions
            .iter()
            .all(|(column, expected)| record.get(column) == Some(expected))
    }
}

/// Evaluates an optional predicate; `None` matches unconditionally.
pub fn matches(record: &Record, predicate: Option<&Predicate>) -> bool {
    predicate.is_none_or(|p| p.matches(record))
}

impl<S: Into<String>> FromIterator<(S, Value)> for Predicate {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        Self {
            conditions: iter
                .into_iter()
                .map(|(column, value)| (column.into(), value))
                .collect(),
        }
    }
}

/// Canonical text form, e.g. `Name="Alice" AND Age=30`.
impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, (column, value)) in self.conditions.iter().enumerate() {
            if idx > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{column}={}", value.to_literal())?;
        }
        Ok(())
    }
}

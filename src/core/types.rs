use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Column types supported by Scribe DB.
///
/// The textual form (`int`, `str`, `bool`) is what appears in column
/// definitions and in the persisted metadata file.
///
/// # Example
///
/// ```
/// use scribe_db::DataType;
///
/// let age: DataType = "int".parse().unwrap();
/// assert_eq!(age, DataType::Int);
/// assert_eq!(DataType::Str.to_string(), "str");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum DataType {
    /// 64-bit signed integer.
    Int,

    /// UTF-8 text.
    Str,

    /// Boolean true/false value.
    Bool,
}

/// A value that can be stored in a column.
///
/// Values carry their own type tag. Two values are equal only when both the
/// tag and the payload match, so `Integer(1)` never equals `Boolean(true)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A 64-bit signed integer value.
    Integer(i64),

    /// A UTF-8 text string.
    Text(String),

    /// A boolean value (true/false).
    Boolean(bool),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl Value {
    /// Returns the type tag of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Int,
            Value::Text(_) => DataType::Str,
            Value::Boolean(_) => DataType::Bool,
        }
    }

    /// Checks if this value can be stored in a column of the given type.
    ///
    /// No coercion happens here: a boolean is never accepted as an integer.
    pub fn is_compatible_with(&self, data_type: DataType) -> bool {
        self.data_type() == data_type
    }

    /// Renders the value the way it is written in a command.
    ///
    /// Text is double-quoted, so `Text("1")` and `Integer(1)` never render
    /// the same.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Text(s) => format!("\"{s}\""),
            other => other.to_string(),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

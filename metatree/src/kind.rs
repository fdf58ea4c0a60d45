//! Value kinds and their suffix tags.
//!
//! A resource's type is encoded in its basename suffix. [`ValueKind`] is the
//! closed set of recognized tags; the mapping in both directions is total
//! and fixed.

use std::fmt;

use chrono::Utc;
use serde_json::{Map, Value};

/// Timestamp layout used for `date` defaults and history imprints.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// The type of a resource, as named by its suffix.
///
/// # Examples
///
/// ```
/// use metatree::ValueKind;
///
/// assert_eq!(ValueKind::Int.suffix(), "int");
/// assert_eq!(ValueKind::from_suffix("dict"), Some(ValueKind::Dict));
/// assert_eq!(ValueKind::from_suffix("exe"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `true` or `false`.
    Bool,
    /// A signed or unsigned integer.
    Int,
    /// A floating point number.
    Float,
    /// A short string.
    String,
    /// Explicit absence of a value.
    Null,
    /// An ordered sequence stored as a single leaf file.
    Tuple,
    /// An ordered sequence stored as a directory.
    List,
    /// A keyed mapping stored as a directory.
    Dict,
    /// A string holding a timestamp; defaults to the current time.
    Date,
    /// A long string.
    Text,
}

impl ValueKind {
    /// Every kind, in suffix-table order.
    pub const ALL: [Self; 10] = [
        Self::Bool,
        Self::Int,
        Self::Float,
        Self::String,
        Self::Null,
        Self::Tuple,
        Self::List,
        Self::Dict,
        Self::Date,
        Self::Text,
    ];

    /// The suffix tag naming this kind.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Null => "null",
            Self::Tuple => "tuple",
            Self::List => "list",
            Self::Dict => "dict",
            Self::Date => "date",
            Self::Text => "text",
        }
    }

    /// Look up a kind by suffix tag.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.suffix() == suffix)
    }

    /// Whether resources of this kind are directories.
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::List | Self::Dict)
    }

    /// The value an unset resource of this kind reads as.
    ///
    /// `null` and `tuple` have no documented default and read as null.
    #[must_use]
    pub fn default_value(self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Int => Value::from(0),
            Self::Float => Value::from(0.0),
            Self::String | Self::Text => Value::String(String::new()),
            Self::Date => Value::String(Utc::now().format(TIMESTAMP_FORMAT).to_string()),
            Self::List => Value::Array(Vec::new()),
            Self::Dict => Value::Object(Map::new()),
            Self::Null | Self::Tuple => Value::Null,
        }
    }

    /// Infer the kind of `value`, favouring `hint` where it is compatible.
    ///
    /// Strings keep a `string`, `text` or `date` hint and integers keep a
    /// `float` hint. Arrays are tuples (leaves); objects are dicts
    /// (collections).
    ///
    /// # Examples
    ///
    /// ```
    /// use metatree::ValueKind;
    /// use serde_json::json;
    ///
    /// assert_eq!(ValueKind::infer(&json!(27), None), ValueKind::Int);
    /// assert_eq!(ValueKind::infer(&json!(28.5), Some(ValueKind::Int)), ValueKind::Float);
    /// assert_eq!(ValueKind::infer(&json!("hi"), Some(ValueKind::Text)), ValueKind::Text);
    /// ```
    #[must_use]
    pub fn infer(value: &Value, hint: Option<Self>) -> Self {
        match value {
            Value::Bool(_) => Self::Bool,
            Value::Number(_) if hint == Some(Self::Float) => Self::Float,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Int,
            Value::Number(_) => Self::Float,
            Value::String(_) => match hint {
                Some(h @ (Self::String | Self::Text | Self::Date)) => h,
                _ => Self::String,
            },
            Value::Null => Self::Null,
            Value::Array(_) => Self::Tuple,
            Value::Object(_) => Self::Dict,
        }
    }

    /// Convert `value` to this kind's representation where they differ
    /// only in form (an integer stored as `float`).
    ///
    /// # Examples
    ///
    /// ```
    /// use metatree::ValueKind;
    /// use serde_json::json;
    ///
    /// assert_eq!(ValueKind::Float.coerce(json!(1)), json!(1.0));
    /// assert_eq!(ValueKind::Int.coerce(json!(1)), json!(1));
    /// ```
    #[must_use]
    pub fn coerce(self, value: Value) -> Value {
        match (self, value) {
            (Self::Float, Value::Number(n)) if !n.is_f64() => {
                n.as_f64().map_or(Value::Number(n), Value::from)
            }
            (_, value) => value,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Suffix tag for a kind.
#[must_use]
pub const fn kind_to_suffix(kind: ValueKind) -> &'static str {
    kind.suffix()
}

/// Kind for a suffix tag, or `None` for unrecognized tags.
#[must_use]
pub fn suffix_to_kind(suffix: &str) -> Option<ValueKind> {
    ValueKind::from_suffix(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_suffix_table_is_bijective() {
        for kind in ValueKind::ALL {
            assert_eq!(suffix_to_kind(kind_to_suffix(kind)), Some(kind));
        }
    }

    #[test]
    fn test_collections() {
        assert!(ValueKind::Dict.is_collection());
        assert!(ValueKind::List.is_collection());
        assert!(!ValueKind::Tuple.is_collection());
        assert!(!ValueKind::String.is_collection());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ValueKind::Bool.default_value(), json!(false));
        assert_eq!(ValueKind::Int.default_value(), json!(0));
        assert_eq!(ValueKind::Float.default_value(), json!(0.0));
        assert_eq!(ValueKind::String.default_value(), json!(""));
        assert_eq!(ValueKind::Text.default_value(), json!(""));
        assert_eq!(ValueKind::List.default_value(), json!([]));
        assert_eq!(ValueKind::Dict.default_value(), json!({}));
        assert_eq!(ValueKind::Null.default_value(), Value::Null);
    }

    #[test]
    fn test_date_default_is_a_timestamp() {
        let value = ValueKind::Date.default_value();
        let s = value.as_str().unwrap();
        assert_eq!(s.len(), 15);
        assert!(chrono::NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_infer_numbers() {
        assert_eq!(ValueKind::infer(&json!(-3), None), ValueKind::Int);
        assert_eq!(ValueKind::infer(&json!(u64::MAX), None), ValueKind::Int);
        assert_eq!(ValueKind::infer(&json!(1.5), None), ValueKind::Float);
    }

    #[test]
    fn test_infer_ignores_incompatible_hint() {
        assert_eq!(
            ValueKind::infer(&json!("x"), Some(ValueKind::Int)),
            ValueKind::String
        );
        assert_eq!(
            ValueKind::infer(&json!(true), Some(ValueKind::String)),
            ValueKind::Bool
        );
        assert_eq!(
            ValueKind::infer(&json!("20240101-000000"), Some(ValueKind::Date)),
            ValueKind::Date
        );
    }

    #[test]
    fn test_integer_keeps_float_hint() {
        assert_eq!(
            ValueKind::infer(&json!(27), Some(ValueKind::Float)),
            ValueKind::Float
        );
        assert_eq!(ValueKind::Float.coerce(json!(27)), json!(27.0));
        assert_eq!(ValueKind::String.coerce(json!(27)), json!(27));
    }

    #[test]
    fn test_infer_containers() {
        assert_eq!(ValueKind::infer(&json!([1, 2]), None), ValueKind::Tuple);
        assert_eq!(ValueKind::infer(&json!({"a": 1}), None), ValueKind::Dict);
        assert_eq!(ValueKind::infer(&Value::Null, None), ValueKind::Null);
    }
}

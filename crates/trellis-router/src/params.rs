//! Route parameter values.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Ordered mapping of parameter names to values.
pub type Params = IndexMap<String, ParamValue>;

/// Value of a single route parameter.
///
/// `Null` shows up when a trailing key has no value segment. When passed to
/// `assemble`, it asks the route to fall back to the declared default.
/// `List` holds repeated keys captured by the convention routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Single(String),
    List(Vec<String>),
}

impl ParamValue {
    /// Returns the value if this is a single string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Single(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    /// True for `Null`, an empty string, or a list without values.
    pub fn is_empty(&self) -> bool {
        match self {
            ParamValue::Null => true,
            ParamValue::Single(value) => value.is_empty(),
            ParamValue::List(values) => values.iter().all(|v| v.is_empty()),
        }
    }

    /// Every string carried by this value, in order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            ParamValue::Null => Vec::new(),
            ParamValue::Single(value) => vec![value.as_str()],
            ParamValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Accumulate a repeated key: the first repeat turns a single value into
    /// a list, later repeats append. `Null` values are not kept in lists.
    pub fn append(&mut self, value: ParamValue) {
        let current = std::mem::replace(self, ParamValue::Null);
        *self = match (current, value) {
            (ParamValue::Null, value) => value,
            (current, ParamValue::Null) => current,
            (ParamValue::Single(a), ParamValue::Single(b)) => ParamValue::List(vec![a, b]),
            (ParamValue::Single(a), ParamValue::List(mut b)) => {
                b.insert(0, a);
                ParamValue::List(b)
            }
            (ParamValue::List(mut a), ParamValue::Single(b)) => {
                a.push(b);
                ParamValue::List(a)
            }
            (ParamValue::List(mut a), ParamValue::List(b)) => {
                a.extend(b);
                ParamValue::List(a)
            }
        };
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => Ok(()),
            ParamValue::Single(value) => write!(f, "{}", value),
            ParamValue::List(values) => write!(f, "{}", values.join(",")),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<Option<&str>> for ParamValue {
    fn from(value: Option<&str>) -> Self {
        value.map(ParamValue::from).unwrap_or(ParamValue::Null)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::List(values.into_iter().map(String::from).collect())
    }
}

impl TryFrom<serde_json::Value> for ParamValue {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(ParamValue::Null),
            Value::String(s) => Ok(ParamValue::Single(s)),
            Value::Number(n) => Ok(ParamValue::Single(n.to_string())),
            Value::Bool(b) => Ok(ParamValue::Single(b.to_string())),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    Value::Number(n) => Ok(n.to_string()),
                    Value::Bool(b) => Ok(b.to_string()),
                    other => Err(format!("unsupported list item {}", other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(ParamValue::List),
            Value::Object(_) => Err("objects are not valid parameter values".to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        ParamValue::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// Build a `Params` map from name/value pairs.
///
/// ```
/// use trellis_router::{params, ParamValue};
///
/// let p = params([("controller", "blog"), ("action", "read")]);
/// assert_eq!(p.get("action"), Some(&ParamValue::from("read")));
/// ```
pub fn params<K, V, I>(pairs: I) -> Params
where
    K: Into<String>,
    V: Into<ParamValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Decode a path segment the way form-encoded URLs are decoded: `+` is a
/// space and percent escapes are resolved. Invalid UTF-8 is replaced.
pub(crate) fn decode_segment(segment: &str) -> String {
    let plus_decoded = segment.replace('+', " ");
    let bytes = urlencoding::decode_binary(plus_decoded.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

pub(crate) fn encode_segment(segment: &str, encode: bool) -> String {
    if encode {
        urlencoding::encode(segment).into_owned()
    } else {
        segment.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_builds_list() {
        let mut value = ParamValue::from("a");
        value.append(ParamValue::from("b"));
        value.append(ParamValue::from("c"));
        assert_eq!(value, ParamValue::from(vec!["a", "b", "c"]));
    }

    #[test]
    fn test_append_onto_null_replaces() {
        let mut value = ParamValue::Null;
        value.append(ParamValue::from("a"));
        assert_eq!(value, ParamValue::from("a"));

        value.append(ParamValue::Null);
        assert_eq!(value, ParamValue::from("a"));
    }

    #[test]
    fn test_deserialize_scalars_and_lists() {
        let parsed: Params =
            serde_json::from_str(r#"{"a": "x", "b": 3, "c": null, "d": ["1", 2], "e": true}"#).unwrap();

        assert_eq!(parsed["a"], ParamValue::from("x"));
        assert_eq!(parsed["b"], ParamValue::from("3"));
        assert_eq!(parsed["c"], ParamValue::Null);
        assert_eq!(parsed["d"], ParamValue::from(vec!["1", "2"]));
        assert_eq!(parsed["e"], ParamValue::from("true"));
    }

    #[test]
    fn test_deserialize_rejects_objects() {
        let result: Result<Params, _> = serde_json::from_str(r#"{"a": {"b": "c"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_untagged() {
        let p = params([
            ("a", ParamValue::from("x")),
            ("b", ParamValue::Null),
            ("c", ParamValue::from(vec!["1", "2"])),
        ]);
        assert_eq!(
            serde_json::to_string(&p).unwrap(),
            r#"{"a":"x","b":null,"c":["1","2"]}"#
        );
    }

    #[test]
    fn test_decode_segment() {
        assert_eq!(decode_segment("hello+world"), "hello world");
        assert_eq!(decode_segment("a%2Fb"), "a/b");
        assert_eq!(decode_segment("caf%C3%A9"), "café");
        assert_eq!(decode_segment("100%"), "100%");
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("a b/c", true), "a%20b%2Fc");
        assert_eq!(encode_segment("a b/c", false), "a b/c");
    }

    #[test]
    fn test_is_empty() {
        assert!(ParamValue::Null.is_empty());
        assert!(ParamValue::from("").is_empty());
        assert!(!ParamValue::from("0").is_empty());
    }
}

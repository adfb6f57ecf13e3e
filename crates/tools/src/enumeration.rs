use serde_json::{Map, Value};
use std::collections::BTreeMap;

const PROPERTIES_KEY: &str = "properties";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnumError {
    NotAnObject,
    NoSuchEnumerator(String),
}

impl std::fmt::Display for EnumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnumError::NotAnObject => f.write_str("enum definition must be an object"),
            EnumError::NoSuchEnumerator(name) => write!(f, "no such enumerator: {name}"),
        }
    }
}

impl std::error::Error for EnumError {}

/// Read-only table of named constants.
///
/// There is no way to add, change or remove an entry once built. When the
/// definition carries a `properties` table, looking up a name resolves its
/// value through that table instead:
///
/// ```
/// use serde_json::json;
/// let sizes = tools::Enum::from_value(json!({
///     "SMALL": 1,
///     "properties": { "1": { "label": "small" } }
/// })).unwrap();
/// assert_eq!(sizes.get("SMALL").unwrap(), &json!({ "label": "small" }));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Enum {
    values: BTreeMap<String, Value>,
    properties: Option<Map<String, Value>>,
}

impl Enum {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            values: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            properties: None,
        }
    }

    pub fn from_value(value: Value) -> Result<Self, EnumError> {
        let Value::Object(mut map) = value else {
            return Err(EnumError::NotAnObject);
        };
        let properties = match map.remove(PROPERTIES_KEY) {
            Some(Value::Object(props)) => Some(props),
            Some(_) => return Err(EnumError::NotAnObject),
            None => None,
        };
        Ok(Self {
            values: map.into_iter().collect(),
            properties,
        })
    }

    /// Look up an enumerator. Unknown names are logged and reported as
    /// [`EnumError::NoSuchEnumerator`].
    pub fn get(&self, name: &str) -> Result<&Value, EnumError> {
        let found = self.values.get(name).and_then(|value| match &self.properties {
            None => Some(value),
            Some(props) => property_key(value).and_then(|key| props.get(&key)),
        });
        found.ok_or_else(|| {
            log::warn!(target: "tools.enum", "No such enumerator: {name}");
            EnumError::NoSuchEnumerator(name.to_string())
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Enumerator names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn property_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// src/properties.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A single persisted property. The backend stores strings and booleans only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    String(String),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            PropertyValue::Bool(_) => None,
        }
    }

    /// Convert a loosely typed JSON value coming back from a store.
    ///
    /// Numbers are kept as their decimal text; nulls, arrays and objects
    /// carry no usable setting and are dropped.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(PropertyValue::Bool(b)),
            Value::String(s) => Some(PropertyValue::String(s)),
            Value::Number(n) => Some(PropertyValue::String(n.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

/// Parse a boolean that the backend persists as a string.
///
/// Only the exact string `"true"` is true. Placeholders such as `"yes"`,
/// `"TRUE"` or `"1"` read as false. A native boolean is taken as is.
pub fn parse_string_flag(value: &PropertyValue) -> bool {
    match value {
        PropertyValue::String(s) => s == "true",
        PropertyValue::Bool(b) => *b,
    }
}

/// Write-side counterpart of [`parse_string_flag`].
pub fn to_string_flag(flag: bool) -> PropertyValue {
    PropertyValue::String(if flag { "true" } else { "false" }.to_string())
}

/// Flat property bag of one connector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectorProperties(BTreeMap<String, PropertyValue>);

impl ConnectorProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(PropertyValue::as_str)
    }

    /// Read a flag with the string rule; absent keys are false.
    pub fn get_flag(&self, name: &str) -> bool {
        self.0.get(name).map(parse_string_flag).unwrap_or(false)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.0.remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keep only the requested keys.
    pub fn retain_requested(&mut self, requested: &[&str]) {
        self.0.retain(|k, _| requested.contains(&k.as_str()));
    }

    /// Build from a JSON object, dropping values that are not settings.
    pub fn from_json_object(map: serde_json::Map<String, Value>) -> Self {
        Self(
            map.into_iter()
                .filter_map(|(k, v)| PropertyValue::from_json(v).map(|v| (k, v)))
                .collect(),
        )
    }
}

impl FromIterator<(String, PropertyValue)> for ConnectorProperties {
    fn from_iter<T: IntoIterator<Item = (String, PropertyValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Payload of a write request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorRecord {
    pub connector_service_name: String,
    pub properties: ConnectorProperties,
}

impl ConnectorRecord {
    pub fn new(connector_service_name: impl Into<String>, properties: ConnectorProperties) -> Self {
        Self {
            connector_service_name: connector_service_name.into(),
            properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_flag_rule() {
        assert!(parse_string_flag(&"true".into()));
        assert!(!parse_string_flag(&"false".into()));
        assert!(!parse_string_flag(&"yes".into()));
        assert!(!parse_string_flag(&"TRUE".into()));
        assert!(!parse_string_flag(&"".into()));
        assert!(parse_string_flag(&PropertyValue::Bool(true)));
        assert!(!parse_string_flag(&PropertyValue::Bool(false)));
    }

    #[test]
    fn test_to_string_flag() {
        assert_eq!(to_string_flag(true), PropertyValue::String("true".into()));
        assert_eq!(to_string_flag(false), PropertyValue::String("false".into()));
    }

    #[test]
    fn test_from_json_object() {
        let value = json!({
            "enabled": true,
            "apiKey": "k",
            "port": 443,
            "nothing": null,
            "nested": {"a": 1}
        });
        let props = match value {
            Value::Object(map) => ConnectorProperties::from_json_object(map),
            _ => unreachable!(),
        };
        assert_eq!(props.len(), 3);
        assert_eq!(props.get("enabled"), Some(&PropertyValue::Bool(true)));
        assert_eq!(props.get_str("apiKey"), Some("k"));
        assert_eq!(props.get_str("port"), Some("443"));
        assert!(!props.contains_key("nothing"));
    }

    #[test]
    fn test_record_wire_shape() {
        let mut props = ConnectorProperties::new();
        props.insert("enabled", true);
        props.insert("withCustomLogin", to_string_flag(false));
        let record = ConnectorRecord::new("AwsCognitoApi20", props);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "connectorServiceName": "AwsCognitoApi20",
                "properties": {"enabled": true, "withCustomLogin": "false"}
            })
        );
    }

    #[test]
    fn test_retain_requested() {
        let mut props = ConnectorProperties::new();
        props.insert("apiKey", "k");
        props.insert("scope", "openid");
        props.retain_requested(&["apiKey", "region"]);
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["apiKey"]);
    }
}

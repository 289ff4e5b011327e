use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single segment of a metric namespace.
///
/// Segments carrying a `name` are dynamic: their `value` identifies an
/// instance (a disk, a container, a CPU) rather than a fixed level of the
/// metric hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceElement {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NamespaceElement {
    pub fn fixed(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name: None,
            description: None,
        }
    }

    pub fn dynamic(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name: Some(name.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_dynamic(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(Vec<NamespaceElement>);

impl Namespace {
    pub fn new(elements: Vec<NamespaceElement>) -> Self {
        Self(elements)
    }

    /// Builds a static namespace from a slash-separated path such as
    /// `/intel/psutil/load/load1`. Empty segments are skipped.
    pub fn from_path(path: &str) -> Self {
        Self(
            path.split('/')
                .filter(|segment| !segment.is_empty())
                .map(NamespaceElement::fixed)
                .collect(),
        )
    }

    pub fn add_fixed(mut self, value: impl Into<String>) -> Self {
        self.0.push(NamespaceElement::fixed(value));
        self
    }

    pub fn add_dynamic(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push(NamespaceElement::dynamic(name, value));
        self
    }

    pub fn elements(&self) -> &[NamespaceElement] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Positions of the dynamic segments, ascending.
    pub fn dynamic_indexes(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, element)| element.is_dynamic())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn strings(&self) -> Vec<&str> {
        self.0.iter().map(|element| element.value.as_str()).collect()
    }
}

/// Value payload of a collected sample.
///
/// Only the numeric variants can be stored by OpenTSDB; the remaining ones
/// exist because collectors are free to report anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Text(String),
    Structured(serde_json::Value),
}

impl MetricValue {
    pub fn is_numeric(&self) -> bool {
        match self {
            MetricValue::Int(_) | MetricValue::UInt(_) => true,
            // NaN and infinities have no JSON number representation
            MetricValue::Float(value) => value.is_finite(),
            MetricValue::Bool(_) | MetricValue::Text(_) | MetricValue::Structured(_) => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MetricValue::Int(_) => "int",
            MetricValue::UInt(_) => "uint",
            MetricValue::Float(_) => "float",
            MetricValue::Bool(_) => "bool",
            MetricValue::Text(_) => "text",
            MetricValue::Structured(_) => "structured",
        }
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Int(value)
    }
}

impl From<i32> for MetricValue {
    fn from(value: i32) -> Self {
        MetricValue::Int(i64::from(value))
    }
}

impl From<u64> for MetricValue {
    fn from(value: u64) -> Self {
        MetricValue::UInt(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Float(value)
    }
}

impl From<f32> for MetricValue {
    fn from(value: f32) -> Self {
        MetricValue::Float(f64::from(value))
    }
}

impl From<bool> for MetricValue {
    fn from(value: bool) -> Self {
        MetricValue::Bool(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

/// A collected sample as received from the plugin host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub namespace: Namespace,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    pub value: MetricValue,
    pub timestamp: DateTime<Utc>,
}

impl MetricRecord {
    pub fn new(namespace: Namespace, value: impl Into<MetricValue>, timestamp: DateTime<Utc>) -> Self {
        Self {
            namespace,
            tags: HashMap::new(),
            value: value.into(),
            timestamp,
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

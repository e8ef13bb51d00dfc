use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::provider::MetadataProvider;

/// Structured metadata attached to a log line.
///
/// A `BTreeMap` keeps keys unique and iterates them in byte order, which
/// is exactly the order lines are rendered in.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A single metadata value.
///
/// Scalars of any kind (numbers, booleans, anything `Display`) are stored
/// in their string form, including when deserialized (`8080` becomes
/// `"8080"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "serde_json::Value")]
pub enum MetadataValue {
    String(String),
    Array(Vec<MetadataValue>),
    Map(BTreeMap<String, MetadataValue>),
}

impl MetadataValue {
    /// Store any displayable value by its string form.
    pub fn from_display(value: impl fmt::Display) -> Self {
        MetadataValue::String(value.to_string())
    }
}

impl fmt::Display for MetadataValue {
    /// Strings render verbatim; containers render their elements quoted,
    /// e.g. `["a", "b"]` and `["k": "v"]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => f.write_str(s),
            MetadataValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}", item.to_string())?;
                }
                f.write_str("]")
            }
            MetadataValue::Map(map) if map.is_empty() => f.write_str("[:]"),
            MetadataValue::Map(map) => {
                f.write_str("[")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {:?}", key, value.to_string())?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::String(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::String(value.to_string())
    }
}

macro_rules! impl_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for MetadataValue {
                fn from(value: $ty) -> Self {
                    MetadataValue::String(value.to_string())
                }
            }
        )*
    };
}

impl_from_display!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<T: Into<MetadataValue>> From<Vec<T>> for MetadataValue {
    fn from(values: Vec<T>) -> Self {
        MetadataValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, MetadataValue>> for MetadataValue {
    fn from(map: BTreeMap<String, MetadataValue>) -> Self {
        MetadataValue::Map(map)
    }
}

impl From<serde_json::Value> for MetadataValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => MetadataValue::String(s),
            serde_json::Value::Array(items) => {
                MetadataValue::Array(items.into_iter().map(MetadataValue::from).collect())
            }
            serde_json::Value::Object(map) => MetadataValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, MetadataValue::from(v)))
                    .collect(),
            ),
            other => MetadataValue::String(other.to_string()),
        }
    }
}

/// Merge the three metadata sources for a single log call.
///
/// Precedence is `explicit` over the provider's values over `base`.
/// Returns `None` when neither the provider nor `explicit` contributes
/// anything, whatever `base` holds: base-only rendering is cached by the
/// handler and must not be redone per call.
pub fn prepare_metadata(
    base: &Metadata,
    provider: Option<&dyn MetadataProvider>,
    explicit: Option<&Metadata>,
) -> Option<Metadata> {
    let provided = provider.map(|p| p.get()).unwrap_or_default();
    let explicit = explicit.filter(|m| !m.is_empty());

    if provided.is_empty() && explicit.is_none() {
        return None;
    }

    let mut metadata = base.clone();
    metadata.extend(provided);
    if let Some(explicit) = explicit {
        metadata.extend(explicit.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    Some(metadata)
}

/// Render metadata as `key=value` pairs sorted by key and joined by a
/// single space. `None` for empty metadata.
pub fn prettify(metadata: &Metadata) -> Option<String> {
    if metadata.is_empty() {
        return None;
    }
    let pairs: Vec<String> = metadata
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    Some(pairs.join(" "))
}

/// Handler-level metadata together with its cached rendering.
///
/// Every mutation goes through a method that refreshes `pretty`, so the
/// cache always reflects `map`.
#[derive(Debug, Clone, Default)]
pub struct BaseMetadata {
    map: Metadata,
    pretty: Option<String>,
}

impl BaseMetadata {
    pub fn new(map: Metadata) -> Self {
        let pretty = prettify(&map);
        Self { map, pretty }
    }

    pub fn map(&self) -> &Metadata {
        &self.map
    }

    pub fn pretty(&self) -> Option<&str> {
        self.pretty.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.map.get(key)
    }

    pub fn set(&mut self, map: Metadata) {
        self.map = map;
        self.refresh();
    }

    /// Set or remove (`None`) a single key.
    pub fn set_value(&mut self, key: impl Into<String>, value: Option<MetadataValue>) {
        let key = key.into();
        match value {
            Some(value) => {
                self.map.insert(key, value);
            }
            None => {
                self.map.remove(&key);
            }
        }
        self.refresh();
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.set_value(key, Some(value.into()));
    }

    pub fn remove(&mut self, key: &str) -> Option<MetadataValue> {
        let removed = self.map.remove(key);
        self.refresh();
        removed
    }

    fn refresh(&mut self) {
        self.pretty = prettify(&self.map);
    }
}

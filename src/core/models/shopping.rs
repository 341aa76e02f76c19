use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::core::timing::TimingAnalysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Accept a string, number or bool where a string is expected.
/// Models are inconsistent about quoting prices.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Like `lenient_string`, but absent or unusable values become "".
fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// Keep the string-like entries of an array; anything else reads as empty.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(entries)) = value else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect())
}

/// Items from an array. Bare strings become items with only a name;
/// entries that are neither strings nor objects are dropped.
fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<ShoppingItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(entries)) = value else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(name) => Some(ShoppingItem {
                item: name,
                ..ShoppingItem::default()
            }),
            Value::Object(_) => ShoppingItem::deserialize(entry).ok(),
            _ => None,
        })
        .collect())
}

/// Unknown or malformed priorities decode as absent.
fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(Priority::from_id))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    #[serde(default, deserialize_with = "lenient_name")]
    pub item: String,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_priority", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The structured payload the model is asked to produce.
///
/// Top-level fields this crate does not know about are kept in `extra` and
/// written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    #[serde(default, deserialize_with = "lenient_items")]
    pub shopping_list: Vec<ShoppingItem>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub total_estimated_cost: Option<String>,
    #[serde(default, deserialize_with = "lenient_strings", skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings", skip_serializing_if = "Vec::is_empty")]
    pub recommended_stores: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Attributes remembered for an item name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub estimated_cost: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub quantity: Option<String>,
}

impl CachedItem {
    pub fn new(category: &str, priority: Priority, estimated_cost: &str, quantity: &str) -> Self {
        Self {
            category: Some(category.to_string()),
            priority: Some(priority),
            estimated_cost: Some(estimated_cost.to_string()),
            quantity: Some(quantity.to_string()),
        }
    }
}

impl From<&ShoppingItem> for CachedItem {
    fn from(item: &ShoppingItem) -> Self {
        Self {
            category: item.category.clone(),
            priority: item.priority,
            estimated_cost: item.estimated_cost.clone(),
            quantity: item.quantity.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub source_note_id: String,
    pub processed_at: String,
    pub model: String,
    pub version: String,
}

/// A processed note: the model's list plus timing suggestions and provenance.
#[derive(Debug, Clone, Serialize)]
pub struct ShoppingReport {
    #[serde(flatten)]
    pub list: ShoppingList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingAnalysis>,
    pub metadata: ReportMetadata,
}

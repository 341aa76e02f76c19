use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One logged model invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub timestamp: String,
    pub note_id: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    /// Dollars, rounded to 6 decimals
    pub cost: f64,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// On-disk cost log: lifetime aggregates plus the most recent call records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CostLog {
    pub total_calls: u64,
    pub total_cost: f64,
    #[serde(default)]
    pub calls: Vec<CallRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostStats {
    pub total_calls: u64,
    pub total_cost: f64,
    pub average_cost: f64,
    pub recent_calls: Vec<CallRecord>,
    /// Projected spend at 30 calls per day
    pub daily_estimate: f64,
    /// Projected spend at 30 calls per day over 30 days
    pub monthly_estimate: f64,
}

/// Estimated cost of one request under a single pricing tier.
#[derive(Debug, Clone, Serialize)]
pub struct TierEstimate {
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost: f64,
    pub monthly_cost: f64,
}

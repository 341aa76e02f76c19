use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::cost::pricing::{self, PricingTier};
use crate::core::cost::tokens::estimate_tokens;
use crate::core::models::cost::{CallRecord, CostLog, CostStats};
use crate::core::storage::{self, LoadState};

/// Detail records kept on disk. Aggregates cover every call regardless.
pub const MAX_RETAINED_CALLS: usize = 100;
/// Records returned by `get_stats`.
pub const RECENT_CALLS: usize = 10;
/// Usage assumption behind the daily and monthly projections.
pub const CALLS_PER_DAY: f64 = 30.0;
const DAYS_PER_MONTH: f64 = 30.0;

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// File-backed log of model calls and what they cost.
///
/// Every mutation reads the whole document, changes it and writes it back.
/// There is no locking: one writer at a time is assumed.
#[derive(Debug, Clone)]
pub struct CostLogStore {
    path: PathBuf,
    pricing: PricingTier,
}

impl CostLogStore {
    /// Open the log at `path`, writing an empty log if no file exists yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            pricing: *pricing::default_tier(),
        };
        if !store.path.exists() {
            tracing::debug!(path = %store.path.display(), "creating empty cost log");
            store.save(&CostLog::default())?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pricing(&self) -> &PricingTier {
        &self.pricing
    }

    /// Load the log. Missing or corrupt files read as an empty log.
    pub fn load(&self) -> CostLog {
        self.load_with_state().0
    }

    pub fn load_with_state(&self) -> (CostLog, LoadState) {
        storage::read_json(&self.path)
    }

    fn save(&self, log: &CostLog) -> Result<()> {
        storage::write_json(&self.path, log)
    }

    /// Estimate, price and append one call, then persist the log.
    pub fn record_call(
        &self,
        input_text: &str,
        output_text: &str,
        note_id: &str,
        metadata: BTreeMap<String, String>,
    ) -> Result<CallRecord> {
        let input_tokens = estimate_tokens(input_text);
        let output_tokens = estimate_tokens(output_text);
        let cost = pricing::calculate_cost(input_tokens, output_tokens, &self.pricing);

        let record = CallRecord {
            timestamp: chrono::Local::now()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            note_id: note_id.to_string(),
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
            cost: round_to(cost, 6),
            metadata,
        };

        let mut log = self.load();
        log.total_calls += 1;
        log.total_cost += cost;
        log.calls.push(record.clone());

        if log.calls.len() > MAX_RETAINED_CALLS {
            let excess = log.calls.len() - MAX_RETAINED_CALLS;
            log.calls.drain(..excess);
        }

        self.save(&log)?;
        tracing::debug!(
            note_id,
            input_tokens,
            output_tokens,
            cost = record.cost,
            total_calls = log.total_calls,
            "recorded model call"
        );
        Ok(record)
    }

    /// Aggregate statistics over the log.
    pub fn get_stats(&self) -> CostStats {
        let log = self.load();

        let average = if log.total_calls == 0 {
            0.0
        } else {
            log.total_cost / log.total_calls as f64
        };

        let skip = log.calls.len().saturating_sub(RECENT_CALLS);
        let recent_calls = log.calls[skip..].to_vec();

        CostStats {
            total_calls: log.total_calls,
            total_cost: round_to(log.total_cost, 4),
            average_cost: round_to(average, 4),
            recent_calls,
            daily_estimate: round_to(average * CALLS_PER_DAY, 2),
            monthly_estimate: round_to(average * CALLS_PER_DAY * DAYS_PER_MONTH, 2),
        }
    }
}

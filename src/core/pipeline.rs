use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::cost::log::CostLogStore;
use crate::core::items::ItemCacheStore;
use crate::core::models::note::NoteContent;
use crate::core::models::shopping::{ReportMetadata, ShoppingList, ShoppingReport};
use crate::core::parser::{parse_shopping_list, ParseFailure};
use crate::core::providers::CompletionBackend;
use crate::core::timing::analyze_item_timing;

pub const SYSTEM_PROMPT: &str = "Convert this note to a shopping list JSON:

Required fields per item:
- item: specific name
- category: grocery/household/clothing/etc
- priority: high/medium/low
- estimated_cost: realistic price
- quantity: amount needed

Also include:
- total_estimated_cost
- categories (array)
- recommended_stores (array)

Put the items in a \"shopping_list\" array. Focus on actionable items only.";

const REPORT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to process note: {0}")]
    Upstream(String),
    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

impl ProcessError {
    /// The error document printed and saved in place of a shopping list.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Upstream(_) => json!({ "error": self.to_string() }),
            Self::Parse(failure) => failure.to_json(),
        }
    }
}

/// Note → model → shopping list, with cost logging and item caching.
pub struct ShoppingListProcessor<B> {
    backend: B,
    costs: CostLogStore,
    items: ItemCacheStore,
}

impl<B: CompletionBackend> ShoppingListProcessor<B> {
    pub fn new(backend: B, costs: CostLogStore, items: ItemCacheStore) -> Self {
        Self {
            backend,
            costs,
            items,
        }
    }

    pub fn costs(&self) -> &CostLogStore {
        &self.costs
    }

    pub fn items(&self) -> &ItemCacheStore {
        &self.items
    }

    /// Run one note through the model and post-process the reply.
    ///
    /// Model failures and unparseable replies come back as `ProcessError`.
    /// Store write failures are logged and do not fail the note.
    pub async fn process_note(&self, note: &NoteContent) -> Result<ShoppingReport, ProcessError> {
        tracing::info!(note_id = %note.id, model = self.backend.model(), "processing note");
        let user_prompt = note.to_prompt();

        let raw = self
            .backend
            .complete(SYSTEM_PROMPT, &user_prompt)
            .await
            .map_err(|e| {
                tracing::error!(error = %format!("{:#}", e), "model call failed");
                ProcessError::Upstream(format!("{:#}", e))
            })?;

        let full_input = format!("{}\n\n{}", SYSTEM_PROMPT, user_prompt);
        let mut metadata = BTreeMap::new();
        metadata.insert("model".to_string(), self.backend.model().to_string());
        match self.costs.record_call(&full_input, &raw, &note.id, metadata) {
            Ok(record) => tracing::info!(
                cost = record.cost,
                tokens = record.total_tokens,
                "logged model call"
            ),
            Err(e) => tracing::warn!(error = %format!("{:#}", e), "failed to update cost log"),
        }

        let mut list = parse_shopping_list(&raw).map_err(|e| {
            tracing::error!(error = %e, "failed to parse model response");
            e
        })?;

        self.fill_from_cache(&mut list);
        if let Err(e) = self.items.absorb_shopping_list(&list) {
            tracing::warn!(error = %format!("{:#}", e), "failed to update item cache");
        }

        // These keys belong to the report, not the model.
        list.extra.remove("timing");
        list.extra.remove("metadata");

        let timing = if list.shopping_list.is_empty() {
            None
        } else {
            Some(analyze_item_timing(&list.shopping_list))
        };

        Ok(ShoppingReport {
            list,
            timing,
            metadata: ReportMetadata {
                source_note_id: note.id.clone(),
                processed_at: chrono::Local::now()
                    .format("%Y-%m-%dT%H:%M:%S%.6f")
                    .to_string(),
                model: self.backend.model().to_string(),
                version: REPORT_VERSION.to_string(),
            },
        })
    }

    /// Fill attributes the model left out with remembered ones.
    fn fill_from_cache(&self, list: &mut ShoppingList) {
        for item in list.shopping_list.iter_mut() {
            let incomplete = item.category.is_none()
                || item.priority.is_none()
                || item.estimated_cost.is_none()
                || item.quantity.is_none();
            if item.item.is_empty() || !incomplete {
                continue;
            }
            let Some(cached) = self.items.get_item(&item.item) else {
                continue;
            };
            tracing::debug!(item = %item.item, "filling item from cache");
            if item.category.is_none() {
                item.category = cached.category;
            }
            if item.priority.is_none() {
                item.priority = cached.priority;
            }
            if item.estimated_cost.is_none() {
                item.estimated_cost = cached.estimated_cost;
            }
            if item.quantity.is_none() {
                item.quantity = cached.quantity;
            }
        }
    }
}

fn file_safe(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Write `document` to `shopping_list_<note_id>_<timestamp>.json` in `dir`.
pub fn save_output<T: Serialize + ?Sized>(document: &T, dir: &Path, note_id: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("shopping_list_{}_{}.json", file_safe(note_id), timestamp));
    let json = serde_json::to_string_pretty(document).context("Failed to serialize shopping list")?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "shopping list saved");
    Ok(path)
}

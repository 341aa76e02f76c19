use anyhow::Result;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::{Path, PathBuf};

use crate::core::models::shopping::{CachedItem, Priority, ShoppingList};
use crate::core::storage::{self, LoadState};

/// Item name → attributes, in insertion order.
///
/// Lookups scan in this order, so it is preserved through save and load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemTable {
    entries: Vec<(String, CachedItem)>,
}

impl ItemTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&CachedItem> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert or overwrite. An overwritten key keeps its position.
    pub fn insert(&mut self, key: String, item: CachedItem) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = item,
            None => self.entries.push((key, item)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CachedItem)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for ItemTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, item) in &self.entries {
            map.serialize_entry(key, item)?;
        }
        map.end()
    }
}

struct ItemTableVisitor;

impl<'de> Visitor<'de> for ItemTableVisitor {
    type Value = ItemTable;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a map of item names to cached attributes")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ItemTable, A::Error> {
        let mut table = ItemTable::default();
        while let Some((key, item)) = access.next_entry::<String, CachedItem>()? {
            table.insert(key, item);
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for ItemTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ItemTableVisitor)
    }
}

/// Entries written when a cache is created from scratch.
pub fn default_items() -> ItemTable {
    let mut table = ItemTable::default();
    table.insert(
        "milk".into(),
        CachedItem::new("dairy", Priority::High, "$4.99", "1 gallon"),
    );
    table.insert(
        "bread".into(),
        CachedItem::new("bakery", Priority::High, "$3.49", "1 loaf"),
    );
    table.insert(
        "eggs".into(),
        CachedItem::new("dairy", Priority::High, "$3.99", "1 dozen"),
    );
    table
}

fn normalize(name: &str) -> String {
    name.to_lowercase()
}

/// File-backed cache of shopping items seen before.
///
/// Same persistence model as the cost log: whole-document rewrites, no
/// locking, unreadable files read as empty.
#[derive(Debug, Clone)]
pub struct ItemCacheStore {
    path: PathBuf,
}

impl ItemCacheStore {
    /// Open the cache at `path`, seeding it with common groceries if no file
    /// exists yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };
        if !store.path.exists() {
            tracing::debug!(path = %store.path.display(), "seeding item cache");
            store.save(&default_items())?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> ItemTable {
        self.load_with_state().0
    }

    pub fn load_with_state(&self) -> (ItemTable, LoadState) {
        storage::read_json(&self.path)
    }

    fn save(&self, table: &ItemTable) -> Result<()> {
        storage::write_json(&self.path, table)
    }

    /// Find the first cached entry whose key contains the query or is
    /// contained by it, comparing lower-cased. Hand-edited keys need not be
    /// lower-case.
    pub fn get_item(&self, name: &str) -> Option<CachedItem> {
        let query = normalize(name);
        let table = self.load();
        let found = table
            .iter()
            .find(|(key, _)| {
                let key = normalize(key);
                query.contains(key.as_str()) || key.contains(query.as_str())
            })
            .map(|(_, item)| item.clone());
        found
    }

    pub fn add_item(&self, name: &str, item: CachedItem) -> Result<()> {
        let mut table = self.load();
        table.insert(normalize(name), item);
        self.save(&table)
    }

    /// Remember every item in `list` not already cached under its exact
    /// lower-cased name. Writes at most once. Returns the number added.
    pub fn absorb_shopping_list(&self, list: &ShoppingList) -> Result<usize> {
        let mut table = self.load();
        let mut added = 0;

        for item in &list.shopping_list {
            let key = normalize(&item.item);
            if key.is_empty() || table.contains_key(&key) {
                continue;
            }
            table.insert(key, CachedItem::from(item));
            added += 1;
        }

        if added > 0 {
            self.save(&table)?;
            tracing::debug!(added, total = table.len(), "absorbed items into cache");
        }
        Ok(added)
    }
}

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// How a JSON document came to be in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Read and decoded from disk
    Loaded,
    /// No file at the path; defaults used
    Missing,
    /// File present but unreadable or not valid for the type; defaults used
    Corrupt,
}

/// Read a JSON document, falling back to `T::default()` when the file is
/// absent or cannot be decoded. Never fails.
pub fn read_json<T>(path: &Path) -> (T, LoadState)
where
    T: DeserializeOwned + Default,
{
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return (T::default(), LoadState::Missing);
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable store, using empty state");
            return (T::default(), LoadState::Corrupt);
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => (value, LoadState::Loaded),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "corrupt store, using empty state");
            (T::default(), LoadState::Corrupt)
        }
    }
}

/// Write `value` as pretty-printed JSON, replacing the whole file.
pub fn write_json<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let (value, state): (BTreeMap<String, u32>, _) = read_json(&dir.path().join("nope.json"));
        assert!(value.is_empty());
        assert_eq!(state, LoadState::Missing);
    }

    #[test]
    fn corrupt_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let (value, state): (BTreeMap<String, u32>, _) = read_json(&path);
        assert!(value.is_empty());
        assert_eq!(state, LoadState::Corrupt);
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        let mut doc = BTreeMap::new();
        doc.insert("calls".to_string(), 3u32);
        write_json(&path, &doc).unwrap();

        let (loaded, state): (BTreeMap<String, u32>, _) = read_json(&path);
        assert_eq!(state, LoadState::Loaded);
        assert_eq!(loaded.get("calls"), Some(&3));
    }
}

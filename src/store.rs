//! Append-only readings store for `crowdcast`.
//!
//! Readings are kept one JSON object per line in a flat file. Appends are
//! serialized through a single writer lock; reads never fail and treat a
//! missing or damaged store as (partially) empty. A legacy file holding a
//! single JSON array of readings is also understood.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

use crate::Reading;

// ---

#[derive(Debug)]
pub struct ReadingStore {
    // ---
    path: PathBuf,
    writer: Mutex<()>,
}

impl ReadingStore {
    // ---
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty store file (and parent directory) if none exists.
    pub async fn ensure_exists(&self) -> Result<()> {
        // ---
        if fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(());
        }
        self.create_parent().await?;
        fs::File::create(&self.path)
            .await
            .with_context(|| format!("Failed to create store '{}'", self.path.display()))?;
        tracing::info!("Created empty readings store at {}", self.path.display());
        Ok(())
    }

    /// Every stored reading in arrival order.
    pub async fn read_all(&self) -> Vec<Reading> {
        // ---
        match fs::read_to_string(&self.path).await {
            Ok(contents) => parse_store(&contents, &self.path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    "Failed to read store '{}', treating as empty: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Append one reading as a single JSON line.
    pub async fn append(&self, reading: &Reading) -> Result<()> {
        // ---
        let mut line = serde_json::to_string(reading)?;
        line.push('\n');

        let _guard = self.writer.lock().await;
        self.create_parent().await?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open store '{}'", self.path.display()))?;

        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to append to store '{}'", self.path.display()))?;
        file.flush().await?;
        Ok(())
    }

    async fn create_parent(&self) -> Result<()> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create directory '{}'", dir.display())),
            _ => Ok(()),
        }
    }
}

/// Decode store contents, skipping lines that are not valid readings.
fn parse_store(contents: &str, path: &Path) -> Vec<Reading> {
    // ---
    let trimmed = contents.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).unwrap_or_else(|e| {
            tracing::warn!(
                "Legacy store '{}' is corrupt, treating as empty: {}",
                path.display(),
                e
            );
            Vec::new()
        });
    }

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(i, line)| match serde_json::from_str::<Reading>(line) {
            Ok(reading) => Some(reading),
            Err(e) => {
                tracing::warn!("Skipping line {} of '{}': {}", i + 1, path.display(), e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serde_json::json;

    fn reading(location: &str, total: i64) -> Reading {
        Reading {
            location: location.to_string(),
            timestamp: Some(json!(1_750_000_000)),
            wifi_count: Some(total),
            ble_count: Some(0),
            total_count: Some(total),
        }
    }

    #[tokio::test]
    async fn test_missing_store_reads_empty() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let store = ReadingStore::new(dir.path().join("absent.jsonl"));
        assert!(store.read_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let store = ReadingStore::new(dir.path().join("nested/data.jsonl"));

        for (i, loc) in ["Lobby", "Hall", "Lobby"].iter().enumerate() {
            store.append(&reading(loc, i as i64)).await.unwrap();
        }

        let all = store.read_all().await;
        assert_eq!(all, vec![reading("Lobby", 0), reading("Hall", 1), reading("Lobby", 2)]);
    }

    #[tokio::test]
    async fn test_ensure_exists_is_idempotent() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let store = ReadingStore::new(dir.path().join("data.jsonl"));

        store.ensure_exists().await.unwrap();
        store.append(&reading("Lobby", 1)).await.unwrap();
        store.ensure_exists().await.unwrap();
        assert_eq!(store.read_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_lines_are_skipped() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.jsonl");
        std::fs::write(
            &path,
            "{\"location\":\"Lobby\",\"timestamp\":1,\"wifi_count\":1}\n\
             {not json\n\
             \n\
             {\"location\":\"Hall\",\"timestamp\":\"2025-01-01T00:00:00Z\"}\n",
        )
        .unwrap();

        let all = ReadingStore::new(&path).read_all().await;
        let names: Vec<&str> = all.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(names, ["Lobby", "Hall"]);
        assert_eq!(all[1].total_count, None);
    }

    #[tokio::test]
    async fn test_legacy_array_store() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"[{"location": "Lobby", "timestamp": 5, "wifi_count": 3, "ble_count": 2, "total_count": 5}]"#,
        )
        .unwrap();
        assert_eq!(ReadingStore::new(&path).read_all().await, vec![{
            let mut r = reading("Lobby", 5);
            r.timestamp = Some(json!(5));
            r.wifi_count = Some(3);
            r.ble_count = Some(2);
            r
        }]);

        std::fs::write(&path, "[{\"location\": ").unwrap();
        assert!(ReadingStore::new(&path).read_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(ReadingStore::new(dir.path().join("data.jsonl")));

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.append(&reading("Lobby", i)).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let mut totals: Vec<i64> = store
            .read_all()
            .await
            .iter()
            .filter_map(|r| r.total_count)
            .collect();
        totals.sort_unstable();
        assert_eq!(totals, (0..20).collect::<Vec<_>>());
    }
}

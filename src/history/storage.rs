//! # History Storage
//!
//! Persists dispatch counts to a single JSON file in the XDG data directory.
//!
//! ```text
//! ~/.local/share/opsdeck/history.json
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Number of entries shown by the "Recent Commands" detail view
pub const MAX_RECENT_COMMANDS: usize = 10;

const HISTORY_FILE_NAME: &str = "history.json";

/// How often one label was dispatched from one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub category: String,
    pub label: String,
    pub count: u64,
    pub last_used: DateTime<Utc>,
}

/// Every recorded dispatch, keyed by `category` + label
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchHistory {
    pub entries: HashMap<String, HistoryEntry>,
}

impl DispatchHistory {
    fn key(category: &str, label: &str) -> String {
        format!("{}::{}", category, label)
    }

    pub fn record(&mut self, category: &str, label: &str) {
        let now = Utc::now();
        let entry = self
            .entries
            .entry(Self::key(category, label))
            .or_insert_with(|| HistoryEntry {
                category: category.to_string(),
                label: label.to_string(),
                count: 0,
                last_used: now,
            });
        entry.count += 1;
        entry.last_used = now;
    }

    /// Most dispatched entries first; ties go to the most recent.
    pub fn frequent(&self, limit: usize) -> Vec<&HistoryEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| b.last_used.cmp(&a.last_used))
                .then_with(|| a.label.cmp(&b.label))
        });
        entries.truncate(limit);
        entries
    }
}

/// Dispatch history backed by a JSON file
#[derive(Debug)]
pub struct HistoryTracker {
    path: PathBuf,
    history: DispatchHistory,
}

impl HistoryTracker {
    /// Open the history file in the default data directory.
    pub fn new() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "opsdeck")
            .context("Failed to determine application data directory")?;
        Self::with_storage_dir(dirs.data_dir())
    }

    /// Open the history file inside `storage_dir`, creating the directory.
    ///
    /// A corrupted file is treated as empty history.
    pub fn with_storage_dir(storage_dir: &Path) -> Result<Self> {
        fs::create_dir_all(storage_dir).with_context(|| {
            format!(
                "Failed to create history directory: {}",
                storage_dir.display()
            )
        })?;

        let path = storage_dir.join(HISTORY_FILE_NAME);
        let history = if path.exists() {
            load_history(&path).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable history: {:#}", e);
                DispatchHistory::default()
            })
        } else {
            DispatchHistory::default()
        };

        Ok(Self { path, history })
    }

    /// Record a dispatch and save to disk
    pub fn record(&mut self, category: &str, label: &str) -> Result<()> {
        self.history.record(category, label);
        self.save()
    }

    pub fn frequent(&self, limit: usize) -> Vec<&HistoryEntry> {
        self.history.frequent(limit)
    }

    pub fn is_empty(&self) -> bool {
        self.history.entries.is_empty()
    }

    /// Forget every entry and save the empty history.
    pub fn clear(&mut self) -> Result<()> {
        self.history.entries.clear();
        self.save()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.history)
            .context("Failed to serialize history")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))?;
        Ok(())
    }
}

fn load_history(path: &Path) -> Result<DispatchHistory> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file: {}", path.display()))?;
    let history = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse history file: {}", path.display()))?;
    Ok(history)
}

/// Render the most frequent dispatches as a detail body.
pub fn format_recent(entries: &[&HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No commands dispatched yet.".to_string();
    }
    entries
        .iter()
        .map(|e| {
            format!(
                "{:>4}x  {}/{}  (last {})",
                e.count,
                e.category,
                e.label,
                e.last_used.format("%Y-%m-%d %H:%M")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_counts_per_category_and_label() {
        let mut history = DispatchHistory::default();
        history.record("Vault/Secrets", "Delete");
        history.record("Vault/Secrets", "Delete");
        history.record("Kube", "Delete");
        assert_eq!(history.entries.len(), 2);

        let frequent = history.frequent(1);
        assert_eq!(frequent[0].category, "Vault/Secrets");
        assert_eq!(frequent[0].count, 2);
    }

    #[test]
    fn test_tracker_persists_between_instances() {
        let temp_dir = TempDir::new().expect("create temp dir");
        {
            let mut tracker = HistoryTracker::with_storage_dir(temp_dir.path()).expect("open");
            assert!(tracker.is_empty());
            tracker.record("VPN", "Connect").expect("record");
            tracker.record("VPN", "Connect").expect("record");
            tracker.record("Kube", "Merge").expect("record");
        }

        let tracker = HistoryTracker::with_storage_dir(temp_dir.path()).expect("reopen");
        let frequent = tracker.frequent(MAX_RECENT_COMMANDS);
        assert_eq!(frequent.len(), 2);
        assert_eq!(frequent[0].label, "Connect");
        assert_eq!(frequent[0].count, 2);
    }

    #[test]
    fn test_clear_empties_file() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let mut tracker = HistoryTracker::with_storage_dir(temp_dir.path()).expect("open");
        tracker.record("VPN", "Connect").expect("record");
        tracker.clear().expect("clear");

        let reopened = HistoryTracker::with_storage_dir(temp_dir.path()).expect("reopen");
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_corrupted_history_file() {
        let temp_dir = TempDir::new().expect("create temp dir");
        fs::write(temp_dir.path().join(HISTORY_FILE_NAME), "not valid json").expect("write");

        let tracker = HistoryTracker::with_storage_dir(temp_dir.path()).expect("open");
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_format_recent() {
        assert_eq!(format_recent(&[]), "No commands dispatched yet.");

        let mut history = DispatchHistory::default();
        history.record("VPN", "Connect");
        let text = format_recent(&history.frequent(5));
        assert!(text.contains("1x  VPN/Connect"));
    }
}

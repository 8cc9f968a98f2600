//! Append-only log of city searches.

use std::{
    fs::{self, OpenOptions},
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::{info, warn};

use crate::{
    error::{CoreError, CoreResult},
    model::HistoryRecord,
};

/// Number of records shown by the history view.
pub const HISTORY_LIMIT: usize = 6;

/// Storage for [`HistoryRecord`]s. Records are never updated or removed.
pub trait HistoryStore: Send + Sync + std::fmt::Debug {
    fn append(&self, record: HistoryRecord) -> CoreResult<()>;

    /// Most recent first, at most `limit` records.
    fn recent(&self, limit: usize) -> CoreResult<Vec<HistoryRecord>>;
}

/// Newest first; records captured at the same instant keep insertion order
/// reversed, so the last one written comes first.
fn newest_first(mut records: Vec<HistoryRecord>, limit: usize) -> Vec<HistoryRecord> {
    records.reverse();
    records.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
    records.truncate(limit);
    records
}

#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn append(&self, record: HistoryRecord) -> CoreResult<()> {
        self.records
            .lock()
            .map_err(|_| CoreError::history("history lock poisoned"))?
            .push(record);
        Ok(())
    }

    fn recent(&self, limit: usize) -> CoreResult<Vec<HistoryRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|_| CoreError::history("history lock poisoned"))?
            .clone();
        Ok(newest_first(records, limit))
    }
}

/// One JSON document per line. The file and its parent directory are
/// created on first append.
#[derive(Debug)]
pub struct JsonlHistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonlHistoryStore {
    fn append(&self, record: HistoryRecord) -> CoreResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| CoreError::history("history lock poisoned"))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;

        info!(city = %record.city, path = %self.path.display(), "recorded search");
        Ok(())
    }

    fn recent(&self, limit: usize) -> CoreResult<Vec<HistoryRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(&self.path)?);
        let mut records = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(line = idx + 1, error = %e, "skipping unreadable history line"),
            }
        }

        Ok(newest_first(records, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn record(city: &str, minutes: i64) -> HistoryRecord {
        HistoryRecord {
            city: city.to_string(),
            temperature_c: 12.5,
            main: "Clouds".to_string(),
            description: "few clouds".to_string(),
            captured_at: Utc.with_ymd_and_hms(2026, 3, 7, 9, 0, 0).unwrap()
                + Duration::minutes(minutes),
        }
    }

    #[test]
    fn memory_store_returns_newest_first_capped() {
        let store = MemoryHistoryStore::new();
        for i in 0..8 {
            store.append(record(&format!("City{i}"), i)).unwrap();
        }

        let recent = store.recent(HISTORY_LIMIT).unwrap();
        let cities: Vec<&str> = recent.iter().map(|r| r.city.as_str()).collect();
        assert_eq!(cities, vec!["City7", "City6", "City5", "City4", "City3", "City2"]);
    }

    #[test]
    fn repeated_cities_are_kept() {
        let store = MemoryHistoryStore::new();
        store.append(record("Paris", 0)).unwrap();
        store.append(record("Paris", 1)).unwrap();

        assert_eq!(store.recent(HISTORY_LIMIT).unwrap().len(), 2);
    }

    #[test]
    fn same_instant_prefers_latest_write() {
        let store = MemoryHistoryStore::new();
        store.append(record("First", 0)).unwrap();
        store.append(record("Second", 0)).unwrap();

        assert_eq!(store.recent(1).unwrap()[0].city, "Second");
    }
}

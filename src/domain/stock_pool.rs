//! The stock pool: a durable, append-only log of passing screen results.
//!
//! The whole pool is read into memory when opened and rewritten in full on
//! every [`StockPool::save`]. Entries are never deduplicated; the same
//! symbol/strategy pair appears once per time it passed.
//!
//! On disk the pool is a pretty-printed JSON array of
//! `{symbol, strategy, score, timestamp, metadata}` objects.

use crate::domain::error::ScreenerError;
use crate::domain::strategy::{Metadata, StrategyResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPoolEntry {
    pub symbol: String,
    pub strategy: String,
    pub score: f64,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub metadata: Metadata,
}

impl StockPoolEntry {
    pub fn from_result(result: &StrategyResult, timestamp: DateTime<Utc>) -> Self {
        Self {
            symbol: result.symbol.clone(),
            strategy: result.strategy.clone(),
            score: result.score,
            timestamp,
            metadata: result.metadata.clone(),
        }
    }
}

#[derive(Debug)]
pub struct StockPool {
    path: PathBuf,
    entries: Vec<StockPoolEntry>,
}

impl StockPool {
    /// Open the pool backed by `path`.
    ///
    /// An existing file is loaded in full; a missing one yields an empty pool and
    /// its parent directory is created so a later save can succeed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ScreenerError> {
        let path = path.into();

        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| persistence(&path, e))?;
            }
            return Ok(Self {
                path,
                entries: Vec::new(),
            });
        }

        let content = fs::read_to_string(&path).map_err(|e| persistence(&path, e))?;
        let entries = serde_json::from_str(&content).map_err(|e| persistence(&path, e))?;
        Ok(Self { path, entries })
    }

    /// Append `result`, stamped with the current UTC time. In memory only.
    pub fn add(&mut self, result: &StrategyResult) {
        self.entries.push(StockPoolEntry::from_result(result, Utc::now()));
    }

    /// Rewrite the backing file with every in-memory entry.
    ///
    /// The data is written to a sibling temp file and renamed over the target, so
    /// an interrupted save leaves the previous file intact.
    pub fn save(&self) -> Result<(), ScreenerError> {
        let json = serde_json::to_string_pretty(&self.entries).map_err(|e| persistence(&self.path, e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| persistence(&self.path, e))?;
        }

        let tmp_path = temp_path(&self.path);
        let write_tmp = || -> std::io::Result<()> {
            let mut file = File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()
        };
        write_tmp().map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            persistence(&self.path, e)
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            persistence(&self.path, format!("atomic rename failed: {e}"))
        })
    }

    /// Drop every entry and delete the backing file if it exists.
    pub fn clear(&mut self) -> Result<(), ScreenerError> {
        self.entries.clear();
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| persistence(&self.path, e))?;
        }
        Ok(())
    }

    pub fn entries(&self) -> &[StockPoolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn persistence(path: &Path, reason: impl ToString) -> ScreenerError {
    ScreenerError::Persistence {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// RFC 3339 timestamps, always written in UTC with a `Z` suffix.
///
/// Naive ISO-8601 timestamps (no offset) are accepted on read and taken as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

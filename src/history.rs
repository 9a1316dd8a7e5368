//! Daily study totals persisted as a flat JSON object.
//!
//! The file maps `YYYY-MM-DD` to the seconds studied that day:
//!
//! ```json
//! {
//!     "2024-03-01": 5400,
//!     "2024-03-02": 1800
//! }
//! ```
//!
//! A missing file is the first-run state and a malformed one is treated the
//! same way: both load as an empty history.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::app_dirs::AppDirs;
use crate::error::{Result, TrackerError};
use crate::util::format_hms;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Calendar day in the local time zone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Seconds studied per calendar day, ordered by date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryRecord {
    days: BTreeMap<String, u64>,
}

impl HistoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn get(&self, day: &str) -> u64 {
        self.days.get(day).copied().unwrap_or(0)
    }

    pub fn on(&self, date: NaiveDate) -> u64 {
        self.get(&date_key(date))
    }

    /// Add seconds to a day's total and return the new total.
    pub fn add(&mut self, date: NaiveDate, seconds: u64) -> u64 {
        let total = self.days.entry(date_key(date)).or_insert(0);
        *total = total.saturating_add(seconds);
        *total
    }

    pub fn total_seconds(&self) -> u64 {
        self.days.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.days.iter().map(|(day, secs)| (day.as_str(), *secs))
    }

    /// `(date, HH:MM:SS)` rows, oldest first.
    pub fn rows(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(day, secs)| (day.to_string(), format_hms(secs)))
            .collect()
    }

    /// Pretty-printed JSON with four-space indentation.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(buf)
    }

    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

impl FromIterator<(String, u64)> for HistoryRecord {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

/// Load/save contract for study history.
///
/// Every recorded session is a full load-modify-save cycle with no locking;
/// a single process owns the history.
pub trait HistoryStore {
    fn load(&self) -> Result<HistoryRecord>;

    /// Overwrite the persisted history with `record`.
    fn save(&self, record: &HistoryRecord) -> Result<()>;

    /// Add `elapsed_seconds` to the total for `date`.
    ///
    /// Returns the day's new total, or `None` when there was nothing to record.
    fn record_session_on(&self, date: NaiveDate, elapsed_seconds: u64) -> Result<Option<u64>> {
        if elapsed_seconds == 0 {
            return Ok(None);
        }
        let mut record = self.load()?;
        let total = record.add(date, elapsed_seconds);
        self.save(&record)?;
        info!(
            day = %date_key(date),
            added = elapsed_seconds,
            total,
            "study session recorded"
        );
        Ok(Some(total))
    }

    /// Add `elapsed_seconds` to today's total (local time).
    fn record_session(&self, elapsed_seconds: u64) -> Result<Option<u64>> {
        self.record_session_on(local_today(), elapsed_seconds)
    }
}

#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::history_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl Default for FileHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> Result<HistoryRecord> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no history file yet");
                return Ok(HistoryRecord::default());
            }
            Err(e) => return Err(TrackerError::persistence(&self.path, e)),
        };

        match HistoryRecord::from_json(&bytes) {
            Ok(record) => Ok(record),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "history file is malformed, starting from empty history"
                );
                Ok(HistoryRecord::default())
            }
        }
    }

    fn save(&self, record: &HistoryRecord) -> Result<()> {
        let data = record.to_json()?;
        let parent = self.parent_dir();
        fs::create_dir_all(&parent).map_err(|e| TrackerError::persistence(&parent, e))?;

        let mut temp =
            NamedTempFile::new_in(&parent).map_err(|e| TrackerError::persistence(&parent, e))?;
        if let Err(e) = temp.write_all(&data).and_then(|_| temp.flush()) {
            return Err(TrackerError::persistence(temp.path(), e));
        }
        temp.persist(&self.path)
            .map_err(|e| TrackerError::persistence(&self.path, e.error))?;

        debug!(path = %self.path.display(), days = record.len(), "history saved");
        Ok(())
    }
}

/// History kept in memory only; nothing touches the filesystem.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    record: RefCell<HistoryRecord>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: HistoryRecord) -> Self {
        Self {
            record: RefCell::new(record),
        }
    }

    pub fn snapshot(&self) -> HistoryRecord {
        self.record.borrow().clone()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<HistoryRecord> {
        Ok(self.snapshot())
    }

    fn save(&self, record: &HistoryRecord) -> Result<()> {
        *self.record.borrow_mut() = record.clone();
        Ok(())
    }
}

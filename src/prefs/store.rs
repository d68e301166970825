use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const LANG_KEY: &str = "lang";
pub const THEME_KEY: &str = "theme";

/// Small named string preferences with an expiry.
pub trait PreferenceStore: Send + Sync {
    /// Current value, or `None` when unset or expired.
    fn get(&mut self, name: &str) -> Option<String>;

    fn set(&mut self, name: &str, value: &str, ttl: Duration) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Preference lifetime of `days` days.
pub fn ttl_days(days: i64) -> Result<Duration> {
    Duration::try_days(days)
        .ok_or_else(|| Error::config(format!("preference lifetime of {days} days is out of range")))
}

/// The instant a preference set now with `ttl` expires.
pub fn expiry(ttl: Duration) -> Result<DateTime<Utc>> {
    Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| Error::config(format!("preference lifetime {ttl} is out of range")))
}

fn lookup(entries: &mut HashMap<String, Entry>, name: &str) -> Option<String> {
    let now = Utc::now();
    match entries.get(name) {
        Some(entry) if entry.is_live(now) => Some(entry.value.clone()),
        Some(_) => {
            debug!("Preference {} expired", name);
            entries.remove(name);
            None
        }
        None => None,
    }
}

/// Preferences that live as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&mut self, name: &str) -> Option<String> {
        lookup(&mut self.entries, name)
    }

    fn set(&mut self, name: &str, value: &str, ttl: Duration) -> Result<()> {
        self.entries.insert(
            name.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: expiry(ttl)?,
            },
        );
        Ok(())
    }
}

/// Preferences persisted as JSON, written through on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, Entry>,
}

impl FileStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring preference file: {}", e);
                HashMap::new()
            }
        };
        Self { path, entries }
    }

    fn read(path: &Path) -> Result<HashMap<String, Entry>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::preferences(path, e.to_string()))
    }

    fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&mut self, name: &str) -> Option<String> {
        lookup(&mut self.entries, name)
    }

    fn set(&mut self, name: &str, value: &str, ttl: Duration) -> Result<()> {
        self.entries.insert(
            name.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: expiry(ttl)?,
            },
        );
        self.write()
    }
}

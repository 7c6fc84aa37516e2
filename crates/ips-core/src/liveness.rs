//! Service start stamp kept in a small key-value store.
//!
//! The stamp is `0` when the service is not running (or its stop was
//! acknowledged) and the start time in epoch millis otherwise. Interpreting
//! the stamp is up to the application shell.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::clock::Clock;
use crate::config::ShareConfig;

/// Key under which the start stamp is stored.
pub const START_STAMP_KEY: &str = "service_start_timestamp";

/// Minimal persisted key-value store.
pub trait KeyValueStore {
    fn get_i64(&self, key: &str) -> Result<Option<i64>>;
    fn put_i64(&mut self, key: &str, value: i64) -> Result<()>;
}

/// JSON object on disk; the whole file is rewritten on every put.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured state file location.
    pub fn from_config(cfg: &ShareConfig) -> Result<Self> {
        Ok(Self::new(cfg.state_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, i64>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e).with_context(|| format!("read state: {}", self.path.display())),
        };
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse state: {}", self.path.display()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.load()?.get(key).copied())
    }

    fn put_i64(&mut self, key: &str, value: i64) -> Result<()> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value);
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&map).context("serialize state")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("write state: {}", self.path.display()))?;
        Ok(())
    }
}

/// Accessors for the service start stamp.
pub struct ServiceStamp<S> {
    store: S,
}

impl<S: KeyValueStore> ServiceStamp<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Recorded start time, or `0` when none is recorded.
    pub fn started_at(&self) -> Result<i64> {
        Ok(self.store.get_i64(START_STAMP_KEY)?.unwrap_or(0))
    }

    pub fn record_start(&mut self, clock: &dyn Clock) -> Result<()> {
        let now = clock.now_millis();
        tracing::debug!(started_at = now, "recording service start");
        self.store.put_i64(START_STAMP_KEY, now)
    }

    pub fn acknowledge_stop(&mut self) -> Result<()> {
        tracing::debug!("clearing service start stamp");
        self.store.put_i64(START_STAMP_KEY, 0)
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    #[test]
    fn missing_file_reads_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let stamp = ServiceStamp::new(JsonFileStore::new(dir.path().join("state.json")));
        assert_eq!(stamp.started_at().unwrap(), 0);
    }

    #[test]
    fn start_and_stop_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut stamp = ServiceStamp::new(JsonFileStore::new(&path));
        stamp.record_start(&FixedClock(1_700_000_000_000)).unwrap();

        let reopened = ServiceStamp::new(JsonFileStore::new(&path));
        assert_eq!(reopened.started_at().unwrap(), 1_700_000_000_000);

        let mut reopened = reopened;
        reopened.acknowledge_stop().unwrap();
        let again = ServiceStamp::new(JsonFileStore::new(&path));
        assert_eq!(again.started_at().unwrap(), 0);
    }

    #[test]
    fn put_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("state.json"));
        store.put_i64("other", 7).unwrap();
        store.put_i64(START_STAMP_KEY, 3).unwrap();
        assert_eq!(store.get_i64("other").unwrap(), Some(7));
        assert_eq!(store.get_i64(START_STAMP_KEY).unwrap(), Some(3));
    }

    #[test]
    fn store_from_config_uses_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ShareConfig {
            state_file: Some(dir.path().join("s.json")),
            ..ShareConfig::default()
        };
        let store = JsonFileStore::from_config(&cfg).unwrap();
        assert_eq!(store.path(), dir.path().join("s.json"));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, b"{not json").unwrap();
        let stamp = ServiceStamp::new(JsonFileStore::new(&path));
        assert!(stamp.started_at().is_err());
    }
}

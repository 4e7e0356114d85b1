use anyhow::{Context, Result};
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::stats::{PowerUpStats, Scores};

pub const SCORES_KEY: &str = "scores";
pub const TITLES_KEY: &str = "titles";
pub const POWER_UP_STATS_KEY: &str = "power_up_stats";

/// String storage under fixed logical keys.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        JsonFileStore {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.path(key);
        fs::write(&path, value).with_context(|| format!("writing {}", path.display()))
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed access to saved scores, titles and power-up stats. Nothing here
/// is fatal: bad or missing data loads as the default and failed writes
/// are only logged.
#[derive(Clone, Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Persistence { store }
    }

    pub fn load_scores(&self) -> Scores {
        self.load(SCORES_KEY)
    }

    pub fn save_scores(&mut self, scores: &Scores) {
        self.save(SCORES_KEY, scores)
    }

    pub fn load_titles(&self) -> Vec<String> {
        self.load(TITLES_KEY)
    }

    pub fn save_titles(&mut self, titles: &[String]) {
        self.save(TITLES_KEY, titles)
    }

    pub fn load_power_up_stats(&self) -> PowerUpStats {
        self.load(POWER_UP_STATS_KEY)
    }

    pub fn save_power_up_stats(&mut self, stats: &PowerUpStats) {
        self.save(POWER_UP_STATS_KEY, stats)
    }

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                warn!("Error loading {}, using defaults: {:#}", key, e);
                T::default()
            }
        }
    }

    fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw).with_context(|| format!("parsing {}", key))?;
        Ok(Some(value))
    }

    fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .context("serializing")
            .and_then(|json| self.store.set(key, &json));
        if let Err(e) = result {
            error!("Error saving {}: {:#}", key, e);
        }
    }
}

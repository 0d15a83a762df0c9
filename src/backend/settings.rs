//! Node settings document
//!
//! A JSON file shaped `{"config": {...}}` shared with the rest of the
//! appliance. Reads are cached for a short window because every screen
//! consults it while building; writes take a backup copy first.

use crate::config::SettingsConfig;
use crate::error::{Result, SshuiError};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How long a loaded document is trusted before re-reading
pub const FRESHNESS: Duration = Duration::from_secs(2);

/// Encoding used by the appliance for booleans
pub fn bool_value(flag: bool) -> Value {
    Value::String(if flag { "TRUE" } else { "FALSE" }.to_string())
}

#[derive(Debug)]
struct Cached {
    loaded_at: Instant,
    document: Value,
}

#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    backup: PathBuf,
    cache: Mutex<Option<Cached>>,
}

impl SettingsStore {
    pub fn new(config: &SettingsConfig) -> Self {
        Self::with_paths(&config.path, &config.backup)
    }

    pub fn with_paths(path: &Path, backup: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            backup: backup.to_path_buf(),
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Cached>>> {
        self.cache
            .lock()
            .map_err(|_| SshuiError::Settings("settings cache poisoned".to_string()))
    }

    fn read_file(&self) -> Result<Value> {
        let contents = std::fs::read_to_string(&self.path)?;
        let document: Value = serde_json::from_str(&contents)?;
        Ok(document)
    }

    /// Whole document, from cache while fresh
    pub fn load(&self) -> Result<Value> {
        let mut cache = self.lock()?;
        if let Some(cached) = cache.as_ref() {
            if cached.loaded_at.elapsed() < FRESHNESS {
                return Ok(cached.document.clone());
            }
        }
        let document = self.read_file()?;
        *cache = Some(Cached {
            loaded_at: Instant::now(),
            document: document.clone(),
        });
        Ok(document)
    }

    /// Look up a value below `config`, e.g. `["banlists", "dns"]`
    pub fn get(&self, path: &[&str]) -> Option<Value> {
        let document = match self.load() {
            Ok(document) => document,
            Err(e) => {
                debug!("Settings unavailable: {}", e);
                return None;
            }
        };
        let mut node = document.get("config")?;
        for key in path {
            node = node.get(key)?;
        }
        Some(node.clone())
    }

    pub fn get_str(&self, path: &[&str]) -> Option<String> {
        match self.get(path)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn get_i64(&self, path: &[&str]) -> Option<i64> {
        match self.get(path)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get_bool(&self, path: &[&str]) -> bool {
        match self.get(path) {
            Some(Value::Bool(b)) => b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Set `key` inside the object at `section` below `config` and save
    ///
    /// Booleans are stored in the appliance's TRUE/FALSE encoding.
    pub fn set(&self, section: &[&str], key: &str, value: Value) -> Result<()> {
        let value = match value {
            Value::Bool(flag) => bool_value(flag),
            other => other,
        };

        let mut cache = self.lock()?;
        let mut document = self.read_file()?;
        let mut node = document
            .get_mut("config")
            .ok_or_else(|| SshuiError::Settings("document has no config object".to_string()))?;
        for name in section {
            let object = node
                .as_object_mut()
                .ok_or_else(|| SshuiError::Settings(format!("'{}' is not an object", name)))?;
            node = object
                .entry(name.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        node.as_object_mut()
            .ok_or_else(|| SshuiError::Settings(format!("cannot set '{}'", key)))?
            .insert(key.to_string(), value);

        self.save(&document)?;
        *cache = Some(Cached {
            loaded_at: Instant::now(),
            document,
        });
        debug!("Saved setting {}", key);
        Ok(())
    }

    fn save(&self, document: &Value) -> Result<()> {
        if let Err(e) = std::fs::copy(&self.path, &self.backup) {
            warn!("Could not back up {}: {}", self.path.display(), e);
        }
        let contents = serde_json::to_string_pretty(document)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

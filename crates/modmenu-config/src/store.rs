use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;

use modmenu_json::{decode, encode, Map, Value};

/// Flat string-keyed settings map persisted as a single JSON object.
pub type ConfigMap = Map;

/// File-backed settings store.
///
/// Every operation is whole-file read-modify-write; there is no locking
/// and no partial write. A missing or unreadable file is "absent", not
/// an error: the caller seeds it with [`ConfigStore::check_and_create`].
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full stored map, or None if the file is absent or
    /// unreadable. A file that opens but does not parse is treated the
    /// same way (after a warning) so the next bootstrap rewrites it.
    pub fn read_map(&self) -> Option<ConfigMap> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        match decode(&text) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) => {
                warn!("config file {} is not a JSON object, ignoring it", self.path.display());
                None
            }
            Err(e) => {
                warn!("config file {} is corrupt ({}), ignoring it", self.path.display(), e);
                None
            }
        }
    }

    /// Encode and write the full map.
    pub fn write_map(&self, map: &ConfigMap) -> Result<()> {
        let text = encode(&Value::Object(map.clone()))
            .with_context(|| format!("encoding config for {}", self.path.display()))?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("writing config file {}", self.path.display()))?;
        Ok(())
    }

    /// Seed an absent file with `defaults`, or one-way merge them into an
    /// existing file: keys missing from the stored map are added with
    /// their default value; stored keys are never overwritten or removed.
    ///
    /// Returns false on write failure; callers retry (see
    /// [`ConfigStore::bootstrap`](crate::retry)).
    pub fn check_and_create(&self, defaults: &ConfigMap) -> bool {
        let merged = match self.read_map() {
            None => defaults.clone(),
            Some(mut map) => {
                for (key, value) in defaults {
                    if !map.contains_key(key) {
                        map.insert(key.clone(), value.clone());
                    }
                }
                map
            }
        };
        match self.write_map(&merged) {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to initialize config: {:#}", e);
                false
            }
        }
    }

    /// Look up one key in the stored map.
    pub fn read(&self, key: &str) -> Option<Value> {
        self.read_map().and_then(|mut map| map.remove(key))
    }

    /// Set one key and rewrite the file. Fire-and-forget: a write
    /// failure is logged, and the new value is simply lost.
    pub fn save(&self, key: &str, value: Value) {
        let mut map = self.read_map().unwrap_or_default();
        map.insert(key.to_string(), value);
        if let Err(e) = self.write_map(&map) {
            warn!("failed to save config key '{}': {:#}", key, e);
        }
    }

    /// Overwrite the file with `defaults`, dropping every stored key not
    /// present in them. The one operation allowed to lose keys.
    pub fn reset(&self, defaults: &ConfigMap) {
        if let Err(e) = self.write_map(defaults) {
            warn!("failed to reset config: {:#}", e);
        }
    }
}

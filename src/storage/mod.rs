use std::{
    collections::BTreeMap,
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".expense_core";
const CACHE_FILE: &str = "budget_cache.json";
const TMP_SUFFIX: &str = "tmp";

/// Application data directory, defaulting to `~/.expense_core` and
/// overridable through `EXPENSE_CORE_HOME`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("EXPENSE_CORE_HOME") {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Locally cached budget ceilings keyed by category id.
///
/// This mirrors the figures the views edit in place; authoritative spend is
/// always recomputed from the record set, never stored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BudgetCache {
    #[serde(default)]
    pub ceilings: BTreeMap<String, f64>,
}

impl BudgetCache {
    pub fn set(&mut self, category_id: impl Into<String>, ceiling: f64) {
        self.ceilings.insert(category_id.into(), ceiling);
    }

    pub fn get(&self, category_id: &str) -> Option<f64> {
        self.ceilings.get(category_id).copied()
    }

    pub fn remove(&mut self, category_id: &str) -> Option<f64> {
        self.ceilings.remove(category_id)
    }
}

/// Loads and saves the budget cache under a fixed application directory.
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CACHE_FILE),
        })
    }

    /// Missing cache file reads as an empty cache, not an error.
    pub fn load(&self) -> Result<BudgetCache> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(BudgetCache::default())
        }
    }

    pub fn save(&self, cache: &BudgetCache) -> Result<()> {
        let json = serde_json::to_string_pretty(cache)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "budget cache saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub(crate) fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_returns_empty_cache_when_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let cache = store.load().unwrap();
        assert!(cache.ceilings.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::with_base_dir(dir.path().to_path_buf()).unwrap();

        let mut cache = BudgetCache::default();
        cache.set("nubank", 1200.0);
        cache.set("shell", 400.0);
        store.save(&cache).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, cache);
        assert_eq!(loaded.get("nubank"), Some(1200.0));
        assert_eq!(loaded.get("missing"), None);
    }
}

//! Local caching of the client's query state.
//!
//! The view engine takes a [`QueryState`] as a plain argument; this module is
//! the key-value collaborator that remembers it between runs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::view::QueryState;

/// Key under which the query state is stored.
pub const QUERY_STATE_KEY: &str = "sms-students";

/// A string key-value store.
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Preferences kept as one JSON object in a file.
#[derive(Debug, Clone)]
pub struct JsonFilePreferences {
    path: PathBuf,
}

impl JsonFilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file reads as empty. Any other failure, including a file that
    /// is not a JSON object, is an error so `save` never clobbers it.
    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        let mut all = self.read_all()?;
        all.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&all)?)?;
        Ok(())
    }
}

/// Saved query state, or defaults when nothing usable is stored.
pub fn load_query_state(store: &dyn PreferenceStore) -> QueryState {
    match store.load(QUERY_STATE_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "stored query state is corrupt, using defaults");
            QueryState::default()
        }),
        Ok(None) => QueryState::default(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read query state, using defaults");
            QueryState::default()
        }
    }
}

pub fn save_query_state(store: &mut dyn PreferenceStore, query: &QueryState) -> Result<()> {
    let raw = serde_json::to_string(query)?;
    store.save(QUERY_STATE_KEY, &raw)
}

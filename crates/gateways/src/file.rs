use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::warn;

use crate::PersistentKeyStore;

/// JSON-file key store, the localStorage analogue for a native shell. The map
/// is held in memory and written back on every mutation; read trouble at open
/// time is an error, write trouble afterwards is logged and the in-memory
/// view stays authoritative for the rest of the process.
pub struct FileKeyStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileKeyStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let data = fs::read_to_string(&path)
                .with_context(|| format!("failed to read state file {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("failed to parse state file {}", path.display()))?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        let result = (|| -> Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create state directory {}", parent.display())
                })?;
            }
            let data = serde_json::to_string_pretty(entries)?;
            fs::write(&self.path, data)
                .with_context(|| format!("failed to write state file {}", self.path.display()))?;
            Ok(())
        })();
        if let Err(err) = result {
            warn!(error = %err, "persisting key store failed");
        }
    }
}

impl PersistentKeyStore for FileKeyStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("key store poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().expect("key store poisoned");
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().expect("key store poisoned");
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::warn;

use super::TokenStorage;
use crate::models::TokenKind;

/// Keeps tokens in a small JSON document (`{"access_token": "...", ...}`)
/// so a session survives restarts of the binary.
pub struct FileTokenStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileTokenStorage {
    pub fn new(path: &Path) -> Self {
        FileTokenStorage {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse {}: {}", self.path.display(), e)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(format!("Failed to read {}: {}", self.path.display(), e)),
        }
    }

    fn save(&self, tokens: &BTreeMap<String, String>) -> Result<(), String> {
        if tokens.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => {
                    Err(format!("Failed to remove {}: {}", self.path.display(), e))
                }
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
            }
        }
        let contents = serde_json::to_string_pretty(tokens)
            .map_err(|e| format!("Failed to serialize tokens: {}", e))?;

        // Readers see either the old document or the new one, never a partial write.
        let tmp = self.tmp_path();
        fs::write(&tmp, contents)
            .map_err(|e| format!("Failed to write {}: {}", tmp.display(), e))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            format!("Failed to replace {}: {}", self.path.display(), e)
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, String> {
        self.lock
            .lock()
            .map_err(|_| "token file lock poisoned".to_string())
    }

    fn update<F>(&self, change: F) -> Result<(), String>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.lock()?;
        // A damaged file must not block writing a fresh session over it.
        let mut tokens = self.load().unwrap_or_else(|e| {
            warn!("Discarding unreadable token file: {}", e);
            BTreeMap::new()
        });
        change(&mut tokens);
        self.save(&tokens)
    }
}

impl TokenStorage for FileTokenStorage {
    fn get(&self, kind: TokenKind) -> Option<String> {
        let loaded = self.lock().and_then(|_guard| self.load());
        match loaded {
            Ok(mut tokens) => tokens.remove(kind.key()),
            Err(e) => {
                warn!("Treating {} as absent: {}", kind.key(), e);
                None
            }
        }
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<(), String> {
        self.update(|tokens| {
            tokens.insert(kind.key().to_string(), value.to_string());
        })
    }

    fn remove(&self, kind: TokenKind) -> Result<(), String> {
        self.update(|tokens| {
            tokens.remove(kind.key());
        })
    }

    fn is_persistent(&self) -> bool {
        true
    }
}

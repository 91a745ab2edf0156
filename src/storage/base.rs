use std::sync::Arc;

use tracing::{debug, info};

use super::{file_storage::FileTokenStorage, memory_storage::MemoryTokenStorage};
use crate::config::StorageConfig;
use crate::models::TokenKind;

/// The TokenStorage trait abstracts where session tokens live (get, set, remove).
///
/// The session store is the only writer; the request gateway reads the
/// access token before every call.
pub trait TokenStorage: Send + Sync {
    fn get(&self, kind: TokenKind) -> Option<String>;
    fn set(&self, kind: TokenKind, value: &str) -> Result<(), String>;
    fn remove(&self, kind: TokenKind) -> Result<(), String>;

    /// Removes both tokens. Every removal is attempted even if one fails.
    fn clear(&self) -> Result<(), String> {
        let errors: Vec<String> = TokenKind::ALL
            .iter()
            .filter_map(|kind| self.remove(*kind).err())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("; "))
        }
    }

    /// Whether tokens outlive the process, i.e. whether a later run can
    /// restore this session.
    fn is_persistent(&self) -> bool {
        false
    }
}

/// Creates a concrete storage implementation based on the StorageConfig.
pub fn create_storage(config: &StorageConfig) -> Arc<dyn TokenStorage> {
    match config {
        StorageConfig::Memory => {
            debug!("Using in-memory token storage.");
            Arc::new(MemoryTokenStorage::new())
        }
        StorageConfig::File(file_config) => {
            info!(
                "Using file token storage at '{}'.",
                file_config.path.display()
            );
            Arc::new(FileTokenStorage::new(&file_config.path))
        }
    }
}

use std::collections::HashMap;
use std::sync::RwLock;

use super::TokenStorage;
use crate::models::TokenKind;

/// Process-scoped token slots, the equivalent of a browser tab's session storage.
#[derive(Default)]
pub struct MemoryTokenStorage {
    slots: RwLock<HashMap<TokenKind, String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with tokens, e.g. a session carried over from elsewhere.
    pub fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
        let mut slots = HashMap::new();
        if let Some(token) = access {
            slots.insert(TokenKind::Access, token.to_string());
        }
        if let Some(token) = refresh {
            slots.insert(TokenKind::Refresh, token.to_string());
        }
        MemoryTokenStorage {
            slots: RwLock::new(slots),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn get(&self, kind: TokenKind) -> Option<String> {
        self.slots
            .read()
            .ok()
            .and_then(|slots| slots.get(&kind).cloned())
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<(), String> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| "token storage lock poisoned".to_string())?;
        slots.insert(kind, value.to_string());
        Ok(())
    }

    fn remove(&self, kind: TokenKind) -> Result<(), String> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| "token storage lock poisoned".to_string())?;
        slots.remove(&kind);
        Ok(())
    }
}

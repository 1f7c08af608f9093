//! In-memory registry of pending confirmations.
//!
//! A token lives from the moment a unit requests approval until the
//! matching decision is consumed. Tokens are never garbage-collected
//! here; callers enumerate `pending()` and `expire()` what they no
//! longer want.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::stage::StagePath;

/// Everything needed to resume a suspended unit correctly, exactly once.
#[derive(Debug, Clone)]
pub struct SuspensionToken {
    pub confirmation_id: String,
    /// Node in the stage tree awaiting resumption; bound by the executor
    /// when it records the checkpoint.
    pub stage_path: StagePath,
    /// Context for the external approver
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

impl SuspensionToken {
    pub fn new(confirmation_id: impl Into<String>, payload: Value) -> Self {
        Self {
            confirmation_id: confirmation_id.into(),
            stage_path: StagePath::new(),
            payload,
            created_at: Utc::now(),
        }
    }
}

#[derive(Default)]
pub struct SuspensionRegistry {
    tokens: Mutex<HashMap<String, SuspensionToken>>,
}

impl SuspensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, token: SuspensionToken) {
        let mut tokens = self.tokens.lock().unwrap_or_else(|e| e.into_inner());
        tokens.insert(token.confirmation_id.clone(), token);
    }

    pub fn lookup(&self, confirmation_id: &str) -> Option<SuspensionToken> {
        self.tokens
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(confirmation_id)
            .cloned()
    }

    /// Remove and return a token. Atomic with respect to a single resume:
    /// a confirmation id is consumable at most once.
    pub fn consume(&self, confirmation_id: &str) -> Option<SuspensionToken> {
        self.tokens
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(confirmation_id)
    }

    /// Stamp the stage path onto a registered token.
    pub fn bind_path(&self, confirmation_id: &str, path: &[usize]) -> bool {
        let mut tokens = self.tokens.lock().unwrap_or_else(|e| e.into_inner());
        match tokens.get_mut(confirmation_id) {
            Some(token) => {
                token.stage_path = path.to_vec();
                true
            }
            None => false,
        }
    }

    /// All outstanding tokens, oldest first.
    pub fn pending(&self) -> Vec<SuspensionToken> {
        let tokens = self.tokens.lock().unwrap_or_else(|e| e.into_inner());
        let mut pending: Vec<SuspensionToken> = tokens.values().cloned().collect();
        pending.sort_by_key(|token| token.created_at);
        pending
    }

    /// Discard a token without resuming. Returns whether it existed.
    pub fn expire(&self, confirmation_id: &str) -> bool {
        self.consume(confirmation_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tokens.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_and_lookup() {
        let registry = SuspensionRegistry::new();
        registry.register(SuspensionToken::new(
            "confirm-1",
            json!({"total_cost": 1500.0}),
        ));

        let token = registry.lookup("confirm-1").unwrap();
        assert_eq!(token.payload["total_cost"], 1500.0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_consume_is_at_most_once() {
        let registry = SuspensionRegistry::new();
        registry.register(SuspensionToken::new("confirm-1", json!(null)));

        assert!(registry.consume("confirm-1").is_some());
        assert!(registry.consume("confirm-1").is_none());
        assert!(registry.lookup("confirm-1").is_none());
    }

    #[test]
    fn test_unknown_id() {
        let registry = SuspensionRegistry::new();
        assert!(registry.lookup("never-issued").is_none());
        assert!(registry.consume("never-issued").is_none());
        assert!(!registry.expire("never-issued"));
    }

    #[test]
    fn test_bind_path() {
        let registry = SuspensionRegistry::new();
        registry.register(SuspensionToken::new("confirm-1", json!(null)));

        assert!(registry.bind_path("confirm-1", &[3, 0]));
        assert_eq!(registry.lookup("confirm-1").unwrap().stage_path, vec![3, 0]);
        assert!(!registry.bind_path("missing", &[0]));
    }

    #[test]
    fn test_pending_enumerates_orphans() {
        let registry = SuspensionRegistry::new();
        registry.register(SuspensionToken::new("confirm-1", json!(1)));
        registry.register(SuspensionToken::new("confirm-2", json!(2)));

        assert_eq!(registry.pending().len(), 2);

        assert!(registry.expire("confirm-1"));
        let remaining = registry.pending();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].confirmation_id, "confirm-2");
    }
}

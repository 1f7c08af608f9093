//! Resumable checkpoints for suspended runs.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use voyages_core::{Blackboard, TripRequest};

use crate::stage::StagePath;

/// The minimal state kept alive while a run waits for a decision.
///
/// `completed` holds the paths of every finished leaf stage; on resume
/// the executor re-walks the tree and skips exactly those, which covers
/// sequence prefixes and finished parallel siblings alike.
pub struct RunCheckpoint {
    pub run_id: Uuid,
    pub request: TripRequest,
    pub board: Blackboard,
    pub confirmation_id: String,
    pub resume_cursor: StagePath,
    pub completed: HashSet<StagePath>,
    pub created_at: DateTime<Utc>,
}

/// Checkpoints keyed by confirmation id, owned by the executor.
#[derive(Default)]
pub(crate) struct CheckpointStore {
    inner: Mutex<HashMap<String, RunCheckpoint>>,
}

impl CheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, checkpoint: RunCheckpoint) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.insert(checkpoint.confirmation_id.clone(), checkpoint);
    }

    /// Remove and return; a checkpoint resumes at most once.
    pub fn take(&self, confirmation_id: &str) -> Option<RunCheckpoint> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(confirmation_id)
    }

    /// Drop every checkpoint belonging to a run, returning their
    /// confirmation ids.
    pub fn remove_run(&self, run_id: Uuid) -> Vec<String> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let ids: Vec<String> = inner
            .iter()
            .filter(|(_, checkpoint)| checkpoint.run_id == run_id)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &ids {
            inner.remove(id);
        }
        ids
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkpoint(run_id: Uuid, confirmation_id: &str) -> RunCheckpoint {
        RunCheckpoint {
            run_id,
            request: TripRequest::new("test", "Bali, Indonesia"),
            board: Blackboard::new(),
            confirmation_id: confirmation_id.to_string(),
            resume_cursor: vec![3],
            completed: HashSet::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_take_is_at_most_once() {
        let store = CheckpointStore::new();
        let run_id = Uuid::new_v4();
        store.insert(checkpoint(run_id, "confirm-1"));

        assert!(store.take("confirm-1").is_some());
        assert!(store.take("confirm-1").is_none());
    }

    #[test]
    fn test_remove_run_only_touches_that_run() {
        let store = CheckpointStore::new();
        let run_a = Uuid::new_v4();
        let run_b = Uuid::new_v4();
        store.insert(checkpoint(run_a, "confirm-a"));
        store.insert(checkpoint(run_b, "confirm-b"));

        let removed = store.remove_run(run_a);
        assert_eq!(removed, vec!["confirm-a".to_string()]);
        assert_eq!(store.len(), 1);
        assert!(store.take("confirm-b").is_some());
    }
}

//! Shared blackboard threaded through a pipeline run.
//!
//! Slots are written once by the stage that owns them and read by any later
//! stage. Readers must tolerate a missing slot; writers must never overwrite.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::error::{CoreError, Result};

/// Ordered copy of the blackboard contents, used for run results and
/// checkpoints.
pub type BlackboardSnapshot = BTreeMap<String, Value>;

/// Write-once key-value state shared by all stages of a run.
///
/// Cloning is cheap: clones share the same underlying store. A single
/// coarse lock serializes writes; each slot is written exactly once, so
/// contention is bounded by the number of stages.
#[derive(Clone, Default)]
pub struct Blackboard {
    slots: Arc<RwLock<HashMap<String, Value>>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a slot. Fails if the slot name is empty or already written.
    pub fn write(&self, slot: impl Into<String>, value: Value) -> Result<()> {
        let slot = slot.into();
        if slot.is_empty() {
            return Err(CoreError::EmptySlotName);
        }

        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        if slots.contains_key(&slot) {
            return Err(CoreError::SlotConflict(slot));
        }
        slots.insert(slot, value);
        Ok(())
    }

    /// Read a slot. Returns `None` when the slot has not been produced yet.
    pub fn get(&self, slot: &str) -> Option<Value> {
        self.slots
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(slot)
            .cloned()
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.slots
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ordered copy of all slots written so far.
    pub fn snapshot(&self) -> BlackboardSnapshot {
        self.slots
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl std::fmt::Debug for Blackboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        let mut keys: Vec<&String> = slots.keys().collect();
        keys.sort();
        f.debug_struct("Blackboard").field("slots", &keys).finish()
    }
}

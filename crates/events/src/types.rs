//! Event types for the Voyages pipeline event system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Envelope wrapping all events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: Event,
}

impl EventEnvelope {
    /// Create a new event envelope with auto-generated ID and timestamp
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// All possible events in the system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    // Run lifecycle
    /// A run was submitted to the executor
    #[serde(rename = "run.submitted")]
    RunSubmitted { run_id: Uuid, destination: String },

    /// A run halted waiting for an external decision
    #[serde(rename = "run.suspended")]
    RunSuspended {
        run_id: Uuid,
        confirmation_id: String,
    },

    /// A decision arrived and the run picked up where it left off
    #[serde(rename = "run.resumed")]
    RunResumed {
        run_id: Uuid,
        confirmation_id: String,
        approved: bool,
    },

    /// A run reached a terminal state
    #[serde(rename = "run.completed")]
    RunCompleted { run_id: Uuid, status: String },

    /// A run aborted with an error
    #[serde(rename = "run.failed")]
    RunFailed {
        run_id: Uuid,
        stage: String,
        reason: String,
    },

    // Stage events
    /// A work unit started executing
    #[serde(rename = "stage.started")]
    StageStarted {
        run_id: Uuid,
        unit: String,
        path: String,
    },

    /// A work unit completed and wrote its slot
    #[serde(rename = "stage.completed")]
    StageCompleted {
        run_id: Uuid,
        unit: String,
        slot: String,
    },

    /// A work unit requested external approval
    #[serde(rename = "approval.requested")]
    ApprovalRequested {
        run_id: Uuid,
        confirmation_id: String,
        payload: Value,
    },

    // System events
    /// Generic error event
    #[serde(rename = "error")]
    Error {
        message: String,
        context: Option<String>,
    },
}

impl Event {
    /// Get the run ID associated with this event, if any
    pub fn run_id(&self) -> Option<Uuid> {
        match self {
            Event::RunSubmitted { run_id, .. } => Some(*run_id),
            Event::RunSuspended { run_id, .. } => Some(*run_id),
            Event::RunResumed { run_id, .. } => Some(*run_id),
            Event::RunCompleted { run_id, .. } => Some(*run_id),
            Event::RunFailed { run_id, .. } => Some(*run_id),
            Event::StageStarted { run_id, .. } => Some(*run_id),
            Event::StageCompleted { run_id, .. } => Some(*run_id),
            Event::ApprovalRequested { run_id, .. } => Some(*run_id),
            Event::Error { .. } => None,
        }
    }
}

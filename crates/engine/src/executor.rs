//! Pipeline executor: walks the stage tree, detects suspension, emits a
//! resumable checkpoint, and replays a resume request to completion.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use futures::future::{self, BoxFuture};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use events::{Event, EventBus, EventEnvelope};
use voyages_core::{Blackboard, BlackboardSnapshot, RunStatus, TripRequest};

use crate::checkpoint::{CheckpointStore, RunCheckpoint};
use crate::error::{EngineError, Result};
use crate::gateway::{ApprovalDecision, ApprovalGateway};
use crate::registry::{SuspensionRegistry, SuspensionToken};
use crate::stage::{format_path, StageNode, StagePath};
use crate::unit::{Outcome, UnitContext, WorkUnit};

/// Terminal (or paused) result of `submit`/`resume`.
///
/// Callers discriminate on the variant; partial blackboard contents never
/// imply a state on their own.
#[derive(Debug)]
pub enum RunResult {
    Completed {
        final_state: BlackboardSnapshot,
    },
    Suspended {
        confirmation_id: String,
        payload: Value,
    },
    Rejected {
        reason: String,
        final_state: BlackboardSnapshot,
    },
    Failed {
        stage: String,
        reason: String,
    },
}

impl RunResult {
    pub fn status(&self) -> RunStatus {
        match self {
            Self::Completed { .. } => RunStatus::Completed,
            Self::Suspended { .. } => RunStatus::Suspended,
            Self::Rejected { .. } => RunStatus::Rejected,
            Self::Failed { .. } => RunStatus::Failed,
        }
    }
}

/// Decision injected into the re-entered unit on the resume walk.
struct ResumeInjection {
    cursor: StagePath,
    decision: ApprovalDecision,
}

/// Mutable state of one walk over the stage tree.
struct RunState {
    run_id: Uuid,
    request: TripRequest,
    board: Blackboard,
    completed: Mutex<HashSet<StagePath>>,
    resume: Option<ResumeInjection>,
}

impl RunState {
    fn is_completed(&self, path: &StagePath) -> bool {
        self.completed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(path)
    }

    fn mark_completed(&self, path: StagePath) {
        self.completed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path);
    }

    fn decision_for(&self, path: &StagePath) -> Option<&ApprovalDecision> {
        self.resume
            .as_ref()
            .filter(|injection| &injection.cursor == path)
            .map(|injection| &injection.decision)
    }
}

enum NodeOutcome {
    Done,
    Suspended {
        confirmation_id: String,
        payload: Value,
        path: StagePath,
    },
}

/// Orchestrates one stage tree against per-run blackboards.
///
/// The executor never blocks waiting for a decision: a suspension returns
/// control to the caller and only the checkpoint stays alive across the
/// wait. One executor serves any number of concurrent runs; each
/// suspended run holds exactly one checkpoint keyed by its confirmation
/// id.
pub struct PipelineExecutor {
    plan: Arc<StageNode>,
    registry: Arc<SuspensionRegistry>,
    gateway: ApprovalGateway,
    checkpoints: CheckpointStore,
    event_bus: Option<EventBus>,
}

impl PipelineExecutor {
    pub fn new(plan: StageNode) -> Self {
        let registry = Arc::new(SuspensionRegistry::new());
        let gateway = ApprovalGateway::new(Arc::clone(&registry));
        Self {
            plan: Arc::new(plan),
            registry,
            gateway,
            checkpoints: CheckpointStore::new(),
            event_bus: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.gateway = ApprovalGateway::new(Arc::clone(&self.registry)).with_threshold(threshold);
        self
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.gateway.threshold()
    }

    /// Outstanding approval requests, oldest first.
    pub fn pending_approvals(&self) -> Vec<SuspensionToken> {
        self.registry.pending()
    }

    /// Execute a fresh run from the root of the plan.
    pub async fn submit(&self, run_id: Uuid, request: TripRequest) -> RunResult {
        info!(
            run_id = %run_id,
            destination = %request.destination,
            units = self.plan.unit_count(),
            "Run submitted"
        );
        self.emit(Event::RunSubmitted {
            run_id,
            destination: request.destination.clone(),
        });

        let state = RunState {
            run_id,
            request,
            board: Blackboard::new(),
            completed: Mutex::new(HashSet::new()),
            resume: None,
        };

        self.drive(state).await
    }

    /// Deliver a decision for a suspended run and continue it from the
    /// exact point of suspension.
    ///
    /// Fails with [`EngineError::UnknownConfirmation`] when the id was
    /// never issued, was already consumed, or its run was abandoned.
    pub async fn resume(&self, confirmation_id: &str, approved: bool) -> Result<RunResult> {
        let token = self
            .registry
            .consume(confirmation_id)
            .ok_or_else(|| EngineError::UnknownConfirmation(confirmation_id.to_string()))?;

        let checkpoint = self.checkpoints.take(confirmation_id).ok_or_else(|| {
            // Token existed without a checkpoint: a gateway registered it
            // but the run never suspended (or was abandoned mid-flight).
            EngineError::UnknownConfirmation(confirmation_id.to_string())
        })?;

        info!(
            run_id = %checkpoint.run_id,
            confirmation_id = %confirmation_id,
            approved = approved,
            cursor = %format_path(&checkpoint.resume_cursor),
            "Resuming suspended run"
        );
        debug!(payload = %token.payload, "Approval context");
        self.emit(Event::RunResumed {
            run_id: checkpoint.run_id,
            confirmation_id: confirmation_id.to_string(),
            approved,
        });

        let state = RunState {
            run_id: checkpoint.run_id,
            request: checkpoint.request,
            board: checkpoint.board,
            completed: Mutex::new(checkpoint.completed),
            resume: Some(ResumeInjection {
                cursor: checkpoint.resume_cursor,
                decision: ApprovalDecision {
                    confirmation_id: confirmation_id.to_string(),
                    approved,
                },
            }),
        };

        Ok(self.drive(state).await)
    }

    /// Destroy a suspended run's checkpoints and expire their tokens.
    /// Returns whether anything was abandoned.
    pub fn abandon(&self, run_id: Uuid) -> bool {
        let ids = self.checkpoints.remove_run(run_id);
        for id in &ids {
            self.registry.expire(id);
        }
        if !ids.is_empty() {
            info!(run_id = %run_id, checkpoints = ids.len(), "Run abandoned");
        }
        !ids.is_empty()
    }

    async fn drive(&self, state: RunState) -> RunResult {
        let run_id = state.run_id;

        match self.exec_node(&self.plan, StagePath::new(), &state).await {
            Ok(NodeOutcome::Done) => {
                let final_state = state.board.snapshot();

                if let Some(injection) = &state.resume {
                    if !injection.decision.approved {
                        let reason = format!(
                            "rejected by approver (confirmation {})",
                            injection.decision.confirmation_id
                        );
                        info!(run_id = %run_id, reason = %reason, "Run finished rejected");
                        self.emit(Event::RunCompleted {
                            run_id,
                            status: RunStatus::Rejected.as_str().to_string(),
                        });
                        return RunResult::Rejected {
                            reason,
                            final_state,
                        };
                    }
                }

                info!(run_id = %run_id, slots = final_state.len(), "Run completed");
                self.emit(Event::RunCompleted {
                    run_id,
                    status: RunStatus::Completed.as_str().to_string(),
                });
                RunResult::Completed { final_state }
            }
            Ok(NodeOutcome::Suspended {
                confirmation_id,
                payload,
                path,
            }) => {
                self.registry.bind_path(&confirmation_id, &path);

                let completed = state
                    .completed
                    .into_inner()
                    .unwrap_or_else(|e| e.into_inner());
                self.checkpoints.insert(RunCheckpoint {
                    run_id,
                    request: state.request,
                    board: state.board,
                    confirmation_id: confirmation_id.clone(),
                    resume_cursor: path.clone(),
                    completed,
                    created_at: Utc::now(),
                });

                warn!(
                    run_id = %run_id,
                    confirmation_id = %confirmation_id,
                    stage = %format_path(&path),
                    "Run suspended awaiting external decision"
                );
                self.emit(Event::RunSuspended {
                    run_id,
                    confirmation_id: confirmation_id.clone(),
                });

                RunResult::Suspended {
                    confirmation_id,
                    payload,
                }
            }
            Err(e) => {
                let (stage, reason) = match &e {
                    EngineError::StageFailed { path, reason } => (path.clone(), reason.clone()),
                    EngineError::MalformedStageResult { path, .. } => {
                        (path.clone(), e.to_string())
                    }
                    other => ("root".to_string(), other.to_string()),
                };

                error!(run_id = %run_id, stage = %stage, reason = %reason, "Run failed");
                self.emit(Event::RunFailed {
                    run_id,
                    stage: stage.clone(),
                    reason: reason.clone(),
                });

                RunResult::Failed { stage, reason }
            }
        }
    }

    fn exec_node<'a>(
        &'a self,
        node: &'a StageNode,
        path: StagePath,
        state: &'a RunState,
    ) -> BoxFuture<'a, Result<NodeOutcome>> {
        Box::pin(async move {
            match node {
                StageNode::Single(unit) => self.exec_unit(unit.as_ref(), path, state).await,
                StageNode::Sequence(children) => {
                    // In-order; a suspension stops the walk before any
                    // later sibling starts.
                    for (index, child) in children.iter().enumerate() {
                        let mut child_path = path.clone();
                        child_path.push(index);
                        match self.exec_node(child, child_path, state).await? {
                            NodeOutcome::Done => {}
                            suspended => return Ok(suspended),
                        }
                    }
                    Ok(NodeOutcome::Done)
                }
                StageNode::Parallel(children) => {
                    // All children are dispatched together and run to
                    // completion; a suspension never cancels a sibling
                    // already in flight. The lowest-index suspension wins
                    // when several arrive in the same round.
                    let tasks = children.iter().enumerate().map(|(index, child)| {
                        let mut child_path = path.clone();
                        child_path.push(index);
                        self.exec_node(child, child_path, state)
                    });

                    let results = future::join_all(tasks).await;

                    let mut first_suspension = None;
                    for result in results {
                        match result? {
                            NodeOutcome::Done => {}
                            suspended => {
                                if first_suspension.is_none() {
                                    first_suspension = Some(suspended);
                                }
                            }
                        }
                    }

                    Ok(first_suspension.unwrap_or(NodeOutcome::Done))
                }
            }
        })
    }

    async fn exec_unit(
        &self,
        unit: &dyn WorkUnit,
        path: StagePath,
        state: &RunState,
    ) -> Result<NodeOutcome> {
        if state.is_completed(&path) {
            debug!(
                unit = unit.name(),
                path = %format_path(&path),
                "Stage already completed, skipping"
            );
            return Ok(NodeOutcome::Done);
        }

        let decision = state.decision_for(&path);
        let ctx = UnitContext {
            run_id: state.run_id,
            request: &state.request,
            board: &state.board,
            gateway: &self.gateway,
            decision,
        };

        info!(
            unit = unit.name(),
            path = %format_path(&path),
            resumed = decision.is_some(),
            "Executing work unit"
        );
        self.emit(Event::StageStarted {
            run_id: state.run_id,
            unit: unit.name().to_string(),
            path: format_path(&path),
        });

        let outcome = match unit.execute(&ctx).await {
            Ok(outcome) => outcome,
            // Errors that already carry a stage path pass through unchanged
            Err(e @ EngineError::StageFailed { .. }) => return Err(e),
            Err(e @ EngineError::MalformedStageResult { .. }) => return Err(e),
            Err(other) => {
                return Err(EngineError::StageFailed {
                    path: format_path(&path),
                    reason: other.to_string(),
                })
            }
        };

        match outcome {
            Outcome::Completed { slot, value } => {
                state.board.write(slot.as_str(), value).map_err(|e| {
                    EngineError::MalformedStageResult {
                        path: format_path(&path),
                        reason: e.to_string(),
                    }
                })?;

                debug!(unit = unit.name(), slot = %slot, "Slot written");
                self.emit(Event::StageCompleted {
                    run_id: state.run_id,
                    unit: unit.name().to_string(),
                    slot,
                });
                state.mark_completed(path);
                Ok(NodeOutcome::Done)
            }
            Outcome::Suspended(signal) => {
                self.emit(Event::ApprovalRequested {
                    run_id: state.run_id,
                    confirmation_id: signal.confirmation_id.clone(),
                    payload: signal.payload.clone(),
                });
                Ok(NodeOutcome::Suspended {
                    confirmation_id: signal.confirmation_id,
                    payload: signal.payload,
                    path,
                })
            }
        }
    }

    fn emit(&self, event: Event) {
        if let Some(ref bus) = self.event_bus {
            bus.publish(EventEnvelope::new(event));
        }
    }
}

//! Pipeline execution and suspension/resumption engine
//!
//! Composes work units into stage trees (single, sequential, parallel),
//! threads a shared blackboard through a run, and suspends the whole
//! pipeline when a unit needs an external decision. A suspended run is
//! captured as a checkpoint and resumed exactly once from the point of
//! suspension; completed stages are never re-executed.

pub mod checkpoint;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod registry;
pub mod stage;
pub mod unit;

pub use error::{EngineError, Result};
pub use executor::{PipelineExecutor, RunResult};
pub use gateway::{ApprovalDecision, ApprovalGateway, ApprovalRequest, GatewayVerdict};
pub use registry::{SuspensionRegistry, SuspensionToken};
pub use stage::{format_path, StageNode, StagePath};
pub use unit::{Outcome, SuspensionSignal, UnitContext, WorkUnit};

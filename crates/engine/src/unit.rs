//! The atomic execution contract every pipeline stage is built from.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use voyages_core::{Blackboard, TripRequest};

use crate::error::Result;
use crate::gateway::{ApprovalDecision, ApprovalGateway};

/// What a work unit hands back to the executor.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The unit finished; the executor writes `value` into `slot`.
    Completed { slot: String, value: Value },
    /// The unit needs an external decision before it can finish.
    Suspended(SuspensionSignal),
}

impl Outcome {
    pub fn completed(slot: impl Into<String>, value: Value) -> Self {
        Self::Completed {
            slot: slot.into(),
            value,
        }
    }
}

/// Carried by a suspending unit up to the executor.
#[derive(Debug, Clone)]
pub struct SuspensionSignal {
    /// Opaque id the external approver answers with
    pub confirmation_id: String,
    /// Context the approver needs (cost, destination, threshold)
    pub payload: Value,
}

/// Everything a work unit sees during one invocation.
///
/// `decision` is present only when the executor re-enters a previously
/// suspended unit with a resolved approval; it is passed explicitly and
/// never inferred from ambient state.
pub struct UnitContext<'a> {
    pub run_id: Uuid,
    pub request: &'a TripRequest,
    pub board: &'a Blackboard,
    pub gateway: &'a ApprovalGateway,
    pub decision: Option<&'a ApprovalDecision>,
}

/// One unit of pipeline work.
///
/// Suspension and resumption are two distinct invocations: after a unit
/// returns [`Outcome::Suspended`] the executor will not call it again for
/// the same logical step until a decision arrives, and the resume call
/// carries that decision in the context.
#[async_trait]
pub trait WorkUnit: Send + Sync {
    fn name(&self) -> &str;

    async fn execute(&self, ctx: &UnitContext<'_>) -> Result<Outcome>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    use crate::registry::SuspensionRegistry;

    struct EchoUnit;

    #[async_trait]
    impl WorkUnit for EchoUnit {
        fn name(&self) -> &str {
            "Echo"
        }

        async fn execute(&self, ctx: &UnitContext<'_>) -> Result<Outcome> {
            Ok(Outcome::completed(
                "echo",
                json!({ "destination": ctx.request.destination }),
            ))
        }
    }

    #[tokio::test]
    async fn test_unit_reads_request() {
        let registry = Arc::new(SuspensionRegistry::new());
        let gateway = ApprovalGateway::new(Arc::clone(&registry));
        let board = Blackboard::new();
        let request = TripRequest::new("test", "Paris, France");

        let ctx = UnitContext {
            run_id: Uuid::new_v4(),
            request: &request,
            board: &board,
            gateway: &gateway,
            decision: None,
        };

        let outcome = EchoUnit.execute(&ctx).await.unwrap();
        match outcome {
            Outcome::Completed { slot, value } => {
                assert_eq!(slot, "echo");
                assert_eq!(value["destination"], "Paris, France");
            }
            Outcome::Suspended(_) => panic!("unit should complete"),
        }
    }
}

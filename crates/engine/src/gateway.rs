//! Approval gateway: the boundary between the pipeline and the external
//! approver.
//!
//! The same call site behaves differently on first entry and on resume,
//! discriminated by the presence of a resolved decision — never by a
//! retry counter or ambient call state.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::registry::{SuspensionRegistry, SuspensionToken};

/// Trip cost above which a booking needs a human decision, in USD.
pub const DEFAULT_APPROVAL_THRESHOLD: f64 = 1000.0;

/// The external approver's answer, consumed once.
#[derive(Debug, Clone)]
pub struct ApprovalDecision {
    pub confirmation_id: String,
    pub approved: bool,
}

/// What the gateway is asked to approve.
#[derive(Debug, Clone)]
pub struct ApprovalRequest {
    pub destination: String,
    pub num_travelers: u32,
    pub total_cost: f64,
}

/// Three-way outcome of a gateway invocation.
#[derive(Debug, Clone)]
pub enum GatewayVerdict {
    Approved(Value),
    Pending {
        confirmation_id: String,
        payload: Value,
    },
    Rejected {
        reason: String,
    },
}

pub struct ApprovalGateway {
    threshold: f64,
    registry: Arc<SuspensionRegistry>,
}

impl ApprovalGateway {
    pub fn new(registry: Arc<SuspensionRegistry>) -> Self {
        Self {
            threshold: DEFAULT_APPROVAL_THRESHOLD,
            registry,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Decide a booking request.
    ///
    /// A cost at or under the threshold is approved outright. Above the
    /// threshold the first invocation registers a suspension token and
    /// returns `Pending`; the resumed invocation carries the decision and
    /// settles deterministically without re-prompting.
    pub fn invoke(
        &self,
        request: &ApprovalRequest,
        decision: Option<&ApprovalDecision>,
    ) -> GatewayVerdict {
        if request.total_cost <= self.threshold {
            debug!(
                total_cost = request.total_cost,
                threshold = self.threshold,
                "Booking auto-approved"
            );
            return GatewayVerdict::Approved(json!({
                "status": "approved",
                "reason": "auto_approved",
                "message": format!(
                    "Booking auto-approved (${:.2} <= ${:.2})",
                    request.total_cost, self.threshold
                ),
                "total_cost": request.total_cost,
            }));
        }

        if let Some(decision) = decision {
            return if decision.approved {
                info!(
                    confirmation_id = %decision.confirmation_id,
                    total_cost = request.total_cost,
                    "Booking approved by external decision"
                );
                GatewayVerdict::Approved(json!({
                    "status": "approved",
                    "reason": "human_approved",
                    "message": format!("Booking approved by user for ${:.2}", request.total_cost),
                    "total_cost": request.total_cost,
                }))
            } else {
                info!(
                    confirmation_id = %decision.confirmation_id,
                    total_cost = request.total_cost,
                    "Booking rejected by external decision"
                );
                GatewayVerdict::Rejected {
                    reason: format!("Booking rejected by user for ${:.2}", request.total_cost),
                }
            };
        }

        let confirmation_id = format!("confirm-{}", Uuid::new_v4().simple());
        let payload = json!({
            "destination": request.destination,
            "num_travelers": request.num_travelers,
            "total_cost": request.total_cost,
            "threshold": self.threshold,
        });

        self.registry
            .register(SuspensionToken::new(&confirmation_id, payload.clone()));

        info!(
            confirmation_id = %confirmation_id,
            total_cost = request.total_cost,
            threshold = self.threshold,
            "Booking requires approval, suspending"
        );

        GatewayVerdict::Pending {
            confirmation_id,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> (ApprovalGateway, Arc<SuspensionRegistry>) {
        let registry = Arc::new(SuspensionRegistry::new());
        (ApprovalGateway::new(Arc::clone(&registry)), registry)
    }

    fn request(total_cost: f64) -> ApprovalRequest {
        ApprovalRequest {
            destination: "Bali, Indonesia".to_string(),
            num_travelers: 2,
            total_cost,
        }
    }

    #[test]
    fn test_under_threshold_auto_approves() {
        let (gateway, registry) = gateway();

        match gateway.invoke(&request(500.0), None) {
            GatewayVerdict::Approved(value) => {
                assert_eq!(value["reason"], "auto_approved");
                assert_eq!(value["total_cost"], 500.0);
            }
            other => panic!("expected Approved, got {:?}", other),
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_exactly_at_threshold_auto_approves() {
        let (gateway, registry) = gateway();

        match gateway.invoke(&request(1000.0), None) {
            GatewayVerdict::Approved(value) => assert_eq!(value["reason"], "auto_approved"),
            other => panic!("expected Approved, got {:?}", other),
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_above_threshold_registers_token() {
        let (gateway, registry) = gateway();

        match gateway.invoke(&request(1500.0), None) {
            GatewayVerdict::Pending {
                confirmation_id,
                payload,
            } => {
                assert_eq!(payload["total_cost"], 1500.0);
                assert_eq!(payload["threshold"], 1000.0);
                assert!(registry.lookup(&confirmation_id).is_some());
            }
            other => panic!("expected Pending, got {:?}", other),
        }
    }

    #[test]
    fn test_resume_with_approval_never_reprompts() {
        let (gateway, registry) = gateway();

        let decision = ApprovalDecision {
            confirmation_id: "confirm-x".to_string(),
            approved: true,
        };
        match gateway.invoke(&request(1500.0), Some(&decision)) {
            GatewayVerdict::Approved(value) => assert_eq!(value["reason"], "human_approved"),
            other => panic!("expected Approved, got {:?}", other),
        }
        // No new token on the resume path
        assert!(registry.is_empty());
    }

    #[test]
    fn test_resume_with_rejection() {
        let (gateway, _registry) = gateway();

        let decision = ApprovalDecision {
            confirmation_id: "confirm-x".to_string(),
            approved: false,
        };
        match gateway.invoke(&request(1500.0), Some(&decision)) {
            GatewayVerdict::Rejected { reason } => assert!(reason.contains("1500.00")),
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_threshold() {
        let registry = Arc::new(SuspensionRegistry::new());
        let gateway = ApprovalGateway::new(registry).with_threshold(2000.0);

        match gateway.invoke(&request(1500.0), None) {
            GatewayVerdict::Approved(_) => {}
            other => panic!("expected Approved, got {:?}", other),
        }
    }
}

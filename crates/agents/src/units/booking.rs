//! The booking step: the one unit that can suspend the whole run.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use engine::{
    ApprovalRequest, GatewayVerdict, Outcome, Result, SuspensionSignal, UnitContext, WorkUnit,
};

use crate::units::{SLOT_BOOKING, SLOT_BUDGET};

/// Runs the booking through the approval gateway.
///
/// The guard value is the budget slot's total; if the budget stage has
/// not produced it, the estimate is recomputed from the pure tool instead
/// of failing the run.
#[derive(Default)]
pub struct BookingUnit;

impl BookingUnit {
    pub fn new() -> Self {
        Self
    }

    fn total_cost(ctx: &UnitContext<'_>) -> f64 {
        ctx.board
            .get(SLOT_BUDGET)
            .and_then(|value| value["total"].as_f64())
            .unwrap_or_else(|| {
                debug!("Budget slot missing, recomputing estimate");
                tools::calculate_trip_budget(
                    &ctx.request.destination,
                    ctx.request.num_days,
                    ctx.request.num_travelers,
                    ctx.request.accommodation_level,
                )
                .total
            })
    }
}

#[async_trait]
impl WorkUnit for BookingUnit {
    fn name(&self) -> &str {
        "BookingAgent"
    }

    async fn execute(&self, ctx: &UnitContext<'_>) -> Result<Outcome> {
        let total_cost = Self::total_cost(ctx);

        let request = ApprovalRequest {
            destination: ctx.request.destination.clone(),
            num_travelers: ctx.request.num_travelers,
            total_cost,
        };

        match ctx.gateway.invoke(&request, ctx.decision) {
            GatewayVerdict::Approved(value) => Ok(Outcome::completed(SLOT_BOOKING, value)),
            GatewayVerdict::Pending {
                confirmation_id,
                payload,
            } => Ok(Outcome::Suspended(SuspensionSignal {
                confirmation_id,
                payload,
            })),
            GatewayVerdict::Rejected { reason } => Ok(Outcome::completed(
                SLOT_BOOKING,
                json!({
                    "status": "rejected",
                    "message": reason,
                    "total_cost": total_cost,
                }),
            )),
        }
    }
}

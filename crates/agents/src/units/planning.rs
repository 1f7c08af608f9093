//! The sequential planning pipeline: itinerary, budget, optimization.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use engine::{Outcome, Result, UnitContext, WorkUnit};
use gemini::{InferenceRequest, ReasoningBackend, ToolResult, ToolSpec};

use crate::prompts::UnitPrompts;
use crate::units::{
    slot_text, SLOT_ACTIVITY_RESEARCH, SLOT_BUDGET, SLOT_DESTINATION_RESEARCH, SLOT_ITINERARY,
    SLOT_OPTIMIZED_PLAN, SLOT_WEATHER_RESEARCH,
};

/// Drafts the day-by-day itinerary from the research slots.
pub struct ItineraryUnit {
    backend: Arc<dyn ReasoningBackend>,
}

impl ItineraryUnit {
    pub fn new(backend: Arc<dyn ReasoningBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl WorkUnit for ItineraryUnit {
    fn name(&self) -> &str {
        "ItineraryBuilder"
    }

    async fn execute(&self, ctx: &UnitContext<'_>) -> Result<Outcome> {
        let prompt = UnitPrompts::itinerary(
            ctx.request,
            &slot_text(ctx.board, SLOT_DESTINATION_RESEARCH),
            &slot_text(ctx.board, SLOT_ACTIVITY_RESEARCH),
            &slot_text(ctx.board, SLOT_WEATHER_RESEARCH),
        );

        let inference = InferenceRequest::new(UnitPrompts::ITINERARY, prompt);
        let response = self.backend.infer(&inference).await?;

        Ok(Outcome::completed(
            SLOT_ITINERARY,
            Value::String(response.text),
        ))
    }
}

/// Estimates the trip cost with the budget tool and narrates the result.
///
/// The total in the slot always comes from the tool, not from the model,
/// so downstream approval decisions are deterministic.
pub struct BudgetUnit {
    backend: Arc<dyn ReasoningBackend>,
}

impl BudgetUnit {
    pub fn new(backend: Arc<dyn ReasoningBackend>) -> Self {
        Self { backend }
    }

    fn tool_spec() -> ToolSpec {
        ToolSpec::new(
            "calculate_trip_budget",
            "Estimates the total trip cost for a destination and traveler count",
            json!({
                "type": "object",
                "properties": {
                    "destination": { "type": "string" },
                    "num_days": { "type": "integer" },
                    "num_travelers": { "type": "integer" },
                    "accommodation_level": {
                        "type": "string",
                        "enum": ["budget", "mid-range", "luxury"]
                    }
                },
                "required": ["destination", "num_days", "num_travelers", "accommodation_level"]
            }),
        )
    }
}

#[async_trait]
impl WorkUnit for BudgetUnit {
    fn name(&self) -> &str {
        "BudgetCalculator"
    }

    async fn execute(&self, ctx: &UnitContext<'_>) -> Result<Outcome> {
        let breakdown = tools::calculate_trip_budget(
            &ctx.request.destination,
            ctx.request.num_days,
            ctx.request.num_travelers,
            ctx.request.accommodation_level,
        );
        debug!(total = breakdown.total, "Trip budget estimated");

        let inference = InferenceRequest::new(UnitPrompts::BUDGET, UnitPrompts::budget(ctx.request))
            .with_tools(vec![Self::tool_spec()]);
        let response = self.backend.infer(&inference).await?;

        // When the model actually calls the function, answer it with the
        // tool output and let it compose the narrative from real numbers.
        let narrative = match response.tool_call {
            Some(call) => {
                let follow_up = InferenceRequest::new(
                    UnitPrompts::BUDGET,
                    UnitPrompts::budget(ctx.request),
                )
                .with_tool_result(ToolResult {
                    call,
                    response: breakdown.to_value(),
                });
                self.backend.infer(&follow_up).await?.text
            }
            None => response.text,
        };

        Ok(Outcome::completed(
            SLOT_BUDGET,
            json!({
                "breakdown": breakdown.to_value(),
                "total": breakdown.total,
                "narrative": narrative,
            }),
        ))
    }
}

/// Reviews the itinerary and budget, producing the final optimized plan.
pub struct OptimizerUnit {
    backend: Arc<dyn ReasoningBackend>,
}

impl OptimizerUnit {
    pub fn new(backend: Arc<dyn ReasoningBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl WorkUnit for OptimizerUnit {
    fn name(&self) -> &str {
        "OptimizerAgent"
    }

    async fn execute(&self, ctx: &UnitContext<'_>) -> Result<Outcome> {
        let itinerary = slot_text(ctx.board, SLOT_ITINERARY);
        let budget_narrative = ctx
            .board
            .get(SLOT_BUDGET)
            .and_then(|value| value["narrative"].as_str().map(str::to_string))
            .unwrap_or_else(|| "not yet available".to_string());

        let inference = InferenceRequest::new(
            UnitPrompts::OPTIMIZER,
            UnitPrompts::optimizer(ctx.request, &itinerary, &budget_narrative),
        );
        let response = self.backend.infer(&inference).await?;

        Ok(Outcome::completed(
            SLOT_OPTIMIZED_PLAN,
            Value::String(response.text),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{unit_fixture, MockBackend};
    use gemini::ToolCall;

    #[tokio::test]
    async fn test_itinerary_tolerates_missing_research() {
        let backend = MockBackend::text("Day 1: arrive and rest.");
        let unit = ItineraryUnit::new(backend.clone());

        let fixture = unit_fixture();
        match unit.execute(&fixture.ctx()).await.unwrap() {
            Outcome::Completed { slot, value } => {
                assert_eq!(slot, SLOT_ITINERARY);
                assert_eq!(value, json!("Day 1: arrive and rest."));
            }
            Outcome::Suspended(_) => panic!("itinerary never suspends"),
        }
    }

    #[tokio::test]
    async fn test_budget_total_comes_from_tool() {
        let backend = MockBackend::text("A very affordable trip.");
        let unit = BudgetUnit::new(backend.clone());

        let fixture = unit_fixture();
        match unit.execute(&fixture.ctx()).await.unwrap() {
            Outcome::Completed { slot, value } => {
                assert_eq!(slot, SLOT_BUDGET);
                // bali budget rate: 40/day * 5 days * 2 travelers
                assert_eq!(value["total"], 400.0);
                assert_eq!(value["narrative"], "A very affordable trip.");
            }
            Outcome::Suspended(_) => panic!("budget never suspends"),
        }
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_budget_answers_model_tool_call() {
        let backend = MockBackend::with_tool_call(
            "Breakdown: $400 total.",
            ToolCall {
                name: "calculate_trip_budget".to_string(),
                args: json!({"destination": "Bali, Indonesia"}),
            },
        );
        let unit = BudgetUnit::new(backend.clone());

        let fixture = unit_fixture();
        match unit.execute(&fixture.ctx()).await.unwrap() {
            Outcome::Completed { value, .. } => {
                assert_eq!(value["total"], 400.0);
            }
            Outcome::Suspended(_) => panic!("budget never suspends"),
        }
        // One call for the tool request, one for the follow-up narrative
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_optimizer_reads_planning_slots() {
        let backend = MockBackend::text("Swap day 2 and 3.");
        let unit = OptimizerUnit::new(backend.clone());

        let fixture = unit_fixture();
        fixture
            .board
            .write(SLOT_ITINERARY, json!("Day 1: beach"))
            .unwrap();
        fixture
            .board
            .write(SLOT_BUDGET, json!({"total": 400.0, "narrative": "cheap"}))
            .unwrap();

        match unit.execute(&fixture.ctx()).await.unwrap() {
            Outcome::Completed { slot, value } => {
                assert_eq!(slot, SLOT_OPTIMIZED_PLAN);
                assert_eq!(value, json!("Swap day 2 and 3."));
            }
            Outcome::Suspended(_) => panic!("optimizer never suspends"),
        }
    }
}

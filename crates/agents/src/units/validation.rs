use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use engine::{Outcome, Result, UnitContext, WorkUnit};
use gemini::{InferenceRequest, ReasoningBackend};

use crate::prompts::UnitPrompts;
use crate::units::SLOT_VALIDATION;

/// Checks destination safety and feasibility before anything else runs.
pub struct ValidationUnit {
    backend: Arc<dyn ReasoningBackend>,
}

impl ValidationUnit {
    pub fn new(backend: Arc<dyn ReasoningBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl WorkUnit for ValidationUnit {
    fn name(&self) -> &str {
        "ValidationAgent"
    }

    async fn execute(&self, ctx: &UnitContext<'_>) -> Result<Outcome> {
        let report =
            tools::validate_destination(&ctx.request.destination, &ctx.request.travel_dates);
        debug!(
            destination = %ctx.request.destination,
            safety_rating = report.safety_rating,
            "Destination validated"
        );

        let inference = InferenceRequest::new(
            UnitPrompts::VALIDATION,
            UnitPrompts::validation(ctx.request, &report.to_value()),
        );
        let response = self.backend.infer(&inference).await?;

        Ok(Outcome::completed(
            SLOT_VALIDATION,
            json!({
                "report": report.to_value(),
                "summary": response.text,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{unit_fixture, MockBackend};

    #[tokio::test]
    async fn test_validation_writes_report_and_summary() {
        let backend = MockBackend::text("Bali is safe in February.");
        let unit = ValidationUnit::new(backend.clone());

        let fixture = unit_fixture();
        let outcome = unit.execute(&fixture.ctx()).await.unwrap();

        match outcome {
            Outcome::Completed { slot, value } => {
                assert_eq!(slot, SLOT_VALIDATION);
                assert_eq!(value["report"]["matched_location"], "Bali");
                assert_eq!(value["summary"], "Bali is safe in February.");
            }
            Outcome::Suspended(_) => panic!("validation never suspends"),
        }
        assert_eq!(backend.calls(), 1);
    }
}

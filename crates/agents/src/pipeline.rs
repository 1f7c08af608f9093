//! The fixed travel-planning pipeline.
//!
//! Built once at startup: validation first, then the research fan-out,
//! then the sequential planning group, and finally the booking step that
//! may suspend the run for approval.

use std::sync::Arc;

use engine::StageNode;
use gemini::ReasoningBackend;

use crate::units::{
    ActivityResearchUnit, BookingUnit, BudgetUnit, DestinationResearchUnit, ItineraryUnit,
    OptimizerUnit, ValidationUnit, WeatherResearchUnit,
};

pub fn travel_plan(backend: Arc<dyn ReasoningBackend>) -> StageNode {
    StageNode::sequence(vec![
        StageNode::single(Arc::new(ValidationUnit::new(Arc::clone(&backend)))),
        StageNode::parallel(vec![
            StageNode::single(Arc::new(DestinationResearchUnit::new(Arc::clone(&backend)))),
            StageNode::single(Arc::new(ActivityResearchUnit::new(Arc::clone(&backend)))),
            StageNode::single(Arc::new(WeatherResearchUnit::new(Arc::clone(&backend)))),
        ]),
        StageNode::sequence(vec![
            StageNode::single(Arc::new(ItineraryUnit::new(Arc::clone(&backend)))),
            StageNode::single(Arc::new(BudgetUnit::new(Arc::clone(&backend)))),
            StageNode::single(Arc::new(OptimizerUnit::new(Arc::clone(&backend)))),
        ]),
        StageNode::single(Arc::new(BookingUnit::new())),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    use engine::{PipelineExecutor, RunResult};
    use voyages_core::{AccommodationLevel, TripRequest};

    use crate::test_support::MockBackend;
    use crate::units::{
        SLOT_ACTIVITY_RESEARCH, SLOT_BOOKING, SLOT_BUDGET, SLOT_DESTINATION_RESEARCH,
        SLOT_ITINERARY, SLOT_OPTIMIZED_PLAN, SLOT_VALIDATION, SLOT_WEATHER_RESEARCH,
    };

    #[test]
    fn test_pipeline_shape() {
        let backend = MockBackend::text("ok");
        let plan = travel_plan(backend);

        assert_eq!(plan.unit_count(), 8);
        assert_eq!(
            plan.unit_names(),
            vec![
                "ValidationAgent",
                "DestinationResearcher",
                "ActivityFinder",
                "WeatherChecker",
                "ItineraryBuilder",
                "BudgetCalculator",
                "OptimizerAgent",
                "BookingAgent",
            ]
        );
    }

    #[tokio::test]
    async fn test_cheap_trip_completes_without_suspension() {
        let backend = MockBackend::text("agent output");
        let executor = PipelineExecutor::new(travel_plan(backend.clone()));

        // bali budget: 40/day * 5 days * 2 travelers = 400, under threshold
        let request = TripRequest::new("Beach vacation", "Bali, Indonesia")
            .with_dates("2026-02-10 to 2026-02-15")
            .with_days(5)
            .with_travelers(2)
            .with_accommodation(AccommodationLevel::Budget);

        match executor.submit(Uuid::new_v4(), request).await {
            RunResult::Completed { final_state } => {
                for slot in [
                    SLOT_VALIDATION,
                    SLOT_DESTINATION_RESEARCH,
                    SLOT_ACTIVITY_RESEARCH,
                    SLOT_WEATHER_RESEARCH,
                    SLOT_ITINERARY,
                    SLOT_BUDGET,
                    SLOT_OPTIMIZED_PLAN,
                    SLOT_BOOKING,
                ] {
                    assert!(final_state.contains_key(slot), "missing slot {slot}");
                }
                assert_eq!(final_state[SLOT_BOOKING]["reason"], "auto_approved");
            }
            other => panic!("expected Completed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_expensive_trip_suspends_and_resumes_without_rework() {
        let backend = MockBackend::text("agent output");
        let executor = PipelineExecutor::new(travel_plan(backend.clone()));

        // new york luxury: 500/day * 10 days * 4 travelers = 20000
        let request = TripRequest::new("Anniversary trip", "New York, USA")
            .with_dates("2026-05-01 to 2026-05-10")
            .with_days(10)
            .with_travelers(4)
            .with_accommodation(AccommodationLevel::Luxury);

        let confirmation_id = match executor.submit(Uuid::new_v4(), request).await {
            RunResult::Suspended {
                confirmation_id,
                payload,
            } => {
                assert_eq!(payload["total_cost"], 20000.0);
                confirmation_id
            }
            other => panic!("expected Suspended, got {:?}", other),
        };

        // Validation, 3 researchers, itinerary, budget, optimizer
        let calls_at_suspension = backend.calls();
        assert_eq!(calls_at_suspension, 7);

        match executor.resume(&confirmation_id, true).await.unwrap() {
            RunResult::Completed { final_state } => {
                assert_eq!(final_state[SLOT_BOOKING]["reason"], "human_approved");
            }
            other => panic!("expected Completed, got {:?}", other),
        }

        // Resume re-entered only the booking step; no reasoning was redone
        assert_eq!(backend.calls(), calls_at_suspension);
    }

    #[tokio::test]
    async fn test_expensive_trip_rejection() {
        let backend = MockBackend::text("agent output");
        let executor = PipelineExecutor::new(travel_plan(backend));

        let request = TripRequest::new("Anniversary trip", "New York, USA")
            .with_dates("2026-05-01 to 2026-05-10")
            .with_days(10)
            .with_travelers(4)
            .with_accommodation(AccommodationLevel::Luxury);

        let confirmation_id = match executor.submit(Uuid::new_v4(), request).await {
            RunResult::Suspended {
                confirmation_id, ..
            } => confirmation_id,
            other => panic!("expected Suspended, got {:?}", other),
        };

        match executor.resume(&confirmation_id, false).await.unwrap() {
            RunResult::Rejected {
                final_state,
                reason,
            } => {
                assert!(reason.contains("rejected"));
                assert_eq!(final_state[SLOT_BOOKING]["status"], "rejected");
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }
}

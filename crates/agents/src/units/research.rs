//! The parallel research team: destination, activities and weather.
//!
//! Each unit is independent and owns one slot; none of them reads another
//! research slot, so they are safe to run as parallel siblings.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use engine::{Outcome, Result, UnitContext, WorkUnit};
use gemini::{InferenceRequest, ReasoningBackend};

use crate::prompts::UnitPrompts;
use crate::units::{SLOT_ACTIVITY_RESEARCH, SLOT_DESTINATION_RESEARCH, SLOT_WEATHER_RESEARCH};

async fn research(
    backend: &dyn ReasoningBackend,
    system: &str,
    ctx: &UnitContext<'_>,
    slot: &str,
) -> Result<Outcome> {
    let inference = InferenceRequest::new(system, UnitPrompts::research(ctx.request));
    let response = backend.infer(&inference).await?;
    Ok(Outcome::completed(slot, Value::String(response.text)))
}

pub struct DestinationResearchUnit {
    backend: Arc<dyn ReasoningBackend>,
}

impl DestinationResearchUnit {
    pub fn new(backend: Arc<dyn ReasoningBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl WorkUnit for DestinationResearchUnit {
    fn name(&self) -> &str {
        "DestinationResearcher"
    }

    async fn execute(&self, ctx: &UnitContext<'_>) -> Result<Outcome> {
        research(
            self.backend.as_ref(),
            UnitPrompts::DESTINATION_RESEARCH,
            ctx,
            SLOT_DESTINATION_RESEARCH,
        )
        .await
    }
}

pub struct ActivityResearchUnit {
    backend: Arc<dyn ReasoningBackend>,
}

impl ActivityResearchUnit {
    pub fn new(backend: Arc<dyn ReasoningBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl WorkUnit for ActivityResearchUnit {
    fn name(&self) -> &str {
        "ActivityFinder"
    }

    async fn execute(&self, ctx: &UnitContext<'_>) -> Result<Outcome> {
        research(
            self.backend.as_ref(),
            UnitPrompts::ACTIVITY_RESEARCH,
            ctx,
            SLOT_ACTIVITY_RESEARCH,
        )
        .await
    }
}

pub struct WeatherResearchUnit {
    backend: Arc<dyn ReasoningBackend>,
}

impl WeatherResearchUnit {
    pub fn new(backend: Arc<dyn ReasoningBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl WorkUnit for WeatherResearchUnit {
    fn name(&self) -> &str {
        "WeatherChecker"
    }

    async fn execute(&self, ctx: &UnitContext<'_>) -> Result<Outcome> {
        research(
            self.backend.as_ref(),
            UnitPrompts::WEATHER_RESEARCH,
            ctx,
            SLOT_WEATHER_RESEARCH,
        )
        .await
    }
}

//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use engine::{ApprovalDecision, ApprovalGateway, SuspensionRegistry, UnitContext};
use gemini::{InferenceRequest, InferenceResponse, ReasoningBackend, Result, ToolCall};
use voyages_core::{AccommodationLevel, Blackboard, TripRequest};

/// Scripted backend: fixed text, optional one-shot tool call.
pub(crate) struct MockBackend {
    text: String,
    tool_call: Mutex<Option<ToolCall>>,
    calls: AtomicUsize,
}

impl MockBackend {
    pub fn text(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            tool_call: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn with_tool_call(text: &str, call: ToolCall) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            tool_call: Mutex::new(Some(call)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReasoningBackend for MockBackend {
    async fn infer(&self, _request: &InferenceRequest) -> Result<InferenceResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let tool_call = self
            .tool_call
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        Ok(InferenceResponse {
            text: self.text.clone(),
            tool_call,
        })
    }
}

/// Owns everything a `UnitContext` borrows.
pub(crate) struct UnitFixture {
    pub run_id: Uuid,
    pub request: TripRequest,
    pub board: Blackboard,
    pub registry: Arc<SuspensionRegistry>,
    pub gateway: ApprovalGateway,
    pub decision: Option<ApprovalDecision>,
}

impl UnitFixture {
    pub fn ctx(&self) -> UnitContext<'_> {
        UnitContext {
            run_id: self.run_id,
            request: &self.request,
            board: &self.board,
            gateway: &self.gateway,
            decision: self.decision.as_ref(),
        }
    }
}

pub(crate) fn unit_fixture() -> UnitFixture {
    let registry = Arc::new(SuspensionRegistry::new());
    let gateway = ApprovalGateway::new(Arc::clone(&registry));
    UnitFixture {
        run_id: Uuid::new_v4(),
        request: TripRequest::new("Relaxing beach vacation", "Bali, Indonesia")
            .with_dates("2026-02-10 to 2026-02-15")
            .with_days(5)
            .with_travelers(2)
            .with_accommodation(AccommodationLevel::Budget),
        board: Blackboard::new(),
        registry,
        gateway,
        decision: None,
    }
}

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{InferenceRequest, InferenceResponse};

/// The reasoning contract the pipeline units program against.
///
/// Implementations are expected to handle their own transient-failure
/// retry; callers treat any returned error as fatal for the current run.
#[async_trait]
pub trait ReasoningBackend: Send + Sync {
    async fn infer(&self, request: &InferenceRequest) -> Result<InferenceResponse>;
}

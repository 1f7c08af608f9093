//! Gemini reasoning backend
//!
//! Typed client for the Gemini `generateContent` REST API plus the
//! `ReasoningBackend` trait the pipeline units program against. Transient
//! API failures are retried with bounded exponential backoff.

mod backend;
mod client;
mod error;
mod retry;
mod types;

pub use backend::ReasoningBackend;
pub use client::GeminiClient;
pub use error::{GeminiError, Result};
pub use retry::RetryPolicy;
pub use types::{InferenceRequest, InferenceResponse, ToolCall, ToolResult, ToolSpec};

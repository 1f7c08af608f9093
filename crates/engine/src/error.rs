use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unknown confirmation id: {0}")]
    UnknownConfirmation(String),

    #[error("Malformed result from stage {path}: {reason}")]
    MalformedStageResult { path: String, reason: String },

    #[error("Stage {path} failed: {reason}")]
    StageFailed { path: String, reason: String },

    #[error("Backend error: {0}")]
    Backend(#[from] gemini::GeminiError),

    #[error("Blackboard error: {0}")]
    Blackboard(#[from] voyages_core::CoreError),
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_stage_path() {
        let error = EngineError::StageFailed {
            path: "2.1".to_string(),
            reason: "backend unreachable".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("2.1"));
        assert!(message.contains("backend unreachable"));
    }
}

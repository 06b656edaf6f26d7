use thiserror::Error;

use crate::llm_client::LlmError;

/// Core error type for agent execution and workflow coordination.
///
/// Validation and LLM errors are always caught at the `Agent::execute`
/// boundary and converted into a failure envelope. `UnknownAgent` is the one
/// class that propagates out of the orchestrator; the coordinator catches it
/// at the workflow level and reports it in `WorkflowResult.error`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Unknown agent: '{0}' is not registered")]
    UnknownAgent(String),

    #[error("Agent '{agent_id}' failed: {message}")]
    AgentFailed { agent_id: String, message: String },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CoreError {
    /// Shorthand for a validation failure with a formatted message.
    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_agent_message_names_the_id() {
        let err = CoreError::UnknownAgent("resume-builder".to_string());
        assert!(err.to_string().contains("resume-builder"));
    }

    #[test]
    fn test_agent_failed_message_carries_both_fields() {
        let err = CoreError::AgentFailed {
            agent_id: "ats-optimizer".to_string(),
            message: "missing job description".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("ats-optimizer"));
        assert!(text.contains("missing job description"));
    }
}

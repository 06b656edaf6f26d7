//! Agent abstraction — one prompt-driven transformation per agent, behind a
//! uniform `execute` contract.
//!
//! `execute` is the primary failure-containment boundary: no concrete agent's
//! internal failure (validation, prompt build, completion call, JSON parse)
//! ever propagates as an error past it. Execution always completes with a
//! response envelope.

use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::llm_client::CompletionPayload;
use crate::models::context::{AgentConfig, AgentContext, ExecutionOptions, StepInput};
use crate::models::response::{AgentResponse, ErasedResponse, ResponseMetadata, RESPONSE_VERSION};

pub mod ats_optimizer;
pub mod content_optimizer;
pub mod grammar_enhancer;
pub mod prompts;
pub mod resume_builder;
pub mod resume_reviewer;
pub mod skills_extractor;

/// Stable agent identifiers referenced by workflow templates.
pub mod agent_ids {
    pub const RESUME_BUILDER: &str = "resume-builder";
    pub const CONTENT_OPTIMIZER: &str = "content-optimizer";
    pub const GRAMMAR_ENHANCER: &str = "grammar-enhancer";
    pub const SKILLS_EXTRACTOR: &str = "skills-extractor";
    pub const RESUME_REVIEWER: &str = "resume-reviewer";
    pub const ATS_OPTIMIZER: &str = "ats-optimizer";
}

/// Confidence ceiling. Generated content is never reported as fully certain.
pub const MAX_CONFIDENCE: u8 = 95;

/// Fallback confidence for agents that do not weight by completeness.
const DEFAULT_CONFIDENCE: u8 = 70;

/// A self-contained unit encapsulating one prompt-driven transformation.
///
/// Implementations are stateless and `Sync`: per-call status lives in the
/// response envelope, not on the instance, so one agent instance can serve
/// concurrent executions.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Stable string key, unique across the registry.
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// Per-agent default generation config. Per-call patches merge over it.
    fn default_config(&self) -> AgentConfig {
        AgentConfig::default()
    }

    /// The agent's transformation: validate preconditions, build prompts,
    /// invoke the completion client, parse and repair the output.
    /// Errors thrown here are caught by `execute` and converted to data.
    async fn process(
        &self,
        input: &StepInput,
        context: &AgentContext,
        config: &AgentConfig,
    ) -> Result<Value, CoreError>;

    /// Self-assessed output quality, weighted by result completeness.
    /// The driver clamps whatever this returns to [0, MAX_CONFIDENCE].
    fn confidence(&self, _data: &Value) -> u8 {
        DEFAULT_CONFIDENCE
    }

    /// Runs one execution: merges config, times `process` with wall-clock
    /// milliseconds, and converts any error into a failure envelope.
    async fn execute(
        &self,
        input: &StepInput,
        context: &AgentContext,
        options: &ExecutionOptions,
    ) -> ErasedResponse {
        let execution_id = Uuid::new_v4();
        let config = match &options.config {
            Some(patch) => self.default_config().apply(patch),
            None => self.default_config(),
        };

        debug!(agent = self.id(), %execution_id, "agent processing");

        let started = Instant::now();
        let outcome = self.process(input, context, &config).await;
        let processing_time_ms = started.elapsed().as_millis() as u64;

        let metadata = ResponseMetadata {
            processing_time_ms,
            agent_id: self.id().to_string(),
            version: RESPONSE_VERSION.to_string(),
            execution_id,
        };

        match outcome {
            Ok(data) => {
                let confidence = self.confidence(&data).min(MAX_CONFIDENCE);
                debug!(
                    agent = self.id(),
                    %execution_id,
                    processing_time_ms,
                    confidence,
                    "agent completed"
                );
                AgentResponse::ok(data, metadata, confidence)
            }
            Err(e) => {
                warn!(agent = self.id(), %execution_id, error = %e, "agent failed");
                AgentResponse::fail(e.to_string(), metadata)
            }
        }
    }
}

/// Requires a JSON completion payload. A raw-text fallback from the client
/// becomes a validation error, same channel as other precondition failures.
pub(crate) fn require_json(payload: CompletionPayload) -> Result<Value, CoreError> {
    payload.into_json().ok_or_else(|| {
        CoreError::validation("completion returned unstructured text where JSON was required")
    })
}


#[cfg(test)]
mod tests {
    use super::testing::StubAgent;
    use super::*;
    use crate::models::response::AgentStatus;

    #[tokio::test]
    async fn test_execute_wraps_success_in_envelope() {
        let agent = StubAgent::ok("stub-ok");
        let response = agent
            .execute(
                &StepInput::default(),
                &AgentContext::default(),
                &ExecutionOptions::default(),
            )
            .await;

        assert!(response.success);
        assert_eq!(response.status, AgentStatus::Completed);
        assert_eq!(response.metadata.agent_id, "stub-ok");
        assert!(response.data.is_some());
        assert!(response.confidence.unwrap() <= MAX_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_execute_converts_process_error_to_failure_envelope() {
        let agent = StubAgent::failing("stub-fail");
        let response = agent
            .execute(
                &StepInput::default(),
                &AgentContext::default(),
                &ExecutionOptions::default(),
            )
            .await;

        assert!(!response.success);
        assert_eq!(response.status, AgentStatus::Error);
        assert!(response.data.is_none());
        assert!(response.error.unwrap().contains("stub configured to fail"));
    }

    #[tokio::test]
    async fn test_execute_measures_processing_time() {
        let agent = StubAgent::ok("stub-timed").with_delay(std::time::Duration::from_millis(20));
        let response = agent
            .execute(
                &StepInput::default(),
                &AgentContext::default(),
                &ExecutionOptions::default(),
            )
            .await;

        assert!(response.metadata.processing_time_ms >= 20);
    }

    #[test]
    fn test_require_json_rejects_text_payload() {
        let err = require_json(CompletionPayload::Text("plain prose".to_string())).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_require_json_passes_json_payload() {
        let value = require_json(CompletionPayload::Json(serde_json::json!({"a": 1}))).unwrap();
        assert_eq!(value["a"], 1);
    }
}

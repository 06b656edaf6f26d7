//! The uniform result envelope every agent execution returns.
//!
//! Status is reported per execution as part of the envelope rather than as
//! mutable state on the agent instance, so concurrent executions of the same
//! agent never race on a shared field.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Envelope version stamped into every response's metadata.
pub const RESPONSE_VERSION: &str = "1.0";

/// Per-execution lifecycle state, reported in the envelope and mirrored as a
/// coarse last-writer-wins liveness indicator in the orchestrator registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Idle,
    Processing,
    Completed,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub processing_time_ms: u64,
    pub agent_id: String,
    pub version: String,
    pub execution_id: Uuid,
}

/// The uniform result envelope: every execution — single, sequential-step,
/// or parallel-branch — returns this shape; nothing bypasses it.
///
/// Invariant: `success == false` implies `data` is `None` and `error` is
/// `Some`; the inverse holds when `success == true`. Enforced by the
/// `ok`/`fail` constructors — do not build this struct by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse<T> {
    pub success: bool,
    pub status: AgentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub metadata: ResponseMetadata,
    /// 0–95 self-assessed output quality. Never 100 — generated content
    /// carries inherent uncertainty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
}

/// Agent responses with the payload erased to JSON, as collected at the
/// orchestrator and workflow layers.
pub type ErasedResponse = AgentResponse<Value>;

impl<T> AgentResponse<T> {
    pub fn ok(data: T, metadata: ResponseMetadata, confidence: u8) -> Self {
        AgentResponse {
            success: true,
            status: AgentStatus::Completed,
            data: Some(data),
            error: None,
            metadata,
            confidence: Some(confidence),
        }
    }

    pub fn fail(error: impl Into<String>, metadata: ResponseMetadata) -> Self {
        AgentResponse {
            success: false,
            status: AgentStatus::Error,
            data: None,
            error: Some(error.into()),
            metadata,
            confidence: None,
        }
    }
}

/// One agent's contribution to a workflow result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub agent_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub execution_time_ms: u64,
}

impl From<ErasedResponse> for StepResult {
    fn from(response: ErasedResponse) -> Self {
        StepResult {
            agent_id: response.metadata.agent_id,
            success: response.success,
            data: response.data,
            error: response.error,
            execution_time_ms: response.metadata.processing_time_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(agent_id: &str) -> ResponseMetadata {
        ResponseMetadata {
            processing_time_ms: 12,
            agent_id: agent_id.to_string(),
            version: RESPONSE_VERSION.to_string(),
            execution_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_ok_envelope_invariant() {
        let response = AgentResponse::ok(serde_json::json!({"n": 1}), metadata("x"), 80);
        assert!(response.success);
        assert_eq!(response.status, AgentStatus::Completed);
        assert!(response.data.is_some());
        assert!(response.error.is_none());
        assert_eq!(response.confidence, Some(80));
    }

    #[test]
    fn test_fail_envelope_invariant() {
        let response: ErasedResponse = AgentResponse::fail("boom", metadata("x"));
        assert!(!response.success);
        assert_eq!(response.status, AgentStatus::Error);
        assert!(response.data.is_none());
        assert_eq!(response.error.as_deref(), Some("boom"));
        assert!(response.confidence.is_none());
    }

    #[test]
    fn test_step_result_from_response_keeps_timing() {
        let response = AgentResponse::ok(serde_json::json!([1, 2]), metadata("skills-extractor"), 70);
        let step: StepResult = response.into();
        assert_eq!(step.agent_id, "skills-extractor");
        assert!(step.success);
        assert_eq!(step.execution_time_ms, 12);
    }

    #[test]
    fn test_failed_response_serializes_without_data_field() {
        let response: ErasedResponse = AgentResponse::fail("missing input", metadata("x"));
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["error"], "missing input");
    }
}

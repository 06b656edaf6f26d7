//! AI agent core for resume generation and optimization.
//!
//! Three layers, wired bottom-up:
//!   - `agents` — self-contained prompt-driven transformations behind the
//!     `Agent` trait, each returning a uniform response envelope.
//!   - `orchestrator` — the registry that executes agents individually, in
//!     sequence, or in parallel, with bounded execution history.
//!   - `workflow` — named multi-agent templates, custom step plans, and
//!     cross-agent insight synthesis.
//!
//! The embedding application constructs a [`Config`], an [`LlmClient`], and
//! an orchestrator via [`default_orchestrator`], then drives everything
//! through a [`WorkflowCoordinator`].

use std::sync::Arc;

pub mod agents;
pub mod config;
pub mod errors;
pub mod llm_client;
pub mod models;
pub mod orchestrator;
pub mod workflow;

pub use agents::{agent_ids, Agent, MAX_CONFIDENCE};
pub use config::{init_tracing, Config};
pub use errors::CoreError;
pub use llm_client::{CompletionPayload, GenerationParams, LlmClient, LlmError, TextCompletion};
pub use models::context::{
    AgentConfig, AgentConfigPatch, AgentContext, Aggressiveness, ExecutionOptions, StepInput,
    WorkflowParameters,
};
pub use models::profile::{DataBundle, Profile};
pub use models::response::{AgentResponse, AgentStatus, ErasedResponse, StepResult};
pub use orchestrator::{ExecutionRequest, ExecutionStats, Orchestrator};
pub use workflow::{
    CustomStep, WorkflowConfig, WorkflowCoordinator, WorkflowInsights, WorkflowResult,
    WorkflowType,
};

use agents::ats_optimizer::AtsOptimizerAgent;
use agents::content_optimizer::ContentOptimizerAgent;
use agents::grammar_enhancer::GrammarEnhancerAgent;
use agents::resume_builder::ResumeBuilderAgent;
use agents::resume_reviewer::ResumeReviewerAgent;
use agents::skills_extractor::SkillsExtractorAgent;

/// Builds an orchestrator with the full built-in agent roster registered
/// against the given completion backend.
pub fn default_orchestrator(
    llm: Arc<dyn TextCompletion>,
    history_capacity: usize,
) -> Arc<Orchestrator> {
    let orchestrator = Arc::new(Orchestrator::new(history_capacity));
    orchestrator.register_agent(Arc::new(ResumeBuilderAgent::new(llm.clone())));
    orchestrator.register_agent(Arc::new(ContentOptimizerAgent::new(llm.clone())));
    orchestrator.register_agent(Arc::new(GrammarEnhancerAgent::new(llm.clone())));
    orchestrator.register_agent(Arc::new(SkillsExtractorAgent::new(llm.clone())));
    orchestrator.register_agent(Arc::new(ResumeReviewerAgent::new(llm.clone())));
    orchestrator.register_agent(Arc::new(AtsOptimizerAgent::new(llm)));
    orchestrator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::StubCompletion;

    #[test]
    fn test_default_orchestrator_registers_full_roster() {
        let orchestrator =
            default_orchestrator(StubCompletion::json(serde_json::json!({})), 100);
        let ids: Vec<String> = orchestrator
            .list_agents()
            .into_iter()
            .map(|s| s.id)
            .collect();

        assert_eq!(
            ids,
            vec![
                agent_ids::ATS_OPTIMIZER,
                agent_ids::CONTENT_OPTIMIZER,
                agent_ids::GRAMMAR_ENHANCER,
                agent_ids::RESUME_BUILDER,
                agent_ids::RESUME_REVIEWER,
                agent_ids::SKILLS_EXTRACTOR,
            ]
        );
    }
}

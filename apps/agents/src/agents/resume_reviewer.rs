//! Resume Reviewer — hiring-manager style assessment of a profile. Advisory:
//! its failure does not halt sequential workflows.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agents::prompts::{RESUME_REVIEWER_SYSTEM, RESUME_REVIEWER_TEMPLATE};
use crate::agents::{agent_ids, require_json, Agent};
use crate::errors::CoreError;
use crate::llm_client::TextCompletion;
use crate::models::context::{AgentConfig, AgentContext, StepInput};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewRecommendations {
    #[serde(default)]
    pub immediate: Vec<String>,
    #[serde(default)]
    pub short_term: Vec<String>,
    #[serde(default)]
    pub long_term: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewerOutput {
    #[serde(default)]
    pub overall_score: u32,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: ReviewRecommendations,
}

pub struct ResumeReviewerAgent {
    llm: Arc<dyn TextCompletion>,
}

impl ResumeReviewerAgent {
    pub fn new(llm: Arc<dyn TextCompletion>) -> Self {
        ResumeReviewerAgent { llm }
    }
}

#[async_trait]
impl Agent for ResumeReviewerAgent {
    fn id(&self) -> &str {
        agent_ids::RESUME_REVIEWER
    }
    fn name(&self) -> &str {
        "Resume Reviewer"
    }
    fn description(&self) -> &str {
        "Reviews a resume like a senior hiring manager, scoring it and \
         returning tiered recommendations"
    }

    async fn process(
        &self,
        _input: &StepInput,
        context: &AgentContext,
        config: &AgentConfig,
    ) -> Result<Value, CoreError> {
        let (profile, data) = match (&context.profile, &context.data) {
            (Some(p), Some(d)) if !d.is_empty() => (p, d),
            _ => {
                return Err(CoreError::validation(
                    "review requires a profile and a non-empty data bundle",
                ))
            }
        };

        let for_role = match &context.position {
            Some(position) => format!(" targeting the role of {position}"),
            None => String::new(),
        };

        let prompt = RESUME_REVIEWER_TEMPLATE
            .replace("{for_role}", &for_role)
            .replace(
                "{resume_json}",
                &serde_json::to_string_pretty(&profile.resume_view(data))
                    .map_err(anyhow::Error::from)?,
            );

        let payload = self
            .llm
            .generate(&prompt, RESUME_REVIEWER_SYSTEM, &config.generation_params())
            .await?;
        let value = require_json(payload)?;

        let mut output: ReviewerOutput = serde_json::from_value(value)
            .map_err(|e| CoreError::validation(format!("malformed review output: {e}")))?;
        output.overall_score = output.overall_score.min(100);

        Ok(serde_json::to_value(output).map_err(anyhow::Error::from)?)
    }

    fn confidence(&self, data: &Value) -> u8 {
        let output: ReviewerOutput = match serde_json::from_value(data.clone()) {
            Ok(o) => o,
            Err(_) => return 50,
        };
        let mut score = 60usize;
        for list in [
            &output.recommendations.immediate,
            &output.recommendations.short_term,
            &output.recommendations.long_term,
        ] {
            if !list.is_empty() {
                score += 5;
            }
        }
        score += (output.strengths.len() + output.weaknesses.len()).min(10);
        score as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::StubCompletion;
    use crate::models::context::ExecutionOptions;
    use crate::models::profile::{DataBundle, Profile, SkillItem};
    use uuid::Uuid;

    fn review_context() -> AgentContext {
        let mut bundle = DataBundle::default();
        bundle.skills.push(SkillItem {
            id: Uuid::new_v4(),
            name: "Rust".to_string(),
            category: None,
            proficiency: None,
        });
        AgentContext {
            profile: Some(Profile::new("Platform roles")),
            data: Some(bundle),
            position: Some("Staff Engineer".to_string()),
            ..AgentContext::default()
        }
    }

    #[tokio::test]
    async fn test_missing_profile_is_validation_failure() {
        let agent = ResumeReviewerAgent::new(StubCompletion::json(serde_json::json!({})));
        let response = agent
            .execute(
                &StepInput::default(),
                &AgentContext::default(),
                &ExecutionOptions::default(),
            )
            .await;
        assert!(!response.success);
        assert!(response.error.unwrap().contains("profile"));
    }

    #[tokio::test]
    async fn test_overall_score_clamped_to_100() {
        let agent = ResumeReviewerAgent::new(StubCompletion::json(serde_json::json!({
            "overall_score": 240,
            "strengths": [],
            "weaknesses": [],
            "recommendations": {"immediate": [], "short_term": [], "long_term": []}
        })));

        let response = agent
            .execute(
                &StepInput::default(),
                &review_context(),
                &ExecutionOptions::default(),
            )
            .await;
        let output: ReviewerOutput = serde_json::from_value(response.data.unwrap()).unwrap();
        assert_eq!(output.overall_score, 100);
    }

    #[tokio::test]
    async fn test_missing_recommendation_tiers_default_to_empty() {
        let agent = ResumeReviewerAgent::new(StubCompletion::json(serde_json::json!({
            "overall_score": 70,
            "strengths": ["clear metrics"]
        })));

        let response = agent
            .execute(
                &StepInput::default(),
                &review_context(),
                &ExecutionOptions::default(),
            )
            .await;
        assert!(response.success);
        let output: ReviewerOutput = serde_json::from_value(response.data.unwrap()).unwrap();
        assert!(output.recommendations.immediate.is_empty());
    }

    #[test]
    fn test_confidence_rewards_complete_recommendation_tiers() {
        let agent = ResumeReviewerAgent::new(StubCompletion::json(serde_json::json!({})));
        let sparse = serde_json::to_value(ReviewerOutput::default()).unwrap();
        let full = serde_json::json!({
            "overall_score": 80,
            "strengths": ["a", "b"],
            "weaknesses": ["c"],
            "recommendations": {
                "immediate": ["x"], "short_term": ["y"], "long_term": ["z"]
            }
        });
        assert!(agent.confidence(&full) > agent.confidence(&sparse));
    }
}

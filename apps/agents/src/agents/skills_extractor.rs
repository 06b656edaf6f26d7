//! Skills Extractor — pulls required skills out of a job description and
//! computes gaps against the candidate's existing skills.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agents::prompts::{SKILLS_EXTRACTOR_SYSTEM, SKILLS_EXTRACTOR_TEMPLATE};
use crate::agents::{agent_ids, require_json, Agent};
use crate::errors::CoreError;
use crate::llm_client::TextCompletion;
use crate::models::context::{AgentConfig, AgentContext, StepInput};

/// One skill requirement extracted from the job description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredSkill {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    /// "required" | "preferred" | "nice-to-have"
    #[serde(default)]
    pub importance: String,
    #[serde(default)]
    pub matched: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillGaps {
    #[serde(default)]
    pub missing: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillsOutput {
    #[serde(default)]
    pub required_skills: Vec<RequiredSkill>,
    #[serde(default)]
    pub skill_gaps: SkillGaps,
}

pub struct SkillsExtractorAgent {
    llm: Arc<dyn TextCompletion>,
}

impl SkillsExtractorAgent {
    pub fn new(llm: Arc<dyn TextCompletion>) -> Self {
        SkillsExtractorAgent { llm }
    }
}

#[async_trait]
impl Agent for SkillsExtractorAgent {
    fn id(&self) -> &str {
        agent_ids::SKILLS_EXTRACTOR
    }
    fn name(&self) -> &str {
        "Skills Extractor"
    }
    fn description(&self) -> &str {
        "Extracts required skills from a job description and analyzes gaps \
         against the candidate's existing skills"
    }

    fn default_config(&self) -> AgentConfig {
        // Extraction wants determinism over creativity.
        AgentConfig {
            temperature: 0.2,
            ..AgentConfig::default()
        }
    }

    async fn process(
        &self,
        _input: &StepInput,
        context: &AgentContext,
        config: &AgentConfig,
    ) -> Result<Value, CoreError> {
        let jd = context
            .job_description_or_err()
            .map_err(CoreError::Validation)?;

        let existing: Vec<&str> = context
            .data
            .as_ref()
            .map(|d| d.skills.iter().map(|s| s.name.as_str()).collect())
            .unwrap_or_default();
        if existing.is_empty() {
            return Err(CoreError::validation(
                "gap analysis requires at least one existing skill in the data bundle",
            ));
        }

        let prompt = SKILLS_EXTRACTOR_TEMPLATE
            .replace("{job_description}", jd)
            .replace(
                "{existing_skills_json}",
                &serde_json::to_string(&existing).map_err(anyhow::Error::from)?,
            );

        let payload = self
            .llm
            .generate(&prompt, SKILLS_EXTRACTOR_SYSTEM, &config.generation_params())
            .await?;
        let value = require_json(payload)?;

        let mut output: SkillsOutput = serde_json::from_value(value)
            .map_err(|e| CoreError::validation(format!("malformed skills output: {e}")))?;
        repair_output(&mut output, &existing);

        Ok(serde_json::to_value(output).map_err(anyhow::Error::from)?)
    }

    fn confidence(&self, data: &Value) -> u8 {
        let output: SkillsOutput = match serde_json::from_value(data.clone()) {
            Ok(o) => o,
            Err(_) => return 50,
        };
        let mut score = 50usize + (output.required_skills.len() * 3).min(30);
        if !output.skill_gaps.recommendations.is_empty() {
            score += 10;
        }
        score.min(u8::MAX as usize) as u8
    }
}

/// Guarantees the output's required fields are coherent: recomputes `matched`
/// flags against the candidate's skills, derives `missing` from unmatched
/// required skills when the model omitted it, and backfills at least one
/// recommendation per missing skill (capped at 3).
fn repair_output(output: &mut SkillsOutput, existing: &[&str]) {
    let existing_lower: Vec<String> = existing.iter().map(|s| s.to_lowercase()).collect();

    for skill in &mut output.required_skills {
        let name_lower = skill.name.to_lowercase();
        skill.matched = existing_lower
            .iter()
            .any(|e| *e == name_lower || e.contains(&name_lower) || name_lower.contains(e.as_str()));
        if skill.importance.is_empty() {
            skill.importance = "preferred".to_string();
        }
    }

    if output.skill_gaps.missing.is_empty() {
        output.skill_gaps.missing = output
            .required_skills
            .iter()
            .filter(|s| !s.matched && s.importance == "required")
            .map(|s| s.name.clone())
            .collect();
    }

    if output.skill_gaps.recommendations.is_empty() {
        output.skill_gaps.recommendations = output
            .skill_gaps
            .missing
            .iter()
            .take(3)
            .map(|name| format!("Add evidence of {name} experience to a relevant bullet"))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::StubCompletion;
    use crate::models::context::ExecutionOptions;
    use crate::models::profile::{DataBundle, SkillItem};
    use uuid::Uuid;

    fn context_with_skills(skills: &[&str]) -> AgentContext {
        let mut bundle = DataBundle::default();
        for name in skills {
            bundle.skills.push(SkillItem {
                id: Uuid::new_v4(),
                name: name.to_string(),
                category: None,
                proficiency: None,
            });
        }
        AgentContext {
            job_description: Some("Senior Rust Engineer. Rust required. Kubernetes required.".into()),
            data: Some(bundle),
            ..AgentContext::default()
        }
    }

    #[tokio::test]
    async fn test_missing_job_description_is_validation_failure() {
        let agent = SkillsExtractorAgent::new(StubCompletion::json(serde_json::json!({})));
        let mut ctx = context_with_skills(&["Rust"]);
        ctx.job_description = None;

        let response = agent
            .execute(&StepInput::default(), &ctx, &ExecutionOptions::default())
            .await;
        assert!(!response.success);
        assert!(response.error.unwrap().contains("job description"));
    }

    #[tokio::test]
    async fn test_missing_existing_skills_is_validation_failure() {
        let agent = SkillsExtractorAgent::new(StubCompletion::json(serde_json::json!({})));
        let ctx = context_with_skills(&[]);

        let response = agent
            .execute(&StepInput::default(), &ctx, &ExecutionOptions::default())
            .await;
        assert!(!response.success);
        assert!(response.error.unwrap().contains("existing skill"));
    }

    #[tokio::test]
    async fn test_text_payload_becomes_validation_failure() {
        let agent = SkillsExtractorAgent::new(StubCompletion::text("I could not comply"));
        let ctx = context_with_skills(&["Rust"]);

        let response = agent
            .execute(&StepInput::default(), &ctx, &ExecutionOptions::default())
            .await;
        assert!(!response.success);
        assert!(response.error.unwrap().contains("unstructured text"));
    }

    #[tokio::test]
    async fn test_repair_recomputes_matched_and_backfills_recommendations() {
        let agent = SkillsExtractorAgent::new(StubCompletion::json(serde_json::json!({
            "required_skills": [
                {"name": "Rust", "importance": "required", "matched": false},
                {"name": "Kubernetes", "importance": "required", "matched": false}
            ],
            "skill_gaps": {"missing": [], "recommendations": []}
        })));
        let ctx = context_with_skills(&["Rust"]);

        let response = agent
            .execute(&StepInput::default(), &ctx, &ExecutionOptions::default())
            .await;
        assert!(response.success);

        let output: SkillsOutput = serde_json::from_value(response.data.unwrap()).unwrap();
        assert!(output.required_skills[0].matched, "Rust should be matched");
        assert!(!output.required_skills[1].matched);
        assert_eq!(output.skill_gaps.missing, vec!["Kubernetes".to_string()]);
        assert!(!output.skill_gaps.recommendations.is_empty());
    }

    #[test]
    fn test_confidence_weights_by_extraction_count() {
        let agent = SkillsExtractorAgent::new(StubCompletion::json(serde_json::json!({})));
        let small = serde_json::json!({
            "required_skills": [{"name": "Rust", "importance": "required", "matched": true}],
            "skill_gaps": {"missing": [], "recommendations": []}
        });
        let large = serde_json::json!({
            "required_skills": (0..20).map(|i| serde_json::json!({
                "name": format!("skill-{i}"), "importance": "preferred", "matched": false
            })).collect::<Vec<_>>(),
            "skill_gaps": {"missing": ["x"], "recommendations": ["do y"]}
        });

        assert!(agent.confidence(&large) > agent.confidence(&small));
    }
}

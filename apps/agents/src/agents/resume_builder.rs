//! Resume Builder — selects the most relevant master-data items for a target
//! job, enforcing minimum-selection policy by backfilling with
//! lower-confidence picks when the model under-selects.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::agents::prompts::{RESUME_BUILDER_SYSTEM, RESUME_BUILDER_TEMPLATE};
use crate::agents::{agent_ids, require_json, Agent};
use crate::errors::CoreError;
use crate::llm_client::TextCompletion;
use crate::models::context::{AgentConfig, AgentContext, StepInput};
use crate::models::profile::DataBundle;

/// Fallback minimums when the step input does not set them.
const DEFAULT_MIN_EXPERIENCES: usize = 2;
const DEFAULT_MIN_SKILLS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativePick {
    pub id: Uuid,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuilderOutput {
    #[serde(default)]
    pub selected_experience_ids: Vec<Uuid>,
    #[serde(default)]
    pub selected_project_ids: Vec<Uuid>,
    #[serde(default)]
    pub selected_skill_ids: Vec<Uuid>,
    #[serde(default)]
    pub selected_education_ids: Vec<Uuid>,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub alternatives: Vec<AlternativePick>,
    /// How many items were backfilled to meet the minimum-selection policy.
    #[serde(default)]
    pub backfilled: usize,
}

pub struct ResumeBuilderAgent {
    llm: Arc<dyn TextCompletion>,
}

impl ResumeBuilderAgent {
    pub fn new(llm: Arc<dyn TextCompletion>) -> Self {
        ResumeBuilderAgent { llm }
    }
}

#[async_trait]
impl Agent for ResumeBuilderAgent {
    fn id(&self) -> &str {
        agent_ids::RESUME_BUILDER
    }
    fn name(&self) -> &str {
        "Resume Builder"
    }
    fn description(&self) -> &str {
        "Selects the most relevant experiences, projects, skills, and \
         education from the master data for a target job"
    }

    fn default_config(&self) -> AgentConfig {
        AgentConfig {
            temperature: 0.4,
            ..AgentConfig::default()
        }
    }

    async fn process(
        &self,
        input: &StepInput,
        context: &AgentContext,
        config: &AgentConfig,
    ) -> Result<Value, CoreError> {
        let jd = context
            .job_description_or_err()
            .map_err(CoreError::Validation)?;
        let data = context
            .data
            .as_ref()
            .filter(|d| !d.is_empty())
            .ok_or_else(|| {
                CoreError::validation("resume building requires a non-empty data bundle")
            })?;

        let min_experiences = input
            .min_selected_experiences
            .unwrap_or(DEFAULT_MIN_EXPERIENCES);
        let min_skills = input.min_selected_skills.unwrap_or(DEFAULT_MIN_SKILLS);

        let prompt = RESUME_BUILDER_TEMPLATE
            .replace("{role_label}", &context.role_label())
            .replace("{job_description}", jd)
            .replace(
                "{data_json}",
                &serde_json::to_string_pretty(&data.prompt_digest())
                    .map_err(anyhow::Error::from)?,
            )
            .replace("{min_experiences}", &min_experiences.to_string())
            .replace("{min_skills}", &min_skills.to_string());

        let payload = self
            .llm
            .generate(&prompt, RESUME_BUILDER_SYSTEM, &config.generation_params())
            .await?;
        let value = require_json(payload)?;

        let mut output: BuilderOutput = serde_json::from_value(value)
            .map_err(|e| CoreError::validation(format!("malformed selection output: {e}")))?;
        repair_selection(&mut output, data, min_experiences, min_skills);

        Ok(serde_json::to_value(output).map_err(anyhow::Error::from)?)
    }

    fn confidence(&self, data: &Value) -> u8 {
        let output: BuilderOutput = match serde_json::from_value(data.clone()) {
            Ok(o) => o,
            Err(_) => return 50,
        };
        let mut score: i32 = 80;
        if output.backfilled > 0 {
            // Backfilled picks were not the model's choice — lower certainty.
            score -= 10 * output.backfilled.min(3) as i32;
        }
        if !output.alternatives.is_empty() {
            score += 10;
        }
        score.clamp(0, u8::MAX as i32) as u8
    }
}

/// Drops ids not present in the bundle, then backfills each section to its
/// minimum with remaining items in bundle order. Bundle order approximates
/// the user's own ranking, so backfills are plausible lower-confidence picks.
fn repair_selection(
    output: &mut BuilderOutput,
    data: &DataBundle,
    min_experiences: usize,
    min_skills: usize,
) {
    let mut backfilled = 0usize;

    let experience_ids: Vec<Uuid> = data.experiences.iter().map(|e| e.id).collect();
    let skill_ids: Vec<Uuid> = data.skills.iter().map(|s| s.id).collect();
    let project_ids: Vec<Uuid> = data.projects.iter().map(|p| p.id).collect();
    let education_ids: Vec<Uuid> = data.education.iter().map(|e| e.id).collect();

    output.selected_experience_ids.retain(|id| experience_ids.contains(id));
    output.selected_skill_ids.retain(|id| skill_ids.contains(id));
    output.selected_project_ids.retain(|id| project_ids.contains(id));
    output.selected_education_ids.retain(|id| education_ids.contains(id));

    backfilled += backfill(&mut output.selected_experience_ids, &experience_ids, min_experiences);
    backfilled += backfill(&mut output.selected_skill_ids, &skill_ids, min_skills);

    if output.rationale.trim().is_empty() {
        output.rationale =
            "Selection based on overlap between item content and the job description.".to_string();
    }

    if backfilled > 0 {
        debug!(backfilled, "resume builder backfilled selections to meet minimums");
    }
    output.backfilled = backfilled;
}

/// Appends ids from `pool` (in order) until `selected` reaches `min` or the
/// pool is exhausted. Returns how many were added.
fn backfill(selected: &mut Vec<Uuid>, pool: &[Uuid], min: usize) -> usize {
    let mut added = 0;
    for id in pool {
        if selected.len() >= min {
            break;
        }
        if !selected.contains(id) {
            selected.push(*id);
            added += 1;
        }
    }
    added
}

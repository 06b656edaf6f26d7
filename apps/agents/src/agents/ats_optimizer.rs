//! ATS Optimizer — keyword and format compatibility analysis of a resume
//! against a job description, with an actionable two-tier plan.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agents::prompts::{ATS_OPTIMIZER_SYSTEM, ATS_OPTIMIZER_TEMPLATE};
use crate::agents::{agent_ids, require_json, Agent};
use crate::errors::CoreError;
use crate::llm_client::TextCompletion;
use crate::models::context::{AgentConfig, AgentContext, StepInput};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItem {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionPlan {
    #[serde(default)]
    pub immediate: Vec<ActionItem>,
    #[serde(default)]
    pub later: Vec<ActionItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtsOutput {
    #[serde(default)]
    pub compatibility_score: u32,
    #[serde(default)]
    pub keyword_matches: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub format_issues: Vec<String>,
    #[serde(default)]
    pub action_plan: ActionPlan,
}

pub struct AtsOptimizerAgent {
    llm: Arc<dyn TextCompletion>,
}

impl AtsOptimizerAgent {
    pub fn new(llm: Arc<dyn TextCompletion>) -> Self {
        AtsOptimizerAgent { llm }
    }
}

#[async_trait]
impl Agent for AtsOptimizerAgent {
    fn id(&self) -> &str {
        agent_ids::ATS_OPTIMIZER
    }
    fn name(&self) -> &str {
        "ATS Optimizer"
    }
    fn description(&self) -> &str {
        "Analyzes keyword coverage and format risks of a resume against a job \
         description for applicant tracking systems"
    }

    fn default_config(&self) -> AgentConfig {
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
        let (profile, data) = match (&context.profile, &context.data) {
            (Some(p), Some(d)) if !d.is_empty() => (p, d),
            _ => {
                return Err(CoreError::validation(
                    "ATS analysis requires a profile and a non-empty data bundle",
                ))
            }
        };

        let prompt = ATS_OPTIMIZER_TEMPLATE
            .replace("{role_label}", &context.role_label())
            .replace("{job_description}", jd)
            .replace(
                "{resume_json}",
                &serde_json::to_string_pretty(&profile.resume_view(data))
                    .map_err(anyhow::Error::from)?,
            );

        let payload = self
            .llm
            .generate(&prompt, ATS_OPTIMIZER_SYSTEM, &config.generation_params())
            .await?;
        let value = require_json(payload)?;

        let mut output: AtsOutput = serde_json::from_value(value)
            .map_err(|e| CoreError::validation(format!("malformed ATS output: {e}")))?;
        repair_output(&mut output);

        Ok(serde_json::to_value(output).map_err(anyhow::Error::from)?)
    }

    fn confidence(&self, data: &Value) -> u8 {
        let output: AtsOutput = match serde_json::from_value(data.clone()) {
            Ok(o) => o,
            Err(_) => return 50,
        };
        let mut score = 55usize + (output.keyword_matches.len() * 2).min(20);
        if !output.action_plan.immediate.is_empty() {
            score += 10;
        }
        score as u8
    }
}

/// Clamps the score and guarantees the immediate plan is non-empty whenever
/// missing keywords were identified.
fn repair_output(output: &mut AtsOutput) {
    output.compatibility_score = output.compatibility_score.min(100);

    if output.action_plan.immediate.is_empty() && !output.missing_keywords.is_empty() {
        output.action_plan.immediate = output
            .missing_keywords
            .iter()
            .take(3)
            .map(|kw| ActionItem {
                action: format!("Add '{kw}' to a relevant skills or experience entry"),
                reason: "keyword appears in the job description but not the resume".to_string(),
            })
            .collect();
    }
}

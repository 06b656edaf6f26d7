//! Content Optimizer — rewrites experience and project bullets against a job
//! description. Always records at least one change so downstream consumers
//! can rely on the list being non-empty.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::agents::prompts::{
    CONTENT_OPTIMIZER_SYSTEM, CONTENT_OPTIMIZER_TEMPLATE, CUSTOM_INSTRUCTIONS_PREFIX,
};
use crate::agents::{agent_ids, require_json, Agent};
use crate::errors::CoreError;
use crate::llm_client::TextCompletion;
use crate::models::context::{AgentConfig, AgentContext, Aggressiveness, StepInput};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentChange {
    #[serde(default)]
    pub item_id: Option<Uuid>,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub optimized: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizerOutput {
    #[serde(default)]
    pub changes: Vec<ContentChange>,
    #[serde(default)]
    pub summary: String,
}

pub struct ContentOptimizerAgent {
    llm: Arc<dyn TextCompletion>,
}

impl ContentOptimizerAgent {
    pub fn new(llm: Arc<dyn TextCompletion>) -> Self {
        ContentOptimizerAgent { llm }
    }

    /// Gathers the content this pass operates on: explicit step text when
    /// provided, otherwise all experience/project bullets from the bundle.
    fn collect_content(input: &StepInput, context: &AgentContext) -> Value {
        if let Some(text) = input.text.as_deref().filter(|t| !t.trim().is_empty()) {
            return serde_json::json!([{ "item_id": null, "section": "free-text", "bullets": [text] }]);
        }

        let mut items = Vec::new();
        if let Some(data) = &context.data {
            for exp in &data.experiences {
                if !exp.bullets.is_empty() {
                    items.push(serde_json::json!({
                        "item_id": exp.id,
                        "section": "experience",
                        "title": format!("{} — {}", exp.title, exp.company),
                        "bullets": exp.bullets,
                    }));
                }
            }
            for project in &data.projects {
                if !project.bullets.is_empty() {
                    items.push(serde_json::json!({
                        "item_id": project.id,
                        "section": "project",
                        "title": project.name,
                        "bullets": project.bullets,
                    }));
                }
            }
        }
        Value::Array(items)
    }
}

#[async_trait]
impl Agent for ContentOptimizerAgent {
    fn id(&self) -> &str {
        agent_ids::CONTENT_OPTIMIZER
    }
    fn name(&self) -> &str {
        "Content Optimizer"
    }
    fn description(&self) -> &str {
        "Rewrites experience and project bullets to align with a target job \
         description without inventing accomplishments"
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

        let content = Self::collect_content(input, context);
        if content.as_array().map(|a| a.is_empty()).unwrap_or(true) {
            return Err(CoreError::validation(
                "no content to optimize: provide step text or a bundle with bullets",
            ));
        }

        let aggressiveness = input.aggressiveness.unwrap_or_default();
        let focus = if input.focus_areas.is_empty() {
            "general alignment".to_string()
        } else {
            input.focus_areas.join(", ")
        };

        let mut prompt = CONTENT_OPTIMIZER_TEMPLATE
            .replace("{role_label}", &context.role_label())
            .replace("{job_description}", jd)
            .replace(
                "{aggressiveness}",
                match aggressiveness {
                    Aggressiveness::Conservative => "conservative",
                    Aggressiveness::Balanced => "balanced",
                    Aggressiveness::Bold => "bold",
                },
            )
            .replace("{focus_areas}", &focus)
            .replace(
                "{content_json}",
                &serde_json::to_string_pretty(&content).map_err(anyhow::Error::from)?,
            );
        if let Some(instructions) = input
            .custom_instructions
            .as_deref()
            .or(config.custom_instructions.as_deref())
        {
            prompt.push_str(CUSTOM_INSTRUCTIONS_PREFIX);
            prompt.push_str(instructions);
        }

        let payload = self
            .llm
            .generate(&prompt, CONTENT_OPTIMIZER_SYSTEM, &config.generation_params())
            .await?;
        let value = require_json(payload)?;

        let mut output: OptimizerOutput = serde_json::from_value(value)
            .map_err(|e| CoreError::validation(format!("malformed optimizer output: {e}")))?;
        repair_output(&mut output, &content);

        Ok(serde_json::to_value(output).map_err(anyhow::Error::from)?)
    }

    fn confidence(&self, data: &Value) -> u8 {
        let output: OptimizerOutput = match serde_json::from_value(data.clone()) {
            Ok(o) => o,
            Err(_) => return 50,
        };
        // A lone no-op change means the model had nothing to improve.
        let substantive = output
            .changes
            .iter()
            .filter(|c| c.original != c.optimized)
            .count();
        (55 + (substantive * 5).min(30)) as u8
    }
}

/// Guarantees at least one change is recorded. When the model returns none,
/// records a no-op change over the first bullet so callers always see what
/// was (or was not) touched.
fn repair_output(output: &mut OptimizerOutput, content: &Value) {
    if output.changes.is_empty() {
        let first_bullet = content
            .as_array()
            .and_then(|items| items.first())
            .and_then(|item| item["bullets"].as_array())
            .and_then(|bullets| bullets.first())
            .and_then(|b| b.as_str())
            .unwrap_or("")
            .to_string();
        output.changes.push(ContentChange {
            item_id: None,
            section: "general".to_string(),
            original: first_bullet.clone(),
            optimized: first_bullet,
            reason: "content already aligned with the job description".to_string(),
        });
    }
    if output.summary.trim().is_empty() {
        output.summary = format!("{} change(s) proposed", output.changes.len());
    }
}

//! Grammar Enhancer — copy-editing pass over resume text. Meaning-preserving
//! by instruction; the repair step guarantees the corrected text is never
//! empty.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agents::prompts::{GRAMMAR_ENHANCER_SYSTEM, GRAMMAR_ENHANCER_TEMPLATE};
use crate::agents::{agent_ids, require_json, Agent};
use crate::errors::CoreError;
use crate::llm_client::TextCompletion;
use crate::models::context::{AgentConfig, AgentContext, StepInput};

/// Anything shorter is not worth an LLM round-trip and is likely caller error.
const MIN_TEXT_LEN: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Correction {
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub corrected: String,
    /// "tense" | "grammar" | "wordiness" | "spelling" | ...
    #[serde(default)]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrammarOutput {
    #[serde(default)]
    pub corrected_text: String,
    #[serde(default)]
    pub corrections: Vec<Correction>,
}

pub struct GrammarEnhancerAgent {
    llm: Arc<dyn TextCompletion>,
}

impl GrammarEnhancerAgent {
    pub fn new(llm: Arc<dyn TextCompletion>) -> Self {
        GrammarEnhancerAgent { llm }
    }

    /// The text this pass edits: explicit step text, else the profile summary.
    fn source_text<'a>(input: &'a StepInput, context: &'a AgentContext) -> Option<&'a str> {
        input
            .text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                context
                    .data
                    .as_ref()
                    .and_then(|d| d.personal.summary.as_deref())
            })
    }
}

#[async_trait]
impl Agent for GrammarEnhancerAgent {
    fn id(&self) -> &str {
        agent_ids::GRAMMAR_ENHANCER
    }
    fn name(&self) -> &str {
        "Grammar Enhancer"
    }
    fn description(&self) -> &str {
        "Corrects grammar, tense consistency, and wordiness in resume text \
         without changing meaning"
    }

    fn default_config(&self) -> AgentConfig {
        // Copy editing is near-deterministic.
        AgentConfig {
            temperature: 0.1,
            ..AgentConfig::default()
        }
    }

    async fn process(
        &self,
        input: &StepInput,
        context: &AgentContext,
        config: &AgentConfig,
    ) -> Result<Value, CoreError> {
        let text = Self::source_text(input, context)
            .ok_or_else(|| CoreError::validation("no text to enhance: provide step text"))?;
        if text.trim().len() < MIN_TEXT_LEN {
            return Err(CoreError::validation(format!(
                "text too short to enhance ({} chars, minimum {MIN_TEXT_LEN})",
                text.trim().len()
            )));
        }

        let prompt = GRAMMAR_ENHANCER_TEMPLATE.replace("{text}", text);
        let payload = self
            .llm
            .generate(&prompt, GRAMMAR_ENHANCER_SYSTEM, &config.generation_params())
            .await?;
        let value = require_json(payload)?;

        let mut output: GrammarOutput = serde_json::from_value(value)
            .map_err(|e| CoreError::validation(format!("malformed grammar output: {e}")))?;
        if output.corrected_text.trim().is_empty() {
            output.corrected_text = text.to_string();
        }

        Ok(serde_json::to_value(output).map_err(anyhow::Error::from)?)
    }

    fn confidence(&self, data: &Value) -> u8 {
        let output: GrammarOutput = match serde_json::from_value(data.clone()) {
            Ok(o) => o,
            Err(_) => return 50,
        };
        (75 + (output.corrections.len() * 2).min(15)) as u8
    }
}

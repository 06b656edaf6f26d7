//! Execution inputs: shared context, tunable config, per-call options, and
//! the typed per-step input merged from workflow defaults and caller
//! parameters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm_client::GenerationParams;
use crate::models::profile::{DataBundle, Profile};

/// Read-only input bundle for a single execution or workflow.
/// Built once per workflow invocation and passed unchanged to every agent.
#[derive(Debug, Clone, Default)]
pub struct AgentContext {
    pub job_description: Option<String>,
    pub position: Option<String>,
    pub company: Option<String>,
    pub profile: Option<Profile>,
    pub data: Option<DataBundle>,
    pub metadata: HashMap<String, Value>,
}

impl AgentContext {
    /// Job description text, or a validation-friendly error message source.
    pub fn job_description_or_err(&self) -> Result<&str, String> {
        match self.job_description.as_deref() {
            Some(jd) if !jd.trim().is_empty() => Ok(jd),
            _ => Err("job description is required but missing".to_string()),
        }
    }

    /// Short "Position at Company" label for prompts; empty pieces omitted.
    pub fn role_label(&self) -> String {
        match (self.position.as_deref(), self.company.as_deref()) {
            (Some(p), Some(c)) => format!("{p} at {c}"),
            (Some(p), None) => p.to_string(),
            (None, Some(c)) => format!("a role at {c}"),
            (None, None) => "the target role".to_string(),
        }
    }
}

/// Tunable generation parameters for an agent. Each agent has defaults;
/// per-call patches merge over them field-wise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    #[serde(default)]
    pub custom_instructions: Option<String>,
    /// Hint for how much of the master data to inline into prompts.
    #[serde(default)]
    pub context_size_hint: Option<u32>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            temperature: 0.7,
            max_output_tokens: 4096,
            custom_instructions: None,
            context_size_hint: None,
        }
    }
}

impl AgentConfig {
    /// Merges a patch over this config. Explicit patch fields always win.
    pub fn apply(&self, patch: &AgentConfigPatch) -> AgentConfig {
        AgentConfig {
            temperature: patch.temperature.unwrap_or(self.temperature),
            max_output_tokens: patch.max_output_tokens.unwrap_or(self.max_output_tokens),
            custom_instructions: patch
                .custom_instructions
                .clone()
                .or_else(|| self.custom_instructions.clone()),
            context_size_hint: patch.context_size_hint.or(self.context_size_hint),
        }
    }

    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            ..GenerationParams::default()
        }
    }
}

/// Partial config override carried in `ExecutionOptions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfigPatch {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub custom_instructions: Option<String>,
    pub context_size_hint: Option<u32>,
}

/// Per-call execution options: config patch plus timeout/cache hints.
///
/// The timeout is a hint passed down from the workflow layer; enforcement
/// lives in the completion transport, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOptions {
    #[serde(default)]
    pub config: Option<AgentConfigPatch>,
    pub timeout_ms: u64,
    #[serde(default)]
    pub use_cache: bool,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        ExecutionOptions {
            config: None,
            timeout_ms: 60_000,
            use_cache: false,
        }
    }
}

impl ExecutionOptions {
    pub fn with_timeout(timeout_ms: u64) -> Self {
        ExecutionOptions {
            timeout_ms,
            ..ExecutionOptions::default()
        }
    }
}

/// How boldly content-rewriting agents may depart from the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggressiveness {
    Conservative,
    #[default]
    Balanced,
    Bold,
}

/// Typed per-step input. Workflow definitions declare defaults; caller
/// parameters merge over them key-wise before execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInput {
    /// Resume section this step focuses on (e.g. "experience", "summary").
    #[serde(default)]
    pub section: Option<String>,
    /// Free text to operate on directly (grammar/content passes).
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub aggressiveness: Option<Aggressiveness>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub min_selected_experiences: Option<usize>,
    #[serde(default)]
    pub min_selected_skills: Option<usize>,
    #[serde(default)]
    pub include_alternatives: Option<bool>,
    #[serde(default)]
    pub custom_instructions: Option<String>,
}

/// Caller-supplied workflow parameters, merged into every step's defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowParameters {
    #[serde(default)]
    pub aggressiveness: Option<Aggressiveness>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub custom_instructions: Option<String>,
    #[serde(default)]
    pub min_selected_experiences: Option<usize>,
    #[serde(default)]
    pub min_selected_skills: Option<usize>,
}

impl StepInput {
    /// Merges caller parameters over this step's defaults.
    /// Explicit parameters always override defaults for the same key.
    pub fn merged_under(&self, params: &WorkflowParameters) -> StepInput {
        StepInput {
            section: self.section.clone(),
            text: self.text.clone(),
            aggressiveness: params.aggressiveness.or(self.aggressiveness),
            focus_areas: if params.focus_areas.is_empty() {
                self.focus_areas.clone()
            } else {
                params.focus_areas.clone()
            },
            min_selected_experiences: params
                .min_selected_experiences
                .or(self.min_selected_experiences),
            min_selected_skills: params.min_selected_skills.or(self.min_selected_skills),
            include_alternatives: self.include_alternatives,
            custom_instructions: params
                .custom_instructions
                .clone()
                .or_else(|| self.custom_instructions.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_patch_overrides_only_set_fields() {
        let base = AgentConfig {
            temperature: 0.3,
            max_output_tokens: 2048,
            custom_instructions: Some("be terse".to_string()),
            context_size_hint: None,
        };
        let patch = AgentConfigPatch {
            temperature: Some(0.9),
            ..AgentConfigPatch::default()
        };

        let merged = base.apply(&patch);
        assert!((merged.temperature - 0.9).abs() < f32::EPSILON);
        assert_eq!(merged.max_output_tokens, 2048);
        assert_eq!(merged.custom_instructions.as_deref(), Some("be terse"));
    }

    #[test]
    fn test_generation_params_mirror_config() {
        let config = AgentConfig {
            temperature: 0.2,
            max_output_tokens: 1024,
            ..AgentConfig::default()
        };
        let params = config.generation_params();
        assert!((params.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(params.max_output_tokens, 1024);
    }

    #[test]
    fn test_step_input_merge_parameters_win() {
        let default_input = StepInput {
            section: Some("experience".to_string()),
            aggressiveness: Some(Aggressiveness::Conservative),
            min_selected_skills: Some(5),
            ..StepInput::default()
        };
        let params = WorkflowParameters {
            aggressiveness: Some(Aggressiveness::Bold),
            focus_areas: vec!["impact".to_string()],
            ..WorkflowParameters::default()
        };

        let merged = default_input.merged_under(&params);
        assert_eq!(merged.aggressiveness, Some(Aggressiveness::Bold));
        assert_eq!(merged.focus_areas, vec!["impact".to_string()]);
        // Keys the caller did not set keep their defaults
        assert_eq!(merged.section.as_deref(), Some("experience"));
        assert_eq!(merged.min_selected_skills, Some(5));
    }

    #[test]
    fn test_step_input_merge_empty_parameters_keep_defaults() {
        let default_input = StepInput {
            focus_areas: vec!["keywords".to_string()],
            min_selected_experiences: Some(3),
            ..StepInput::default()
        };
        let merged = default_input.merged_under(&WorkflowParameters::default());
        assert_eq!(merged, default_input);
    }

    #[test]
    fn test_job_description_or_err_rejects_blank() {
        let mut ctx = AgentContext::default();
        assert!(ctx.job_description_or_err().is_err());

        ctx.job_description = Some("   ".to_string());
        assert!(ctx.job_description_or_err().is_err());

        ctx.job_description = Some("Senior Rust Engineer".to_string());
        assert_eq!(ctx.job_description_or_err().unwrap(), "Senior Rust Engineer");
    }

    #[test]
    fn test_role_label_formats() {
        let mut ctx = AgentContext::default();
        assert_eq!(ctx.role_label(), "the target role");

        ctx.position = Some("Staff Engineer".to_string());
        ctx.company = Some("Acme".to_string());
        assert_eq!(ctx.role_label(), "Staff Engineer at Acme");
    }
}

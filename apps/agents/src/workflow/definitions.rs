//! Static workflow definition table: named workflow intents mapped to
//! ordered agent plans. Process-wide configuration data, not user state.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::agents::agent_ids;
use crate::models::context::StepInput;

/// The closed set of named workflow intents. Unknown strings deserialize to
/// `Custom` (lenient by design — see `parse_lenient`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowType {
    FullResumeOptimization,
    JobSpecificOptimization,
    ContentEnhancement,
    SkillsAnalysis,
    ResumeReview,
    AtsOptimization,
    ManualEditingAssistance,
    #[serde(other)]
    Custom,
}

impl WorkflowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowType::FullResumeOptimization => "full-resume-optimization",
            WorkflowType::JobSpecificOptimization => "job-specific-optimization",
            WorkflowType::ContentEnhancement => "content-enhancement",
            WorkflowType::SkillsAnalysis => "skills-analysis",
            WorkflowType::ResumeReview => "resume-review",
            WorkflowType::AtsOptimization => "ats-optimization",
            WorkflowType::ManualEditingAssistance => "manual-editing-assistance",
            WorkflowType::Custom => "custom",
        }
    }

    /// Parses a workflow type string. Unrecognized types fall back to
    /// `Custom` (an empty plan) rather than erroring; the fallback is logged
    /// so caller typos stay visible operationally.
    pub fn parse_lenient(s: &str) -> WorkflowType {
        match s {
            "full-resume-optimization" => WorkflowType::FullResumeOptimization,
            "job-specific-optimization" => WorkflowType::JobSpecificOptimization,
            "content-enhancement" => WorkflowType::ContentEnhancement,
            "skills-analysis" => WorkflowType::SkillsAnalysis,
            "resume-review" => WorkflowType::ResumeReview,
            "ats-optimization" => WorkflowType::AtsOptimization,
            "manual-editing-assistance" => WorkflowType::ManualEditingAssistance,
            "custom" => WorkflowType::Custom,
            other => {
                warn!(workflow_type = other, "unrecognized workflow type; falling back to custom");
                WorkflowType::Custom
            }
        }
    }

    /// All named (non-custom) types, for enumeration in the embedding app.
    pub fn all() -> [WorkflowType; 8] {
        [
            WorkflowType::FullResumeOptimization,
            WorkflowType::JobSpecificOptimization,
            WorkflowType::ContentEnhancement,
            WorkflowType::SkillsAnalysis,
            WorkflowType::ResumeReview,
            WorkflowType::AtsOptimization,
            WorkflowType::ManualEditingAssistance,
            WorkflowType::Custom,
        ]
    }
}

impl std::fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a workflow plan: which agent, with what default input.
#[derive(Debug, Clone)]
pub struct WorkflowStep {
    pub agent_id: &'static str,
    pub default_input: StepInput,
}

impl WorkflowStep {
    fn new(agent_id: &'static str) -> Self {
        WorkflowStep {
            agent_id,
            default_input: StepInput::default(),
        }
    }

    fn with_input(agent_id: &'static str, default_input: StepInput) -> Self {
        WorkflowStep {
            agent_id,
            default_input,
        }
    }
}

/// A resolved workflow plan.
#[derive(Debug, Clone)]
pub struct WorkflowDefinition {
    pub workflow_type: WorkflowType,
    pub description: &'static str,
    pub steps: Vec<WorkflowStep>,
    /// Whether the steps are independent enough to run concurrently when the
    /// caller asks for parallel execution.
    pub parallelizable: bool,
}

/// Resolves the static definition for a workflow type. Built fresh per call;
/// the table is immutable configuration, never mutated at runtime.
pub fn definition_for(workflow_type: WorkflowType) -> WorkflowDefinition {
    match workflow_type {
        WorkflowType::FullResumeOptimization => WorkflowDefinition {
            workflow_type,
            description: "End-to-end optimization: extract skills, rebuild the \
                          selection, rewrite content, polish grammar, then review",
            steps: vec![
                WorkflowStep::new(agent_ids::SKILLS_EXTRACTOR),
                WorkflowStep::with_input(
                    agent_ids::RESUME_BUILDER,
                    StepInput {
                        min_selected_experiences: Some(3),
                        min_selected_skills: Some(8),
                        include_alternatives: Some(true),
                        ..StepInput::default()
                    },
                ),
                WorkflowStep::with_input(
                    agent_ids::CONTENT_OPTIMIZER,
                    StepInput {
                        section: Some("experience".to_string()),
                        ..StepInput::default()
                    },
                ),
                WorkflowStep::new(agent_ids::GRAMMAR_ENHANCER),
                WorkflowStep::new(agent_ids::RESUME_REVIEWER),
            ],
            parallelizable: false,
        },
        WorkflowType::JobSpecificOptimization => WorkflowDefinition {
            workflow_type,
            description: "Tailor an existing profile to one job posting",
            steps: vec![
                WorkflowStep::new(agent_ids::SKILLS_EXTRACTOR),
                WorkflowStep::with_input(
                    agent_ids::CONTENT_OPTIMIZER,
                    StepInput {
                        focus_areas: vec!["keywords".to_string(), "impact".to_string()],
                        ..StepInput::default()
                    },
                ),
                WorkflowStep::new(agent_ids::ATS_OPTIMIZER),
            ],
            parallelizable: false,
        },
        WorkflowType::ContentEnhancement => WorkflowDefinition {
            workflow_type,
            description: "Rewrite then polish content, no reselection",
            steps: vec![
                WorkflowStep::new(agent_ids::CONTENT_OPTIMIZER),
                WorkflowStep::new(agent_ids::GRAMMAR_ENHANCER),
            ],
            parallelizable: false,
        },
        WorkflowType::SkillsAnalysis => WorkflowDefinition {
            workflow_type,
            description: "Skill extraction and gap analysis only",
            steps: vec![WorkflowStep::new(agent_ids::SKILLS_EXTRACTOR)],
            parallelizable: true,
        },
        WorkflowType::ResumeReview => WorkflowDefinition {
            workflow_type,
            description: "Independent review and ATS analysis",
            steps: vec![
                WorkflowStep::new(agent_ids::RESUME_REVIEWER),
                WorkflowStep::new(agent_ids::ATS_OPTIMIZER),
            ],
            parallelizable: true,
        },
        WorkflowType::AtsOptimization => WorkflowDefinition {
            workflow_type,
            description: "ATS compatibility analysis only",
            steps: vec![WorkflowStep::new(agent_ids::ATS_OPTIMIZER)],
            parallelizable: false,
        },
        WorkflowType::ManualEditingAssistance => WorkflowDefinition {
            workflow_type,
            description: "Assistive passes over user-provided text",
            steps: vec![
                WorkflowStep::new(agent_ids::GRAMMAR_ENHANCER),
                WorkflowStep::with_input(
                    agent_ids::CONTENT_OPTIMIZER,
                    StepInput {
                        aggressiveness: Some(crate::models::context::Aggressiveness::Conservative),
                        ..StepInput::default()
                    },
                ),
            ],
            parallelizable: false,
        },
        WorkflowType::Custom => WorkflowDefinition {
            workflow_type,
            description: "Caller-assembled workflow; no predefined steps",
            steps: vec![],
            parallelizable: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_named_type_has_a_definition() {
        for workflow_type in WorkflowType::all() {
            let definition = definition_for(workflow_type);
            assert_eq!(definition.workflow_type, workflow_type);
            if workflow_type != WorkflowType::Custom {
                assert!(!definition.steps.is_empty(), "{workflow_type} has no steps");
            }
        }
    }

    #[test]
    fn test_custom_definition_is_empty() {
        let definition = definition_for(WorkflowType::Custom);
        assert!(definition.steps.is_empty());
        assert!(!definition.parallelizable);
    }

    #[test]
    fn test_parse_lenient_falls_back_to_custom() {
        assert_eq!(
            WorkflowType::parse_lenient("resume-review"),
            WorkflowType::ResumeReview
        );
        assert_eq!(WorkflowType::parse_lenient("tpyo"), WorkflowType::Custom);
    }

    #[test]
    fn test_serde_round_trip_uses_kebab_case() {
        let json = serde_json::to_string(&WorkflowType::FullResumeOptimization).unwrap();
        assert_eq!(json, "\"full-resume-optimization\"");
        let parsed: WorkflowType = serde_json::from_str("\"ats-optimization\"").unwrap();
        assert_eq!(parsed, WorkflowType::AtsOptimization);
    }

    #[test]
    fn test_unknown_type_deserializes_to_custom() {
        let parsed: WorkflowType = serde_json::from_str("\"definitely-not-a-workflow\"").unwrap();
        assert_eq!(parsed, WorkflowType::Custom);
    }

    #[test]
    fn test_as_str_matches_parse_lenient() {
        for workflow_type in WorkflowType::all() {
            assert_eq!(
                WorkflowType::parse_lenient(workflow_type.as_str()),
                workflow_type
            );
        }
    }
}

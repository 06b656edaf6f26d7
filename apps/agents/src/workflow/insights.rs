//! Insight synthesis — second-pass aggregation over raw per-agent results
//! into workflow-level recommendations and a coarse impact estimate.

use serde::{Deserialize, Serialize};

use crate::agents::agent_ids;
use crate::agents::ats_optimizer::AtsOutput;
use crate::agents::resume_reviewer::ReviewerOutput;
use crate::agents::skills_extractor::SkillsOutput;
use crate::models::response::StepResult;

const MAX_KEY_RECOMMENDATIONS: usize = 5;
const MAX_PRIORITY_ACTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactTier {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowInsights {
    /// Success-rate percentage across all agents, recomputed fresh per run.
    pub overall_score: u32,
    /// At most 5 entries — simple list truncation, not ranked.
    pub key_recommendations: Vec<String>,
    /// At most 3 entries.
    pub priority_actions: Vec<String>,
    pub estimated_impact: ImpactTier,
}

/// Synthesizes insights from collected per-agent results.
///
/// Only *successful* results contribute; agent ids without known insight
/// fields are silently ignored. Returns `None` for an empty result set —
/// there is nothing to score or recommend.
pub fn generate_workflow_insights(results: &[StepResult]) -> Option<WorkflowInsights> {
    if results.is_empty() {
        return None;
    }

    let successful = results.iter().filter(|r| r.success).count();
    let overall_score =
        ((successful as f64 / results.len() as f64) * 100.0).round() as u32;

    let mut key_recommendations: Vec<String> = Vec::new();
    let mut priority_actions: Vec<String> = Vec::new();

    for result in results.iter().filter(|r| r.success) {
        let Some(data) = &result.data else { continue };

        match result.agent_id.as_str() {
            agent_ids::RESUME_REVIEWER => {
                if let Ok(output) = serde_json::from_value::<ReviewerOutput>(data.clone()) {
                    key_recommendations.extend(output.recommendations.immediate);
                    priority_actions.extend(output.recommendations.short_term);
                }
            }
            agent_ids::ATS_OPTIMIZER => {
                if let Ok(output) = serde_json::from_value::<AtsOutput>(data.clone()) {
                    priority_actions
                        .extend(output.action_plan.immediate.into_iter().map(|item| item.action));
                }
            }
            agent_ids::SKILLS_EXTRACTOR => {
                if let Ok(output) = serde_json::from_value::<SkillsOutput>(data.clone()) {
                    key_recommendations.extend(output.skill_gaps.recommendations);
                }
            }
            _ => {} // unrecognized agents contribute nothing
        }
    }

    key_recommendations.truncate(MAX_KEY_RECOMMENDATIONS);
    priority_actions.truncate(MAX_PRIORITY_ACTIONS);

    let estimated_impact = if overall_score >= 80 {
        ImpactTier::High
    } else if overall_score >= 60 {
        ImpactTier::Medium
    } else {
        ImpactTier::Low
    };

    Some(WorkflowInsights {
        overall_score,
        key_recommendations,
        priority_actions,
        estimated_impact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(agent_id: &str, success: bool, data: Option<serde_json::Value>) -> StepResult {
        StepResult {
            agent_id: agent_id.to_string(),
            success,
            data,
            error: (!success).then(|| "failed".to_string()),
            execution_time_ms: 1,
        }
    }

    fn ok(agent_id: &str) -> StepResult {
        step(agent_id, true, Some(serde_json::json!({})))
    }

    #[test]
    fn test_empty_results_yield_no_insights() {
        assert!(generate_workflow_insights(&[]).is_none());
    }

    #[test]
    fn test_all_successful_scores_100_high_impact() {
        let results: Vec<StepResult> = (0..5).map(|i| ok(&format!("agent-{i}"))).collect();
        let insights = generate_workflow_insights(&results).unwrap();
        assert_eq!(insights.overall_score, 100);
        assert_eq!(insights.estimated_impact, ImpactTier::High);
    }

    #[test]
    fn test_three_of_five_scores_60_medium_impact() {
        let results = vec![
            ok("a"),
            ok("b"),
            ok("c"),
            step("d", false, None),
            step("e", false, None),
        ];
        let insights = generate_workflow_insights(&results).unwrap();
        assert_eq!(insights.overall_score, 60);
        assert_eq!(insights.estimated_impact, ImpactTier::Medium);
    }

    #[test]
    fn test_low_success_rate_is_low_impact() {
        let results = vec![ok("a"), step("b", false, None), step("c", false, None)];
        let insights = generate_workflow_insights(&results).unwrap();
        assert_eq!(insights.overall_score, 33);
        assert_eq!(insights.estimated_impact, ImpactTier::Low);
    }

    #[test]
    fn test_known_agent_fields_feed_recommendations_and_actions() {
        let reviewer = step(
            "resume-reviewer",
            true,
            Some(serde_json::json!({
                "overall_score": 70,
                "recommendations": {
                    "immediate": ["Rewrite the summary"],
                    "short_term": ["Quantify old bullets"],
                    "long_term": []
                }
            })),
        );
        let ats = step(
            "ats-optimizer",
            true,
            Some(serde_json::json!({
                "compatibility_score": 60,
                "action_plan": {
                    "immediate": [{"action": "Add Kubernetes keyword", "reason": ""}],
                    "later": []
                }
            })),
        );
        let skills = step(
            "skills-extractor",
            true,
            Some(serde_json::json!({
                "skill_gaps": {"missing": ["Terraform"], "recommendations": ["Show IaC work"]}
            })),
        );

        let insights = generate_workflow_insights(&[reviewer, ats, skills]).unwrap();
        assert!(insights
            .key_recommendations
            .contains(&"Rewrite the summary".to_string()));
        assert!(insights.key_recommendations.contains(&"Show IaC work".to_string()));
        assert!(insights
            .priority_actions
            .contains(&"Quantify old bullets".to_string()));
        assert!(insights
            .priority_actions
            .contains(&"Add Kubernetes keyword".to_string()));
    }

    #[test]
    fn test_failed_agents_contribute_nothing() {
        let reviewer = step(
            "resume-reviewer",
            false,
            None,
        );
        let insights = generate_workflow_insights(&[reviewer]).unwrap();
        assert!(insights.key_recommendations.is_empty());
        assert!(insights.priority_actions.is_empty());
    }

    #[test]
    fn test_truncation_bounds_respected() {
        let many: Vec<String> = (0..10).map(|i| format!("rec {i}")).collect();
        let reviewer = step(
            "resume-reviewer",
            true,
            Some(serde_json::json!({
                "recommendations": {
                    "immediate": many,
                    "short_term": (0..10).map(|i| format!("act {i}")).collect::<Vec<_>>(),
                    "long_term": []
                }
            })),
        );

        let insights = generate_workflow_insights(&[reviewer]).unwrap();
        assert_eq!(insights.key_recommendations.len(), 5);
        assert_eq!(insights.priority_actions.len(), 3);
    }

    #[test]
    fn test_unrecognized_agent_ids_are_silently_ignored() {
        let unknown = step("mystery-agent", true, Some(serde_json::json!({"foo": "bar"})));
        let insights = generate_workflow_insights(&[unknown]).unwrap();
        assert_eq!(insights.overall_score, 100);
        assert!(insights.key_recommendations.is_empty());
    }
}

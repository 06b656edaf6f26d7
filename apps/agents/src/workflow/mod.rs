//! Workflow Coordinator — resolves named workflow templates, delegates to
//! the orchestrator, and synthesizes cross-agent insights.
//!
//! Failure policy: bulk workflow paths never return an error — any failure
//! escaping execution (including unknown-agent lookups) is caught here and
//! converted into a failed `WorkflowResult`. The one exception is
//! `execute_single_agent`, which deliberately returns a hard `Err` so direct
//! callers get a direct failure signal.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::agents::agent_ids;
use crate::errors::CoreError;
use crate::models::context::{
    AgentContext, ExecutionOptions, StepInput, WorkflowParameters,
};
use crate::models::profile::{DataBundle, Profile};
use crate::models::response::{ErasedResponse, StepResult};
use crate::orchestrator::{ExecutionRequest, Orchestrator};

pub mod definitions;
pub mod insights;

pub use definitions::{definition_for, WorkflowDefinition, WorkflowStep, WorkflowType};
pub use insights::{generate_workflow_insights, ImpactTier, WorkflowInsights};

/// Default per-agent timeout hint passed down to executions, in milliseconds.
pub const DEFAULT_AGENT_TIMEOUT_MS: u64 = 60_000;

/// Caller-supplied workflow request.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    pub workflow_type: WorkflowType,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub profile: Profile,
    pub data: DataBundle,
    #[serde(default)]
    pub parameters: WorkflowParameters,
    /// Honored only when the resolved definition declares itself
    /// parallelizable.
    #[serde(default)]
    pub parallel_execution: bool,
}

/// Aggregate result returned to the caller. `success` means the workflow ran
/// to completion; individual agent failures live in `agent_results`.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub success: bool,
    pub workflow_type: WorkflowType,
    pub agent_results: Vec<StepResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<WorkflowInsights>,
    pub total_execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One entry of an ad-hoc custom workflow.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomStep {
    pub agent_id: String,
    #[serde(default)]
    pub input: StepInput,
    /// Consecutive entries marked parallel execute as one concurrent batch.
    #[serde(default)]
    pub parallel: bool,
}

pub struct WorkflowCoordinator {
    orchestrator: Arc<Orchestrator>,
    default_timeout_ms: u64,
}

impl WorkflowCoordinator {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        WorkflowCoordinator {
            orchestrator,
            default_timeout_ms: DEFAULT_AGENT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout(mut self, default_timeout_ms: u64) -> Self {
        self.default_timeout_ms = default_timeout_ms;
        self
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }

    /// Executes a named workflow. Never returns an error: any failure that
    /// escapes execution is converted into a failed `WorkflowResult`.
    pub async fn execute_workflow(&self, config: WorkflowConfig) -> WorkflowResult {
        let started = Instant::now();
        let workflow_type = config.workflow_type;
        info!(
            %workflow_type,
            parallel = config.parallel_execution,
            "workflow started"
        );

        match self.run_workflow(&config).await {
            Ok(agent_results) => {
                let insights = generate_workflow_insights(&agent_results);
                let total_execution_time_ms = started.elapsed().as_millis() as u64;
                info!(
                    %workflow_type,
                    agents = agent_results.len(),
                    total_execution_time_ms,
                    "workflow completed"
                );
                WorkflowResult {
                    success: true,
                    workflow_type,
                    agent_results,
                    insights,
                    total_execution_time_ms,
                    error: None,
                }
            }
            Err(e) => {
                error!(%workflow_type, error = %e, "workflow failed");
                WorkflowResult {
                    success: false,
                    workflow_type,
                    agent_results: Vec::new(),
                    insights: None,
                    total_execution_time_ms: started.elapsed().as_millis() as u64,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn run_workflow(&self, config: &WorkflowConfig) -> Result<Vec<StepResult>, CoreError> {
        let context = build_context(config)?;
        let definition = definition_for(config.workflow_type);

        // Explicit parameters override each step's declared defaults per key.
        let requests: Vec<ExecutionRequest> = definition
            .steps
            .iter()
            .map(|step| ExecutionRequest {
                agent_id: step.agent_id.to_string(),
                input: step.default_input.merged_under(&config.parameters),
                options: ExecutionOptions::with_timeout(self.default_timeout_ms),
            })
            .collect();

        let responses = if config.parallel_execution && definition.parallelizable {
            self.orchestrator.execute_parallel(&requests, &context).await?
        } else {
            self.run_sequential(&requests, &context).await?
        };

        Ok(responses.into_iter().map(StepResult::from).collect())
    }

    /// Sequential loop with the reviewer exemption: reviews are advisory,
    /// so a failing `resume-reviewer` does not halt the sequence; every
    /// other agent failure is blocking.
    async fn run_sequential(
        &self,
        requests: &[ExecutionRequest],
        context: &AgentContext,
    ) -> Result<Vec<ErasedResponse>, CoreError> {
        let mut responses = Vec::with_capacity(requests.len());
        for request in requests {
            let response = self
                .orchestrator
                .execute_agent(&request.agent_id, &request.input, context, &request.options)
                .await?;
            let failed = !response.success;
            let advisory = request.agent_id == agent_ids::RESUME_REVIEWER;
            responses.push(response);

            if failed {
                if advisory {
                    info!(agent = %request.agent_id, "advisory agent failed; continuing");
                } else {
                    warn!(agent = %request.agent_id, "workflow halted on failing agent");
                    break;
                }
            }
        }
        Ok(responses)
    }

    /// Executes an ad-hoc workflow with explicit per-step parallel grouping.
    /// Consecutive `parallel` entries run as one concurrent batch; all other
    /// entries run alone. Groups execute strictly in formation order.
    pub async fn execute_custom_workflow(
        &self,
        agent_sequence: Vec<CustomStep>,
        config: WorkflowConfig,
    ) -> WorkflowResult {
        let started = Instant::now();
        info!(steps = agent_sequence.len(), "custom workflow started");

        match self.run_custom_workflow(agent_sequence, &config).await {
            Ok(agent_results) => {
                let insights = generate_workflow_insights(&agent_results);
                WorkflowResult {
                    success: true,
                    workflow_type: WorkflowType::Custom,
                    agent_results,
                    insights,
                    total_execution_time_ms: started.elapsed().as_millis() as u64,
                    error: None,
                }
            }
            Err(e) => {
                error!(error = %e, "custom workflow failed");
                WorkflowResult {
                    success: false,
                    workflow_type: WorkflowType::Custom,
                    agent_results: Vec::new(),
                    insights: None,
                    total_execution_time_ms: started.elapsed().as_millis() as u64,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn run_custom_workflow(
        &self,
        agent_sequence: Vec<CustomStep>,
        config: &WorkflowConfig,
    ) -> Result<Vec<StepResult>, CoreError> {
        let context = build_context(config)?;
        let groups = group_steps(agent_sequence);

        let mut results = Vec::new();
        for group in groups {
            let requests: Vec<ExecutionRequest> = group
                .steps
                .into_iter()
                .map(|step| ExecutionRequest {
                    agent_id: step.agent_id,
                    input: step.input.merged_under(&config.parameters),
                    options: ExecutionOptions::with_timeout(self.default_timeout_ms),
                })
                .collect();

            let responses = if group.parallel {
                self.orchestrator.execute_parallel(&requests, &context).await?
            } else {
                self.orchestrator.execute_sequence(&requests, &context).await?
            };
            results.extend(responses.into_iter().map(StepResult::from));
        }
        Ok(results)
    }

    /// Convenience pass-through for ad-hoc one-off calls. Unlike the bulk
    /// workflow paths, a failed execution is surfaced as a hard `Err`.
    pub async fn execute_single_agent(
        &self,
        agent_id: &str,
        input: StepInput,
        context: &AgentContext,
    ) -> Result<ErasedResponse, CoreError> {
        let response = self
            .orchestrator
            .execute_agent(
                agent_id,
                &input,
                context,
                &ExecutionOptions::with_timeout(self.default_timeout_ms),
            )
            .await?;

        if !response.success {
            return Err(CoreError::AgentFailed {
                agent_id: agent_id.to_string(),
                message: response
                    .error
                    .unwrap_or_else(|| "execution failed without an error message".to_string()),
            });
        }
        Ok(response)
    }
}

/// Builds the shared context every agent in the workflow receives.
fn build_context(config: &WorkflowConfig) -> Result<AgentContext, CoreError> {
    let mut metadata = std::collections::HashMap::new();
    metadata.insert(
        "workflow_type".to_string(),
        serde_json::Value::String(config.workflow_type.as_str().to_string()),
    );
    metadata.insert(
        "parameters".to_string(),
        serde_json::to_value(&config.parameters).map_err(anyhow::Error::from)?,
    );

    Ok(AgentContext {
        job_description: config.job_description.clone(),
        position: config.position.clone(),
        company: config.company.clone(),
        profile: Some(config.profile.clone()),
        data: Some(config.data.clone()),
        metadata,
    })
}

/// An execution group formed from consecutive custom steps.
struct StepGroup {
    parallel: bool,
    steps: Vec<CustomStep>,
}

/// Groups consecutive `parallel` entries into concurrent batches; every
/// other entry becomes its own single-entry group. A parallel run of one is
/// a single-entry group too.
fn group_steps(steps: Vec<CustomStep>) -> Vec<StepGroup> {
    let mut groups: Vec<StepGroup> = Vec::new();
    let mut run: Vec<CustomStep> = Vec::new();

    for step in steps {
        if step.parallel {
            run.push(step);
        } else {
            flush_run(&mut groups, &mut run);
            groups.push(StepGroup {
                parallel: false,
                steps: vec![step],
            });
        }
    }
    flush_run(&mut groups, &mut run);
    groups
}

fn flush_run(groups: &mut Vec<StepGroup>, run: &mut Vec<CustomStep>) {
    if run.is_empty() {
        return;
    }
    let steps = std::mem::take(run);
    groups.push(StepGroup {
        parallel: steps.len() > 1,
        steps,
    });
}

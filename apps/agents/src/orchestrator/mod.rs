//! Agent Registry / Orchestrator — holds registered agents, executes them
//! individually, in sequence, or in parallel, and tracks execution history.
//!
//! Shared-state policy: the registry, history, and per-agent liveness map are
//! process-wide mutable state behind locks, so concurrent `execute_parallel`
//! batches interleave safely on a multi-threaded runtime. One orchestrator
//! instance is constructed at startup and injected wherever it is needed;
//! tests construct isolated instances.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::agents::Agent;
use crate::errors::CoreError;
use crate::models::context::{AgentContext, ExecutionOptions, StepInput};
use crate::models::response::{AgentStatus, ErasedResponse};

/// Default bound on the execution-history ring buffer.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// One history entry, appended on every single-agent execution.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionRecord {
    pub agent_id: String,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub success: bool,
}

/// Aggregate statistics derived from the full history on each call.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionStats {
    pub total_executions: usize,
    /// 0–100.
    pub success_rate: u32,
    pub average_duration_ms: u64,
    pub agent_usage: HashMap<String, usize>,
}

/// Registry snapshot row returned by `list_agents`.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Coarse last-writer-wins liveness indicator, not a per-call signal.
    pub status: AgentStatus,
}

/// One entry in a sequence or parallel batch.
#[derive(Debug, Clone, Default)]
pub struct ExecutionRequest {
    pub agent_id: String,
    pub input: StepInput,
    pub options: ExecutionOptions,
}

impl ExecutionRequest {
    pub fn new(agent_id: impl Into<String>, input: StepInput) -> Self {
        ExecutionRequest {
            agent_id: agent_id.into(),
            input,
            options: ExecutionOptions::default(),
        }
    }
}

pub struct Orchestrator {
    agents: Mutex<HashMap<String, Arc<dyn Agent>>>,
    history: Mutex<VecDeque<ExecutionRecord>>,
    last_status: Mutex<HashMap<String, AgentStatus>>,
    history_capacity: usize,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Orchestrator::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl Orchestrator {
    pub fn new(history_capacity: usize) -> Self {
        Orchestrator {
            agents: Mutex::new(HashMap::new()),
            history: Mutex::new(VecDeque::with_capacity(history_capacity.min(1024))),
            last_status: Mutex::new(HashMap::new()),
            history_capacity: history_capacity.max(1),
        }
    }

    /// Inserts or overwrites the registry entry keyed by the agent's id.
    /// Last registration wins; an overwrite is logged, not rejected.
    pub fn register_agent(&self, agent: Arc<dyn Agent>) {
        let id = agent.id().to_string();
        let mut agents = self.agents.lock().expect("agent registry poisoned");
        if agents.insert(id.clone(), agent).is_some() {
            warn!(agent = %id, "re-registered agent; previous registration replaced");
        } else {
            info!(agent = %id, "agent registered");
        }
        self.last_status
            .lock()
            .expect("status map poisoned")
            .entry(id)
            .or_insert(AgentStatus::Idle);
    }

    pub fn get_agent(&self, id: &str) -> Option<Arc<dyn Agent>> {
        self.agents
            .lock()
            .expect("agent registry poisoned")
            .get(id)
            .cloned()
    }

    /// Snapshot of every registered agent with its coarse liveness status.
    pub fn list_agents(&self) -> Vec<AgentSummary> {
        let statuses = self.last_status.lock().expect("status map poisoned").clone();
        let mut summaries: Vec<AgentSummary> = self
            .agents
            .lock()
            .expect("agent registry poisoned")
            .values()
            .map(|agent| AgentSummary {
                id: agent.id().to_string(),
                name: agent.name().to_string(),
                description: agent.description().to_string(),
                status: statuses.get(agent.id()).copied().unwrap_or_default(),
            })
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    /// Executes one agent. Fails fast with `UnknownAgent` — before any
    /// history append — when the id is not registered; otherwise the result
    /// is always an envelope and one history entry is recorded regardless of
    /// outcome.
    pub async fn execute_agent(
        &self,
        agent_id: &str,
        input: &StepInput,
        context: &AgentContext,
        options: &ExecutionOptions,
    ) -> Result<ErasedResponse, CoreError> {
        let agent = self
            .get_agent(agent_id)
            .ok_or_else(|| CoreError::UnknownAgent(agent_id.to_string()))?;

        self.set_status(agent_id, AgentStatus::Processing);
        let response = agent.execute(input, context, options).await;
        self.set_status(agent_id, response.status);

        self.append_history(ExecutionRecord {
            agent_id: agent_id.to_string(),
            timestamp: Utc::now(),
            duration_ms: response.metadata.processing_time_ms,
            success: response.success,
        });

        Ok(response)
    }

    /// Runs each step in order, stopping immediately after the first failing
    /// step. The returned array includes the failing entry; later steps are
    /// never attempted.
    pub async fn execute_sequence(
        &self,
        steps: &[ExecutionRequest],
        context: &AgentContext,
    ) -> Result<Vec<ErasedResponse>, CoreError> {
        let mut results = Vec::with_capacity(steps.len());
        for step in steps {
            let response = self
                .execute_agent(&step.agent_id, &step.input, context, &step.options)
                .await?;
            let failed = !response.success;
            results.push(response);
            if failed {
                debug!(agent = %step.agent_id, "sequence halted on failing step");
                break;
            }
        }
        Ok(results)
    }

    /// Runs all steps concurrently. Results come back in the caller's
    /// requested order, not completion order, and a failure in one branch
    /// never cancels siblings — every branch runs to completion before any
    /// error is surfaced.
    pub async fn execute_parallel(
        &self,
        steps: &[ExecutionRequest],
        context: &AgentContext,
    ) -> Result<Vec<ErasedResponse>, CoreError> {
        let futures = steps.iter().map(|step| {
            self.execute_agent(&step.agent_id, &step.input, context, &step.options)
        });
        let outcomes = join_all(futures).await;

        let mut results = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            results.push(outcome?);
        }
        Ok(results)
    }

    /// Derives aggregate stats from the full history. Pure read-side
    /// computation, O(history length) per call, never cached.
    pub fn execution_stats(&self) -> ExecutionStats {
        let history = self.history.lock().expect("history poisoned");
        let total = history.len();
        if total == 0 {
            return ExecutionStats {
                total_executions: 0,
                success_rate: 0,
                average_duration_ms: 0,
                agent_usage: HashMap::new(),
            };
        }

        let successes = history.iter().filter(|r| r.success).count();
        let total_duration: u64 = history.iter().map(|r| r.duration_ms).sum();
        let mut agent_usage: HashMap<String, usize> = HashMap::new();
        for record in history.iter() {
            *agent_usage.entry(record.agent_id.clone()).or_default() += 1;
        }

        ExecutionStats {
            total_executions: total,
            success_rate: ((successes as f64 / total as f64) * 100.0).round() as u32,
            average_duration_ms: ((total_duration as f64 / total as f64).round()) as u64,
            agent_usage,
        }
    }

    /// Resets the history. No effect on registered agents.
    pub fn clear_history(&self) {
        self.history.lock().expect("history poisoned").clear();
    }

    pub fn history_len(&self) -> usize {
        self.history.lock().expect("history poisoned").len()
    }

    fn append_history(&self, record: ExecutionRecord) {
        let mut history = self.history.lock().expect("history poisoned");
        if history.len() >= self.history_capacity {
            history.pop_front();
        }
        history.push_back(record);
    }

    fn set_status(&self, agent_id: &str, status: AgentStatus) {
        self.last_status
            .lock()
            .expect("status map poisoned")
            .insert(agent_id.to_string(), status);
    }
}

//! Core Swarm Orchestrator implementation

use crate::config::OrchestratorConfig;
use crate::convergence::ConvergenceCheck;
use crate::error::OrchestratorError;
use crate::events::SwarmEvent;
use crate::metrics::UsageMetrics;
use crate::planner::{fallback_team, parse_plan, planning_prompt, select_team};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use swarmboard_blackboard::{Blackboard, BlackboardSnapshot};
use swarmboard_domain::traits::{LlmProvider, SettingsStore};
use swarmboard_domain::{SpecialistDefinition, SwarmConfig};
use swarmboard_specialist::{RunContext, SpecialistResult, SpecialistRunner};
use swarmboard_tools::ToolRegistry;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Meta-planning attempts before falling back to a single specialist
const PLANNING_ATTEMPTS: usize = 2;

/// Per-call options for [`SwarmOrchestrator::execute_with`]
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Team size for this run; wins over the persisted setting
    pub max_specialists: Option<i64>,

    /// Checked before every specialist turn
    pub cancel: Option<CancellationToken>,

    /// Receives progress events; a dropped receiver is ignored
    pub progress: Option<UnboundedSender<SwarmEvent>>,
}

impl ExecuteOptions {
    /// Options with nothing set
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the team size for this run
    pub fn with_max_specialists(mut self, max_specialists: i64) -> Self {
        self.max_specialists = Some(max_specialists);
        self
    }

    /// Allow the run to be cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Stream progress events
    pub fn with_progress(mut self, sender: UnboundedSender<SwarmEvent>) -> Self {
        self.progress = Some(sender);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    fn emit(&self, event: SwarmEvent) {
        if let Some(sender) = &self.progress {
            if sender.send(event).is_err() {
                debug!("Progress receiver dropped");
            }
        }
    }
}

/// Final output of a swarm run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmResult {
    /// Run identifier (UUIDv7)
    pub run_id: String,

    /// A final answer was produced and the run was not cancelled
    pub success: bool,

    /// The convergence criterion was met before the round cap
    pub converged: bool,

    /// The run was cancelled before finishing
    pub cancelled: bool,

    /// Answer synthesized from the blackboard
    pub final_answer: String,

    /// Every specialist turn, in execution order
    pub specialist_trace: Vec<SpecialistResult>,

    /// Team that ran, in execution order
    pub team: Vec<SpecialistDefinition>,

    /// The plan fell back to a single generic specialist
    pub used_fallback_plan: bool,

    /// Tokens used by planning and every specialist turn
    pub total_tokens: u64,

    /// Estimated cost in USD
    pub estimated_cost_usd: f64,

    /// Rounds executed
    pub converged_after_rounds: u32,

    /// Detailed usage counters
    pub usage: UsageMetrics,

    /// Final blackboard state, when enabled in the configuration
    pub blackboard_snapshot: Option<BlackboardSnapshot>,
}

/// Outcome of meta-planning
struct Plan {
    team: Vec<SpecialistDefinition>,
    fallback: bool,
}

/// Execution phases after planning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Executing(u32),
    ConvergenceCheck(u32),
    Finalizing,
}

/// Coordinates one swarm run from planning to the final answer
///
/// Specialists run strictly one after another. The blackboard is created
/// per run and owned by it.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use swarmboard_llm::MockProvider;
/// use swarmboard_orchestrator::{InMemorySettings, SwarmOrchestrator};
/// use swarmboard_tools::ToolRegistry;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let llm = MockProvider::new(r#"{"answer": "42", "confidence": 0.9, "final": true}"#);
/// llm.add_response("planner", r#"[{"id": "solver", "role": "Solver", "priority": 1}]"#);
///
/// let orchestrator = SwarmOrchestrator::with_defaults(
///     Arc::new(llm),
///     Arc::new(ToolRegistry::with_mock_tools()),
///     InMemorySettings::default(),
/// );
///
/// let result = orchestrator.execute("What is 6 * 7?", None).await.unwrap();
/// assert!(result.success);
/// assert_eq!(result.final_answer, "42");
/// # }
/// ```
pub struct SwarmOrchestrator<L, S>
where
    L: LlmProvider,
    S: SettingsStore,
{
    llm: Arc<L>,
    tools: Arc<ToolRegistry>,
    settings: S,
    config: OrchestratorConfig,
    runner: SpecialistRunner<L>,
}

impl<L, S> SwarmOrchestrator<L, S>
where
    L: LlmProvider,
    S: SettingsStore,
{
    /// Create a new orchestrator
    pub fn new(
        llm: Arc<L>,
        tools: Arc<ToolRegistry>,
        settings: S,
        config: OrchestratorConfig,
    ) -> Self {
        let runner = SpecialistRunner::new(
            Arc::clone(&llm),
            Arc::clone(&tools),
            config.specialist.clone(),
        );
        Self {
            llm,
            tools,
            settings,
            config,
            runner,
        }
    }

    /// Create an orchestrator with the default configuration
    pub fn with_defaults(llm: Arc<L>, tools: Arc<ToolRegistry>, settings: S) -> Self {
        Self::new(llm, tools, settings, OrchestratorConfig::default())
    }

    /// Orchestrator configuration
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Persisted settings
    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// Persisted settings, mutable
    pub fn settings_mut(&mut self) -> &mut S {
        &mut self.settings
    }

    /// Team size for a run: the override if given, else the persisted value
    pub fn effective_max(&self, max_override: Option<i64>) -> u8 {
        SwarmConfig::new(self.settings.max_specialists() as i64).effective_max(max_override)
    }

    /// Run the swarm on `task`
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::PlanningUnavailable`] when the language model
    /// cannot be reached during planning.
    pub async fn execute(
        &self,
        task: &str,
        max_override: Option<i64>,
    ) -> Result<SwarmResult, OrchestratorError> {
        let options = ExecuteOptions {
            max_specialists: max_override,
            ..ExecuteOptions::default()
        };
        self.execute_with(task, options).await
    }

    /// Run the swarm with cancellation and progress reporting
    ///
    /// # Errors
    ///
    /// [`OrchestratorError::PlanningUnavailable`] when the language model
    /// cannot be reached during planning, [`OrchestratorError::Config`] for
    /// an invalid configuration.
    pub async fn execute_with(
        &self,
        task: &str,
        options: ExecuteOptions,
    ) -> Result<SwarmResult, OrchestratorError> {
        self.config.validate().map_err(OrchestratorError::Config)?;

        let run_id = Uuid::now_v7().to_string();
        let max_specialists = self.effective_max(options.max_specialists);
        info!(
            run_id = %run_id,
            max_specialists,
            model = self.llm.model_name(),
            "Starting swarm run"
        );

        let mut usage = UsageMetrics::new();
        let Plan { team, fallback } = self.plan(task, max_specialists, &mut usage).await?;
        info!(
            run_id = %run_id,
            team = team.len(),
            fallback,
            "Team planned: {}",
            team.iter().map(|s| s.id.as_str()).collect::<Vec<_>>().join(", ")
        );
        options.emit(SwarmEvent::PlanReady {
            run_id: run_id.clone(),
            team: team.clone(),
            max_specialists,
            fallback,
        });

        let mut board = Blackboard::new();
        let mut trace: Vec<SpecialistResult> = Vec::new();
        let mut last_seen = vec![0u64; team.len()];
        let mut rounds_run = 0;
        let mut converged = false;
        let mut cancelled = false;

        let mut phase = Phase::Executing(1);
        while phase != Phase::Finalizing {
            debug!(run_id = %run_id, ?phase, "Entering phase");
            phase = match phase {
                Phase::Executing(round) => {
                    rounds_run = round;
                    for (index, specialist) in team.iter().enumerate() {
                        if options.is_cancelled() {
                            info!(run_id = %run_id, round, "Run cancelled");
                            cancelled = true;
                            break;
                        }
                        options.emit(SwarmEvent::SpecialistStarted {
                            round,
                            specialist_id: specialist.id.clone(),
                            role: specialist.role.clone(),
                        });

                        let ctx = RunContext {
                            task,
                            last_seen_version: last_seen[index],
                            round,
                            finalizer: specialist.is_finalizer,
                        };
                        let result = self.runner.run(specialist, &mut board, ctx).await;
                        last_seen[index] = board.global_version();
                        usage.record_turn(&result);

                        options.emit(SwarmEvent::SpecialistFinished {
                            result: result.clone(),
                            total_tokens: usage.total_tokens(),
                            estimated_cost_usd: usage.cost(&self.config.pricing),
                        });
                        trace.push(result);
                    }
                    if cancelled {
                        Phase::Finalizing
                    } else {
                        Phase::ConvergenceCheck(round)
                    }
                }
                Phase::ConvergenceCheck(round) => {
                    let check = ConvergenceCheck::evaluate(
                        round,
                        &board.facts_in_round(round),
                        &trace,
                        self.config.low_confidence_threshold,
                    );
                    converged = check.converged();
                    info!(
                        run_id = %run_id,
                        round,
                        converged,
                        low_confidence = check.low_confidence_keys.len(),
                        final_output = check.final_output,
                        "Round completed"
                    );
                    options.emit(SwarmEvent::RoundCompleted {
                        round,
                        converged,
                        low_confidence_facts: check.low_confidence_keys.len(),
                    });

                    if converged {
                        Phase::Finalizing
                    } else if round < self.config.max_rounds {
                        Phase::Executing(round + 1)
                    } else {
                        warn!(run_id = %run_id, round, "Round cap reached without convergence");
                        Phase::Finalizing
                    }
                }
                Phase::Finalizing => Phase::Finalizing,
            };
        }

        let snapshot = board.snapshot();
        let final_answer = self.final_answer(&team, &trace, &snapshot);
        let success = !cancelled && !final_answer.trim().is_empty();
        let estimated_cost_usd = usage.cost(&self.config.pricing);

        info!(
            run_id = %run_id,
            success,
            converged,
            rounds = rounds_run,
            tokens = usage.total_tokens(),
            conflicts = snapshot.conflicts,
            "Swarm run finished"
        );

        Ok(SwarmResult {
            run_id,
            success,
            converged,
            cancelled,
            final_answer,
            specialist_trace: trace,
            team,
            used_fallback_plan: fallback,
            total_tokens: usage.total_tokens(),
            estimated_cost_usd,
            converged_after_rounds: rounds_run,
            usage,
            blackboard_snapshot: self.config.include_snapshot.then_some(snapshot),
        })
    }

    /// Meta-plan the team, retrying once with a stricter prompt
    async fn plan(
        &self,
        task: &str,
        max_specialists: u8,
        usage: &mut UsageMetrics,
    ) -> Result<Plan, OrchestratorError> {
        let mut unreachable = Vec::new();

        for attempt in 1..=PLANNING_ATTEMPTS {
            let prompt = planning_prompt(task, &self.tools, max_specialists, attempt > 1);
            debug!(attempt, "Planning prompt length: {} chars", prompt.len());

            match timeout(
                self.config.planning_timeout(),
                self.llm.generate_with_usage(&prompt),
            )
            .await
            {
                Ok(Ok(completion)) => {
                    usage.record_planning(completion.usage);
                    match parse_plan(&completion.text, &self.tools) {
                        Ok(team) => {
                            return Ok(Plan {
                                team: select_team(team, max_specialists),
                                fallback: false,
                            })
                        }
                        Err(reason) => warn!(attempt, "Unusable plan: {}", reason),
                    }
                }
                Ok(Err(e)) => {
                    warn!(attempt, "Planning call failed: {}", e);
                    unreachable.push(e.to_string());
                }
                Err(_) => {
                    warn!(attempt, "Planning call timed out");
                    unreachable.push(format!(
                        "planning call exceeded {}s",
                        self.config.planning_timeout_secs
                    ));
                }
            }
        }

        if unreachable.len() == PLANNING_ATTEMPTS {
            return Err(OrchestratorError::PlanningUnavailable(unreachable.join("; ")));
        }

        info!("Falling back to a single generic specialist");
        Ok(Plan {
            team: fallback_team(&self.tools),
            fallback: true,
        })
    }

    /// Finalizer's latest contribution, else one tagged final, else the
    /// highest-confidence facts as a bullet list
    fn final_answer(
        &self,
        team: &[SpecialistDefinition],
        trace: &[SpecialistResult],
        snapshot: &BlackboardSnapshot,
    ) -> String {
        let finalizer = team.iter().find(|s| s.is_finalizer).map(|s| s.id.as_str());

        let from_finalizer = trace
            .iter()
            .rev()
            .filter(|r| Some(r.specialist_id.as_str()) == finalizer)
            .find_map(|r| contribution(r, snapshot));
        let answer = from_finalizer.or_else(|| {
            trace
                .iter()
                .rev()
                .filter(|r| r.is_final)
                .find_map(|r| contribution(r, snapshot))
        });
        if let Some(answer) = answer {
            return answer;
        }

        debug!("No final contribution, summarizing top facts");
        snapshot
            .ranked()
            .into_iter()
            .take(self.config.summary_facts)
            .map(|f| format!("- {}: {} ({:.2})", f.key, f.value_text(), f.confidence))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Latest direct contribution of a turn that is still current on the board
fn contribution(result: &SpecialistResult, snapshot: &BlackboardSnapshot) -> Option<String> {
    let tool_keys: Vec<String> = result
        .tool_invocations
        .iter()
        .map(|t| format!("{}.{}", result.specialist_id, t.tool))
        .collect();

    result
        .facts_written
        .iter()
        .rev()
        .filter(|key| !tool_keys.contains(key))
        .filter_map(|key| snapshot.get(key))
        .find(|fact| fact.written_by == result.specialist_id)
        .map(|fact| fact.value_text())
}

//! Core Specialist Runner implementation

use crate::config::SpecialistConfig;
use crate::error::SpecialistFailure;
use crate::parser::parse_response;
use crate::prompt::PromptBuilder;
use crate::types::{ParsedResponse, RunContext, SpecialistResult, ToolCall, ToolInvocation};
use std::sync::Arc;
use std::time::Instant;
use swarmboard_blackboard::Blackboard;
use swarmboard_domain::traits::LlmProvider;
use swarmboard_domain::{SpecialistDefinition, TokenUsage, ToolError};
use swarmboard_tools::ToolRegistry;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Executes one specialist turn against a blackboard
///
/// The runner never returns an error: model, parse and tool failures are
/// recorded in the [`SpecialistResult`] so the swarm can carry on.
pub struct SpecialistRunner<L>
where
    L: LlmProvider,
{
    llm: Arc<L>,
    tools: Arc<ToolRegistry>,
    config: SpecialistConfig,
}

impl<L> Clone for SpecialistRunner<L>
where
    L: LlmProvider,
{
    fn clone(&self) -> Self {
        Self {
            llm: Arc::clone(&self.llm),
            tools: Arc::clone(&self.tools),
            config: self.config.clone(),
        }
    }
}

/// Partial result assembled while a turn runs
#[derive(Default)]
struct Turn {
    facts_written: Vec<String>,
    tool_invocations: Vec<ToolInvocation>,
    error: Option<SpecialistFailure>,
}

impl<L> SpecialistRunner<L>
where
    L: LlmProvider,
{
    /// Create a new runner
    pub fn new(llm: Arc<L>, tools: Arc<ToolRegistry>, config: SpecialistConfig) -> Self {
        Self { llm, tools, config }
    }

    /// Create a runner with the default configuration
    pub fn with_defaults(llm: Arc<L>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(llm, tools, SpecialistConfig::default())
    }

    /// Runner configuration
    pub fn config(&self) -> &SpecialistConfig {
        &self.config
    }

    /// Tool registry used for tool calls
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run one turn of `specialist`
    pub async fn run(
        &self,
        specialist: &SpecialistDefinition,
        blackboard: &mut Blackboard,
        ctx: RunContext<'_>,
    ) -> SpecialistResult {
        let start = Instant::now();
        info!(
            specialist = %specialist.id,
            round = ctx.round,
            since = ctx.last_seen_version,
            "Running specialist"
        );

        let prompt = self.build_prompt(specialist, blackboard, ctx);
        debug!(specialist = %specialist.id, "Prompt length: {} chars", prompt.len());

        let completion = match timeout(
            self.config.call_timeout(),
            self.llm.generate_with_usage(&prompt),
        )
        .await
        {
            Ok(Ok(completion)) => completion,
            Ok(Err(e)) => {
                let failure = SpecialistFailure::ModelInvocation(e.to_string());
                return self.failed(specialist, ctx, failure, TokenUsage::default(), start);
            }
            Err(_) => {
                let failure = SpecialistFailure::Timeout(format!(
                    "model call exceeded {}s",
                    self.config.call_timeout_secs
                ));
                let usage = TokenUsage::estimate(&prompt, "");
                return self.failed(specialist, ctx, failure, usage, start);
            }
        };

        debug!(
            specialist = %specialist.id,
            "Response length: {} chars",
            completion.text.len()
        );

        let mut turn = Turn::default();
        let mut tagged_final = false;
        match parse_response(&completion.text) {
            Ok(parsed) => {
                tagged_final = parsed.is_final;
                self.apply(specialist, blackboard, ctx, parsed, &mut turn).await;
            }
            Err(failure) => turn.error = Some(failure),
        }

        let success = turn.error.is_none();
        let wrote = !turn.facts_written.is_empty();
        let is_final = wrote && (tagged_final || (ctx.finalizer && success));
        if let Some(failure) = &turn.error {
            warn!(specialist = %specialist.id, "Recovered specialist failure: {}", failure);
        }

        info!(
            specialist = %specialist.id,
            success,
            facts = turn.facts_written.len(),
            tokens = completion.usage.total(),
            "Specialist finished"
        );

        SpecialistResult {
            specialist_id: specialist.id.clone(),
            round: ctx.round,
            success,
            facts_written: turn.facts_written,
            raw_output: self.truncate(&completion.text),
            error: turn.error,
            tokens_used: completion.usage,
            duration_ms: elapsed_ms(start),
            is_final,
            tool_invocations: turn.tool_invocations,
        }
    }

    fn build_prompt(
        &self,
        specialist: &SpecialistDefinition,
        blackboard: &Blackboard,
        ctx: RunContext<'_>,
    ) -> String {
        let delta = blackboard.to_serializable(ctx.last_seen_version);
        let mut builder = PromptBuilder::new(specialist, ctx.task)
            .with_delta(delta)
            .as_finalizer(ctx.finalizer);
        if !specialist.tool_names.is_empty() {
            builder = builder.with_tools(
                self.tools
                    .describe(specialist.tool_names.iter().map(String::as_str)),
            );
        }
        builder.build()
    }

    /// Apply a parsed response: run the tool call, then write the answer
    async fn apply(
        &self,
        specialist: &SpecialistDefinition,
        blackboard: &mut Blackboard,
        ctx: RunContext<'_>,
        parsed: ParsedResponse,
        turn: &mut Turn,
    ) {
        let ParsedResponse {
            tool_call,
            answer,
            key,
            confidence,
            ..
        } = parsed;

        if let Some(call) = tool_call {
            let tool = call.tool.clone();
            let started = Instant::now();
            let outcome = self.call_tool(specialist, call).await;
            let duration_ms = elapsed_ms(started);

            match outcome {
                Ok(output) => {
                    let key = format!("{}.{}", specialist.id, tool);
                    let confidence = confidence.unwrap_or(self.config.tool_result_confidence);
                    blackboard.write(key.clone(), output, confidence, &specialist.id, ctx.round);
                    turn.facts_written.push(key);
                    turn.tool_invocations.push(ToolInvocation {
                        tool,
                        success: true,
                        error: None,
                        duration_ms,
                    });
                }
                Err(e) => {
                    warn!(specialist = %specialist.id, tool = %tool, "Tool call failed: {}", e);
                    turn.tool_invocations.push(ToolInvocation {
                        tool,
                        success: false,
                        error: Some(e.clone()),
                        duration_ms,
                    });
                    turn.error = Some(SpecialistFailure::Tool(e));
                }
            }
        }

        if let Some(answer) = answer {
            let key = answer_key(&specialist.id, key.as_deref());
            let confidence = confidence.unwrap_or(self.config.default_confidence);
            blackboard.write(key.clone(), answer, confidence, &specialist.id, ctx.round);
            turn.facts_written.push(key);
        }
    }

    async fn call_tool(
        &self,
        specialist: &SpecialistDefinition,
        call: ToolCall,
    ) -> Result<serde_json::Value, ToolError> {
        if !specialist.can_use(&call.tool) {
            return Err(ToolError::InvalidInput(format!(
                "tool `{}` is not available to specialist `{}`",
                call.tool, specialist.id
            )));
        }

        debug!(specialist = %specialist.id, tool = %call.tool, "Calling tool");
        timeout(
            self.config.tool_timeout(),
            self.tools.invoke(&call.tool, call.input),
        )
        .await
        .map_err(|_| {
            ToolError::Timeout(format!(
                "tool `{}` exceeded {}s",
                call.tool, self.config.tool_timeout_secs
            ))
        })?
    }

    fn failed(
        &self,
        specialist: &SpecialistDefinition,
        ctx: RunContext<'_>,
        failure: SpecialistFailure,
        usage: TokenUsage,
        start: Instant,
    ) -> SpecialistResult {
        warn!(specialist = %specialist.id, "Recovered specialist failure: {}", failure);
        SpecialistResult {
            specialist_id: specialist.id.clone(),
            round: ctx.round,
            success: false,
            facts_written: Vec::new(),
            raw_output: String::new(),
            error: Some(failure),
            tokens_used: usage,
            duration_ms: elapsed_ms(start),
            is_final: false,
            tool_invocations: Vec::new(),
        }
    }

    fn truncate(&self, text: &str) -> String {
        match text.char_indices().nth(self.config.max_raw_output_chars) {
            Some((cut, _)) => text[..cut].to_string(),
            None => text.to_string(),
        }
    }
}

/// Blackboard key for a direct contribution
///
/// Keys are always namespaced by the specialist id.
fn answer_key(specialist_id: &str, key: Option<&str>) -> String {
    match key {
        None => format!("{}.answer", specialist_id),
        Some(key) => {
            let prefix = format!("{}.", specialist_id);
            if key.starts_with(&prefix) && key.len() > prefix.len() {
                key.to_string()
            } else {
                format!("{}{}", prefix, key)
            }
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

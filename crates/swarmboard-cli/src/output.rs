//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::*;
use swarmboard_orchestrator::{SwarmEvent, SwarmResult};
use swarmboard_specialist::SpecialistResult;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest value shown in a table cell.
const CELL_WIDTH: usize = 60;

/// Output formatter.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> CliFormat {
        self.format
    }

    /// One progress line for a swarm event, in text mode only.
    pub fn format_event(&self, event: &SwarmEvent) -> Option<String> {
        if self.format == CliFormat::Json {
            return None;
        }

        let line = match event {
            SwarmEvent::PlanReady {
                team,
                max_specialists,
                fallback,
                ..
            } => {
                let names: Vec<&str> = team.iter().map(|s| s.id.as_str()).collect();
                let msg = format!(
                    "Team of {} (max {}): {}",
                    team.len(),
                    max_specialists,
                    names.join(", ")
                );
                if *fallback {
                    self.warning(&format!("{} [fallback plan]", msg))
                } else {
                    self.info(&msg)
                }
            }
            SwarmEvent::SpecialistStarted {
                round,
                specialist_id,
                role,
            } => self.colorize(
                &format!("  [round {}] {} ({}) ...", round, specialist_id, role),
                "cyan",
            ),
            SwarmEvent::SpecialistFinished {
                result,
                total_tokens,
                estimated_cost_usd,
            } => {
                let msg = format!(
                    "  {} wrote {} fact(s) in {} ms [{} tokens, ${:.6} so far]",
                    result.specialist_id,
                    result.facts_written.len(),
                    result.duration_ms,
                    total_tokens,
                    estimated_cost_usd
                );
                match &result.error {
                    None => self.success(&msg),
                    Some(err) => self.error(&format!("{}: {}", msg, err)),
                }
            }
            SwarmEvent::RoundCompleted {
                round,
                converged,
                low_confidence_facts,
            } => {
                if *converged {
                    self.info(&format!("Round {} converged", round))
                } else {
                    self.warning(&format!(
                        "Round {} left {} low-confidence fact(s)",
                        round, low_confidence_facts
                    ))
                }
            }
        };
        Some(line)
    }

    /// Format the final result of a run.
    pub fn format_result(&self, result: &SwarmResult) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            CliFormat::Text => Ok(self.format_result_text(result)),
        }
    }

    fn format_result_text(&self, result: &SwarmResult) -> String {
        let mut sections = Vec::new();

        let status = if result.cancelled {
            self.warning("Run cancelled, partial result below")
        } else if result.success {
            self.success(&format!(
                "Finished after {} round(s){}",
                result.converged_after_rounds,
                if result.converged { ", converged" } else { "" }
            ))
        } else {
            self.error("No final answer was produced")
        };
        sections.push(status);

        sections.push(self.format_trace(&result.specialist_trace));

        if let Some(snapshot) = &result.blackboard_snapshot {
            let mut builder = Builder::default();
            builder.push_record(["Key", "Value", "Confidence", "By", "Round"]);
            for fact in snapshot.ranked() {
                builder.push_record([
                    fact.key.clone(),
                    truncate(&fact.value_text(), CELL_WIDTH),
                    format!("{:.2}", fact.confidence),
                    fact.written_by.clone(),
                    fact.round.to_string(),
                ]);
            }
            sections.push(format!(
                "Blackboard (version {}, {} conflict(s)):\n{}",
                snapshot.global_version,
                snapshot.conflicts,
                styled(builder)
            ));
        }

        sections.push(format!(
            "{}\n{}",
            self.colorize("Final answer:", "magenta"),
            if result.final_answer.is_empty() {
                "(none)"
            } else {
                result.final_answer.as_str()
            }
        ));

        sections.push(format!(
            "Tokens: {} | Estimated cost: ${:.6} | Run: {}",
            result.total_tokens, result.estimated_cost_usd, result.run_id
        ));

        sections.join("\n\n")
    }

    /// Format specialist turns as a table.
    pub fn format_trace(&self, trace: &[SpecialistResult]) -> String {
        if trace.is_empty() {
            return self.colorize("No specialist turns ran.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Round", "Specialist", "Status", "Facts", "Tokens", "ms"]);
        for turn in trace {
            let status = match &turn.error {
                None if turn.is_final => "final".to_string(),
                None => "ok".to_string(),
                Some(err) => err.kind().to_string(),
            };
            builder.push_record([
                turn.round.to_string(),
                turn.specialist_id.clone(),
                status,
                turn.facts_written.join(", "),
                turn.total_tokens().to_string(),
                turn.duration_ms.to_string(),
            ]);
        }
        styled(builder)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

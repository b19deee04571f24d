//! Meta-planning: prompt, plan parsing and team selection

use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};
use swarmboard_domain::SpecialistDefinition;
use swarmboard_tools::ToolRegistry;
use tracing::debug;

/// Id of the single specialist used when planning yields nothing usable
pub const FALLBACK_SPECIALIST_ID: &str = "generalist";

/// Build the meta-planning prompt
///
/// `strict` adds a reminder after an unusable first reply.
pub(crate) fn planning_prompt(
    task: &str,
    tools: &ToolRegistry,
    max_specialists: u8,
    strict: bool,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(PLANNING_INSTRUCTIONS);
    prompt.push_str("\n\n");
    prompt.push_str(&format!(
        "Plan a team of at most {} specialists.\n\n",
        max_specialists
    ));

    prompt.push_str("Task:\n---\n");
    prompt.push_str(task);
    prompt.push_str("\n---\n\n");

    prompt.push_str("Available tools (TOON):\n");
    prompt.push_str(&tools.catalog());
    prompt.push_str("\n\n");

    let capabilities = tools.capabilities();
    if !capabilities.is_empty() {
        prompt.push_str(&format!(
            "Capabilities you may request instead of tool names: {}\n",
            capabilities.join(", ")
        ));
        prompt.push_str(&format!("Tool domains: {}\n\n", tools.domains().join(", ")));
    }

    prompt.push_str(PLAN_FORMAT);
    if strict {
        prompt.push_str("\n\n");
        prompt.push_str(STRICT_REMINDER);
    }
    prompt
}

const PLANNING_INSTRUCTIONS: &str = "You are the planner of a team of specialist agents that \
share a blackboard. Split the task into focused specialist roles. Lower priority numbers run \
first. The last specialist should synthesize the final answer.";

const PLAN_FORMAT: &str = r#"Output format (JSON array only):
[
  {
    "id": "short_snake_case_id",
    "role": "Human readable role",
    "instructions": "What this specialist must do",
    "priority": 1,
    "tools": ["tool_name"],
    "capabilities": ["capability"],
    "domain": "optional tool domain",
    "finalizer": false
  }
]"#;

const STRICT_REMINDER: &str = "Your previous reply could not be used. Return ONLY a valid JSON \
array of specialist objects. No markdown, no explanations.";

/// Parse and validate a plan
///
/// Unknown tools are dropped, empty or duplicate ids regenerated and missing
/// priorities defaulted to generation order. Entries without a role or id
/// are skipped.
///
/// # Errors
///
/// A description of the problem when no specialist could be read.
pub(crate) fn parse_plan(
    response: &str,
    tools: &ToolRegistry,
) -> Result<Vec<SpecialistDefinition>, String> {
    let value = extract_plan(response).ok_or_else(|| "no JSON plan in response".to_string())?;
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("specialists") {
            Some(Value::Array(entries)) => entries,
            _ => return Err("plan object has no `specialists` array".to_string()),
        },
        _ => return Err("plan is not a JSON array".to_string()),
    };

    let mut seen_ids = HashSet::new();
    let team: Vec<SpecialistDefinition> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Value::Object(map) => read_definition(map, index, tools, &mut seen_ids),
            _ => None,
        })
        .collect();

    if team.is_empty() {
        return Err("plan contains no usable specialists".to_string());
    }
    Ok(team)
}

fn read_definition(
    map: &Map<String, Value>,
    index: usize,
    tools: &ToolRegistry,
    seen_ids: &mut HashSet<String>,
) -> Option<SpecialistDefinition> {
    let text = |field: &str| {
        map.get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    let raw_id = text("id").map(slugify).filter(|id| !id.is_empty());
    let role = text("role").map(str::to_string).or_else(|| raw_id.clone())?;
    let instructions = text("instructions").unwrap_or_default();

    let base_id = raw_id.unwrap_or_else(|| slugify(&role));
    let base_id = if base_id.is_empty() {
        format!("specialist_{}", index + 1)
    } else {
        base_id
    };
    let id = unique_id(base_id, seen_ids);

    let priority = map
        .get("priority")
        .and_then(Value::as_i64)
        .and_then(|p| i32::try_from(p).ok())
        .unwrap_or(index as i32 + 1);

    let strings = |field: &str| {
        map.get(field)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default()
    };

    let mut requested = strings("tools");
    if requested.is_empty() {
        requested = strings("tool_names");
    }
    let mut granted: BTreeSet<String> = requested
        .into_iter()
        .filter(|name| {
            let known = tools.contains(name);
            if !known {
                debug!(specialist = %id, tool = *name, "Dropping unknown tool from plan");
            }
            known
        })
        .map(str::to_string)
        .collect();

    let capabilities = strings("capabilities");
    if !capabilities.is_empty() {
        let resolved = tools.tools_for_capabilities(&capabilities);
        debug!(specialist = %id, ?capabilities, ?resolved, "Resolved planned capabilities");
        granted.extend(resolved);
    }
    if let Some(domain) = text("domain") {
        granted.extend(tools.tools_for_domain(domain));
    }

    let finalizer = map
        .get("finalizer")
        .or_else(|| map.get("is_finalizer"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut definition =
        SpecialistDefinition::new(id, role, instructions, priority).with_tools(granted);
    definition.is_finalizer = finalizer;
    Some(definition)
}

fn unique_id(base: String, seen: &mut HashSet<String>) -> String {
    let mut id = base.clone();
    let mut suffix = 2;
    while !seen.insert(id.clone()) {
        id = format!("{}_{}", base, suffix);
        suffix += 1;
    }
    id
}

/// Lowercase snake_case identifier; blackboard keys use `.` as separator
fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    slug.trim_end_matches('_').to_string()
}

/// Locate the plan in a model response
///
/// A fenced block is tried first, then every `[` or `{` in order. The first
/// complete JSON value that looks like a plan wins, so brackets in the
/// surrounding prose are skipped.
fn extract_plan(response: &str) -> Option<Value> {
    fenced_body(response)
        .and_then(first_plan)
        .or_else(|| first_plan(response))
}

fn fenced_body(response: &str) -> Option<&str> {
    let fence_start = response.find("```")?;
    let after_fence = &response[fence_start + 3..];
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    Some(body.find("```").map(|end| &body[..end]).unwrap_or(body).trim())
}

fn first_plan(text: &str) -> Option<Value> {
    text.match_indices(['[', '{']).find_map(|(start, _)| {
        let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match values.next() {
            Some(Ok(value)) if looks_like_plan(&value) => Some(value),
            _ => None,
        }
    })
}

fn looks_like_plan(value: &Value) -> bool {
    match value {
        Value::Array(entries) => entries.iter().any(Value::is_object),
        Value::Object(map) => map.get("specialists").is_some_and(Value::is_array),
        _ => false,
    }
}

/// Order, cap and finalize a planned team
///
/// Sorting is stable, so equal priorities keep generation order. The cap
/// keeps the lowest priority numbers. Exactly one member ends up as the
/// finalizer: an explicitly tagged one, else a synthesis role, else the
/// last to run.
pub(crate) fn select_team(
    mut team: Vec<SpecialistDefinition>,
    max_specialists: u8,
) -> Vec<SpecialistDefinition> {
    team.sort_by_key(|s| s.priority);
    if team.len() > max_specialists as usize {
        debug!(
            planned = team.len(),
            max = max_specialists,
            "Truncating planned team to the budget"
        );
        team.truncate(max_specialists as usize);
    }

    let finalizer = team
        .iter()
        .position(|s| s.is_finalizer)
        .or_else(|| team.iter().position(|s| s.looks_like_synthesizer()))
        .or_else(|| team.len().checked_sub(1));
    for (index, specialist) in team.iter_mut().enumerate() {
        specialist.is_finalizer = Some(index) == finalizer;
    }
    team
}

/// Single generic specialist covering the whole task
pub(crate) fn fallback_team(tools: &ToolRegistry) -> Vec<SpecialistDefinition> {
    vec![SpecialistDefinition::new(
        FALLBACK_SPECIALIST_ID,
        "Generalist Synthesizer",
        "Work through the whole task yourself, using tools where they help, and give one complete answer.",
        1,
    )
    .with_tools(tools.names())
    .as_finalizer()]
}

//! Prompt construction for one specialist turn

use swarmboard_domain::SpecialistDefinition;

/// Builds the prompt sent to the model for a specialist turn
pub struct PromptBuilder<'a> {
    specialist: &'a SpecialistDefinition,
    task: &'a str,
    delta: Option<String>,
    tools: Option<String>,
    finalizer: bool,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(specialist: &'a SpecialistDefinition, task: &'a str) -> Self {
        Self {
            specialist,
            task,
            delta: None,
            tools: None,
            finalizer: false,
        }
    }

    /// Add the TOON-encoded blackboard delta
    pub fn with_delta(mut self, delta: impl Into<String>) -> Self {
        self.delta = Some(delta.into());
        self
    }

    /// Add the TOON description of the specialist's tools
    pub fn with_tools(mut self, tools: impl Into<String>) -> Self {
        self.tools = Some(tools.into());
        self
    }

    /// Ask for a final synthesis in this turn
    pub fn as_finalizer(mut self, finalizer: bool) -> Self {
        self.finalizer = finalizer;
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(&format!(
            "You are specialist `{}`, a {}.\n",
            self.specialist.id, self.specialist.role
        ));
        if !self.specialist.instructions.trim().is_empty() {
            prompt.push_str(&format!("Instructions: {}\n", self.specialist.instructions.trim()));
        }
        prompt.push('\n');

        prompt.push_str("Task:\n---\n");
        prompt.push_str(self.task);
        prompt.push_str("\n---\n\n");

        prompt.push_str("New blackboard facts since your last turn (TOON):\n");
        match self.delta.as_deref() {
            Some(delta) if !delta.trim().is_empty() => prompt.push_str(delta),
            _ => prompt.push_str("facts[0]:"),
        }
        prompt.push_str("\n\n");

        match self.tools.as_deref() {
            Some(tools) if !self.specialist.tool_names.is_empty() => {
                prompt.push_str("Tools you may call (TOON):\n");
                prompt.push_str(tools);
                prompt.push_str("\n\n");
            }
            _ => prompt.push_str("You have no tools. Answer directly.\n\n"),
        }

        if self.finalizer {
            prompt.push_str(FINALIZER_INSTRUCTIONS);
            prompt.push_str("\n\n");
        }

        prompt.push_str(RESPONSE_FORMAT);
        prompt
    }
}

const FINALIZER_INSTRUCTIONS: &str = "You are the team's finalizer. Combine the facts above into \
one complete answer to the task and set \"final\": true.";

const RESPONSE_FORMAT: &str = r#"Respond with one JSON object:
{
  "tool_call": {"tool": "tool_name", "input": {}},
  "answer": "your contribution (text or JSON value)",
  "key": "optional short key for your answer",
  "confidence": 0.0-1.0,
  "final": false
}

Omit "tool_call" when you answer directly. Return ONLY the JSON object."#;

#[cfg(test)]
mod tests {
    use super::*;

    fn analyst() -> SpecialistDefinition {
        SpecialistDefinition::new(
            "sentiment_analyst",
            "Sentiment Analyst",
            "Classify each review",
            1,
        )
    }

    #[test]
    fn test_prompt_includes_identity_and_task() {
        let specialist = analyst();
        let prompt = PromptBuilder::new(&specialist, "Analyze 5 reviews").build();

        assert!(prompt.contains("You are specialist `sentiment_analyst`"));
        assert!(prompt.contains("Sentiment Analyst"));
        assert!(prompt.contains("Classify each review"));
        assert!(prompt.contains("Analyze 5 reviews"));
        assert!(prompt.contains("\"tool_call\""));
    }

    #[test]
    fn test_empty_delta_is_rendered_as_empty_table() {
        let specialist = analyst();
        let prompt = PromptBuilder::new(&specialist, "t").with_delta("").build();
        assert!(prompt.contains("facts[0]:"));
    }

    #[test]
    fn test_prompt_includes_delta() {
        let specialist = analyst();
        let delta = "facts[1]{by,confidence,key,v,value}:\n  stats,0.9,stats.mean,1,3.4";
        let prompt = PromptBuilder::new(&specialist, "t").with_delta(delta).build();
        assert!(prompt.contains("stats.mean"));
    }

    #[test]
    fn test_tools_only_listed_when_granted() {
        let specialist = analyst();
        let prompt = PromptBuilder::new(&specialist, "t")
            .with_tools("tools[1]{description,input,name}:")
            .build();
        assert!(prompt.contains("You have no tools"));

        let specialist = analyst().with_tools(["sentiment"]);
        let prompt = PromptBuilder::new(&specialist, "t")
            .with_tools("tools[1]: sentiment")
            .build();
        assert!(prompt.contains("Tools you may call"));
        assert!(!prompt.contains("You have no tools"));
    }

    #[test]
    fn test_finalizer_instructions() {
        let specialist = analyst();
        let prompt = PromptBuilder::new(&specialist, "t").build();
        assert!(!prompt.contains("finalizer"));

        let prompt = PromptBuilder::new(&specialist, "t").as_finalizer(true).build();
        assert!(prompt.contains("You are the team's finalizer"));
    }
}

//! Integration tests for the Specialist Runner

#[cfg(test)]
mod tests {
    use crate::{RunContext, SpecialistConfig, SpecialistFailure, SpecialistRunner};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use swarmboard_blackboard::Blackboard;
    use swarmboard_domain::{SpecialistDefinition, ToolError};
    use swarmboard_llm::MockProvider;
    use swarmboard_tools::ToolRegistry;

    fn runner(llm: MockProvider) -> (SpecialistRunner<MockProvider>, Arc<MockProvider>) {
        runner_with_config(llm, SpecialistConfig::default())
    }

    fn runner_with_config(
        llm: MockProvider,
        config: SpecialistConfig,
    ) -> (SpecialistRunner<MockProvider>, Arc<MockProvider>) {
        let llm = Arc::new(llm);
        let tools = Arc::new(ToolRegistry::with_mock_tools());
        (SpecialistRunner::new(Arc::clone(&llm), tools, config), llm)
    }

    fn ctx(task: &str) -> RunContext<'_> {
        RunContext {
            task,
            last_seen_version: 0,
            round: 1,
            finalizer: false,
        }
    }

    fn statistician() -> SpecialistDefinition {
        SpecialistDefinition::new("stats_analyst", "Statistician", "Summarize the ratings", 1)
            .with_tools(["stats"])
    }

    #[tokio::test]
    async fn test_direct_answer_is_written() {
        let (runner, _) = runner(MockProvider::new(
            r#"{"answer": "Reviews are mostly positive", "confidence": 0.8}"#,
        ));
        let specialist = SpecialistDefinition::new("analyst", "Sentiment Analyst", "", 1);
        let mut board = Blackboard::new();

        let result = runner.run(&specialist, &mut board, ctx("Analyze")).await;

        assert!(result.success);
        assert_eq!(result.facts_written, vec!["analyst.answer"]);
        assert!(result.error.is_none());
        assert!(result.total_tokens() > 0);
        let fact = board.read("analyst.answer").unwrap();
        assert_eq!(fact.value, json!("Reviews are mostly positive"));
        assert_eq!(fact.confidence, 0.8);
        assert_eq!(fact.written_by, "analyst");
        assert_eq!(fact.round, 1);
    }

    #[tokio::test]
    async fn test_plain_text_uses_default_or_mentioned_confidence() {
        let (runner, llm) = runner(MockProvider::new("Ratings look fine."));
        let specialist = SpecialistDefinition::new("critic", "Critic", "", 1);
        let mut board = Blackboard::new();

        runner.run(&specialist, &mut board, ctx("t")).await;
        assert_eq!(board.read("critic.answer").unwrap().confidence, 0.7);

        llm.queue_response("Ratings look fine. Confidence: 0.35");
        runner.run(&specialist, &mut board, ctx("t")).await;
        assert_eq!(board.read("critic.answer").unwrap().confidence, 0.35);
    }

    #[tokio::test]
    async fn test_tool_call_writes_namespaced_result() {
        let (runner, _) = runner(MockProvider::new(
            r#"{"tool_call": {"tool": "stats", "input": {"values": [4, 5, 3, 5, 1]}}}"#,
        ));
        let mut board = Blackboard::new();

        let result = runner.run(&statistician(), &mut board, ctx("Rate")).await;

        assert!(result.success);
        assert_eq!(result.facts_written, vec!["stats_analyst.stats"]);
        assert_eq!(result.tool_invocations.len(), 1);
        assert!(result.tool_invocations[0].success);

        let fact = board.read("stats_analyst.stats").unwrap();
        assert_eq!(fact.value["mean"], json!(3.6));
        assert_eq!(fact.confidence, 0.9);
    }

    #[tokio::test]
    async fn test_tool_call_and_answer_in_one_response() {
        let (runner, _) = runner(MockProvider::new(
            r#"```json
{"tool_call": {"tool": "stats", "input": {"values": [1, 2, 3]}},
 "answer": "Average rating is 2", "key": "summary", "confidence": 0.75}
```"#,
        ));
        let mut board = Blackboard::new();

        let result = runner.run(&statistician(), &mut board, ctx("Rate")).await;

        assert!(result.success);
        assert_eq!(
            result.facts_written,
            vec!["stats_analyst.stats", "stats_analyst.summary"]
        );
        assert_eq!(board.read("stats_analyst.stats").unwrap().confidence, 0.75);
        assert_eq!(board.global_version(), 2);
    }

    #[tokio::test]
    async fn test_tool_not_granted_is_recovered_failure() {
        let (runner, _) = runner(MockProvider::new(
            r#"{"tool_call": {"tool": "calculator", "input": {"expression": "1+1"}}}"#,
        ));
        let mut board = Blackboard::new();

        let result = runner.run(&statistician(), &mut board, ctx("t")).await;

        assert!(!result.success);
        assert!(result.facts_written.is_empty());
        assert!(board.is_empty());
        assert!(matches!(
            result.error,
            Some(SpecialistFailure::Tool(ToolError::InvalidInput(_)))
        ));
        assert!(!result.tool_invocations[0].success);
    }

    #[tokio::test]
    async fn test_tool_failure_still_writes_answer() {
        let (runner, _) = runner(MockProvider::new(
            r#"{"tool_call": {"tool": "stats", "input": {"values": []}}, "answer": "No data"}"#,
        ));
        let mut board = Blackboard::new();

        let result = runner.run(&statistician(), &mut board, ctx("t")).await;

        assert!(!result.success);
        assert_eq!(result.error.as_ref().map(|e| e.kind()), Some("tool"));
        assert_eq!(result.facts_written, vec!["stats_analyst.answer"]);
        assert!(board.read("stats_analyst.stats").is_none());
        assert_eq!(board.read("stats_analyst.answer").unwrap().value, json!("No data"));
    }

    #[tokio::test]
    async fn test_model_error_is_recovered() {
        let llm = MockProvider::new("unused");
        llm.queue_error("backend exploded");
        let (runner, _) = runner(llm);
        let mut board = Blackboard::new();
        let specialist = SpecialistDefinition::new("a", "Analyst", "", 1);

        let result = runner.run(&specialist, &mut board, ctx("t")).await;

        assert!(!result.success);
        assert!(matches!(
            &result.error,
            Some(SpecialistFailure::ModelInvocation(message)) if message.contains("backend exploded")
        ));
        assert_eq!(result.total_tokens(), 0);
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn test_model_timeout_is_recovered() {
        let llm = MockProvider::new("unused");
        llm.add_delayed_response("Analyst", "{\"answer\": \"late\"}", Duration::from_millis(1_500));
        let config = SpecialistConfig {
            call_timeout_secs: 1,
            ..SpecialistConfig::default()
        };
        let (runner, _) = runner_with_config(llm, config);
        let mut board = Blackboard::new();
        let specialist = SpecialistDefinition::new("slow", "Analyst", "", 1);

        let result = runner.run(&specialist, &mut board, ctx("t")).await;

        assert!(!result.success);
        assert_eq!(result.error.as_ref().map(|e| e.kind()), Some("timeout"));
        assert!(result.tokens_used.prompt_tokens > 0);
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn test_empty_response_is_unparseable() {
        let (runner, _) = runner(MockProvider::new(""));
        let mut board = Blackboard::new();
        let specialist = SpecialistDefinition::new("a", "Analyst", "", 1);

        let result = runner.run(&specialist, &mut board, ctx("t")).await;

        assert!(!result.success);
        assert_eq!(
            result.error.as_ref().map(|e| e.kind()),
            Some("response_unparseable")
        );
    }

    #[tokio::test]
    async fn test_prompt_carries_only_the_delta() {
        let (runner, llm) = runner(MockProvider::new(r#"{"answer": "ok"}"#));
        let mut board = Blackboard::new();
        board.write("early.note", json!("seen before"), 0.9, "early", 1);
        board.write("fresh.note", json!("brand new"), 0.9, "fresh", 1);
        let specialist = SpecialistDefinition::new("reader", "Reader", "", 2);

        let ctx = RunContext {
            task: "Summarize",
            last_seen_version: 1,
            round: 1,
            finalizer: false,
        };
        runner.run(&specialist, &mut board, ctx).await;

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("brand new"));
        assert!(!prompt.contains("seen before"));
        assert!(prompt.contains("You have no tools"));
    }

    #[tokio::test]
    async fn test_prompt_describes_granted_tools_only() {
        let (runner, llm) = runner(MockProvider::new(r#"{"answer": "ok"}"#));
        let mut board = Blackboard::new();

        runner.run(&statistician(), &mut board, ctx("t")).await;

        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("stats"));
        assert!(!prompt.contains("calculator"));
    }

    #[tokio::test]
    async fn test_finalizer_output_is_final() {
        let (runner, _) = runner(MockProvider::new(r#"{"answer": "Overall positive"}"#));
        let mut board = Blackboard::new();
        let synth = SpecialistDefinition::new("synth", "Synthesizer", "", 9).as_finalizer();

        let result = runner.run(&synth, &mut board, ctx("t")).await;
        assert!(!result.is_final);

        let finalizer_ctx = RunContext {
            finalizer: true,
            ..ctx("t")
        };
        let result = runner.run(&synth, &mut board, finalizer_ctx).await;
        assert!(result.is_final);
    }

    #[tokio::test]
    async fn test_final_tag_marks_result() {
        let (runner, _) = runner(MockProvider::new(r#"{"answer": "Done", "final": true}"#));
        let mut board = Blackboard::new();
        let specialist = SpecialistDefinition::new("a", "Analyst", "", 1);

        let result = runner.run(&specialist, &mut board, ctx("t")).await;
        assert!(result.is_final);
    }

    #[tokio::test]
    async fn test_final_tag_ignored_when_nothing_written() {
        let (runner, _) = runner(MockProvider::new(
            r#"{"tool_call": {"tool": "stats", "input": {"values": []}}, "final": true}"#,
        ));
        let mut board = Blackboard::new();

        let result = runner.run(&statistician(), &mut board, ctx("t")).await;

        assert!(!result.success);
        assert!(result.facts_written.is_empty());
        assert!(!result.is_final);
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn test_raw_output_is_truncated() {
        let long = format!("{} confidence: 0.5", "x".repeat(200));
        let config = SpecialistConfig {
            max_raw_output_chars: 50,
            ..SpecialistConfig::default()
        };
        let (runner, _) = runner_with_config(MockProvider::new(long), config);
        let mut board = Blackboard::new();
        let specialist = SpecialistDefinition::new("a", "Analyst", "", 1);

        let result = runner.run(&specialist, &mut board, ctx("t")).await;

        assert_eq!(result.raw_output.chars().count(), 50);
        assert_eq!(board.read("a.answer").unwrap().confidence, 0.5);
    }
}

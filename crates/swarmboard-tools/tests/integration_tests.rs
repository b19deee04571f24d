//! Integration tests for swarmboard-tools
//!
//! These tests exercise the registry through the `Tool` trait the way a
//! specialist turn does, including custom tools registered at runtime.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use swarmboard_domain::{Tool, ToolError, ToolSpec};
use swarmboard_tools::{RegistryError, ToolRegistry};

struct AlwaysFails {
    spec: ToolSpec,
}

#[async_trait]
impl Tool for AlwaysFails {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn invoke(&self, _input: Value) -> Result<Value, ToolError> {
        Err(ToolError::ExecutionFailed("backend offline".to_string()))
    }
}

#[tokio::test]
async fn test_mock_tools_through_registry() {
    let registry = ToolRegistry::with_mock_tools();

    let calc = registry.invoke("calculator", json!({"expression": "(1 + 2) * 3"})).await.unwrap();
    assert_eq!(calc["result"], json!(9.0));

    let stats = registry.invoke("stats", json!({"values": [5, 1, 3]})).await.unwrap();
    assert_eq!(stats["median"], json!(3.0));

    let sentiment = registry
        .invoke("sentiment", json!({"text": "Great battery life"}))
        .await
        .unwrap();
    assert_eq!(sentiment["overall"], json!("positive"));
}

#[tokio::test]
async fn test_custom_tool_failure_is_typed() {
    let mut registry = ToolRegistry::new();
    registry
        .register(Arc::new(AlwaysFails {
            spec: ToolSpec::new("flaky", "Never works", json!({"type": "object"}))
                .with_capabilities(["lookup"]),
        }))
        .unwrap();

    assert_eq!(registry.tools_for_domain("general"), vec!["flaky"]);
    assert_eq!(registry.tools_for_capabilities(&["lookup"]), vec!["flaky"]);

    let err = registry.invoke("flaky", json!({})).await.unwrap_err();
    assert_eq!(err, ToolError::ExecutionFailed("backend offline".to_string()));
}

#[tokio::test]
async fn test_bad_input_is_invalid_input() {
    let registry = ToolRegistry::with_mock_tools();
    let err = registry.invoke("stats", json!({"numbers": [1]})).await.unwrap_err();
    assert_eq!(err.kind(), "invalid_input");
}

#[test]
fn test_registry_error_converts_to_tool_error() {
    let err: ToolError = RegistryError::ToolNotFound("ghost".to_string()).into();
    assert!(matches!(err, ToolError::InvalidInput(message) if message.contains("ghost")));
}

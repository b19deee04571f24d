//! Mock tool implementations

mod calculator;
mod sentiment;
mod stats;

pub use calculator::{Calculator, CalculatorParams};
pub use sentiment::{Sentiment, SentimentParams};
pub use stats::{Stats, StatsParams};

use serde::de::DeserializeOwned;
use serde_json::Value;
use swarmboard_domain::ToolError;

/// Deserialize tool input, mapping schema mismatches to `InvalidInput`
pub(crate) fn parse_params<T: DeserializeOwned>(input: Value) -> Result<T, ToolError> {
    serde_json::from_value(input).map_err(|e| ToolError::InvalidInput(e.to_string()))
}

/// Serialize tool output
pub(crate) fn to_output<T: serde::Serialize>(result: T) -> Result<Value, ToolError> {
    serde_json::to_value(result).map_err(|e| ToolError::ExecutionFailed(e.to_string()))
}

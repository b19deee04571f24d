//! Stats tool - Descriptive statistics over a list of numbers

use super::{parse_params, to_output};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use swarmboard_domain::{Tool, ToolError, ToolSpec};

/// Parameters for the stats tool
#[derive(Debug, Deserialize)]
pub struct StatsParams {
    /// Sample values
    pub values: Vec<f64>,
}

/// Summary of a sample
#[derive(Debug, Serialize, PartialEq)]
struct StatsResult {
    count: usize,
    mean: f64,
    median: f64,
    min: f64,
    max: f64,
    /// Population standard deviation
    std_dev: f64,
}

/// Descriptive statistics
#[derive(Debug, Clone)]
pub struct Stats {
    spec: ToolSpec,
}

impl Stats {
    /// Create the stats tool
    pub fn new() -> Self {
        let spec = ToolSpec::new(
            "stats",
            "Count, mean, median, min, max and standard deviation of a list of numbers",
            json!({
                "type": "object",
                "properties": {"values": {"type": "array", "items": {"type": "number"}}},
                "required": ["values"]
            }),
        )
        .with_capabilities(["statistics", "aggregation"])
        .with_domain("math");
        Self { spec }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for Stats {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn invoke(&self, input: Value) -> Result<Value, ToolError> {
        let params: StatsParams = parse_params(input)?;
        to_output(summarize(params.values)?)
    }
}

fn summarize(mut values: Vec<f64>) -> Result<StatsResult, ToolError> {
    if values.is_empty() {
        return Err(ToolError::InvalidInput("values must not be empty".to_string()));
    }
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let median = if count % 2 == 0 {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    } else {
        values[count / 2]
    };
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

    Ok(StatsResult {
        count,
        mean,
        median,
        min: values[0],
        max: values[count - 1],
        std_dev: variance.sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize() {
        let stats = summarize(vec![4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert!((stats.std_dev - 1.118_033_988_7).abs() < 1e-9);
    }

    #[test]
    fn test_odd_count_median() {
        assert_eq!(summarize(vec![5.0, 1.0, 3.0]).unwrap().median, 3.0);
    }

    #[tokio::test]
    async fn test_invoke_rejects_empty_and_bad_input() {
        let stats = Stats::new();
        let err = stats.invoke(json!({"values": []})).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_input");

        let err = stats.invoke(json!({"values": ["a"]})).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_input");

        let output = stats.invoke(json!({"values": [2, 4]})).await.unwrap();
        assert_eq!(output["mean"], json!(3.0));
        assert_eq!(output["count"], json!(2));
    }
}

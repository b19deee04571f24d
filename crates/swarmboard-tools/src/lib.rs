//! Swarmboard Tools
//!
//! Registry of the tools specialists may call, plus three mock tools that are
//! deterministic and need no network access.
//!
//! Provides 3 mock tools:
//! - `calculator` - Evaluate an arithmetic expression
//! - `stats` - Descriptive statistics over a list of numbers
//! - `sentiment` - Keyword-based sentiment of one or more texts
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use swarmboard_tools::ToolRegistry;
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let registry = ToolRegistry::with_mock_tools();
//!
//! let result = runtime
//!     .block_on(registry.invoke("calculator", json!({"expression": "2 + 3 * 4"})))
//!     .unwrap();
//! assert_eq!(result["result"], json!(14.0));
//! ```

#![warn(missing_docs)]

mod error;
mod registry;
mod tools;

pub use error::RegistryError;
pub use registry::ToolRegistry;
pub use tools::{
    Calculator, CalculatorParams, Sentiment, SentimentParams, Stats, StatsParams,
};

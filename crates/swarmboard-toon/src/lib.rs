//! Swarmboard TOON
//!
//! Token-Oriented Object Notation: a compact, line-based rendering of JSON
//! values meant to be read by a language model at the lowest token cost.
//!
//! # Overview
//!
//! The biggest savings come from *tabular* arrays. A list of objects sharing
//! one key set is written as a single header naming the fields, followed by
//! one delimited row per object:
//!
//! ```text
//! reviews[3]{id,rating,text}:
//!   1,5,Great battery
//!   2,2,"Broke after a week, disappointed"
//!   3,4,Solid value
//! ```
//!
//! Irregular structures fall back to an indentation form:
//!
//! ```text
//! task: summarize
//! limits:
//!   rounds: 2
//! tags[2]: alpha,beta
//! steps[2]:
//!   - plan
//!   -
//!     tool: stats
//! ```
//!
//! `decode` is an exact inverse of `encode` for every `serde_json::Value`;
//! integers and floats stay distinct.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use swarmboard_toon::{decode, encode};
//!
//! let value = json!({"rows": [{"a": 1, "b": "x"}, {"a": 2, "b": "y"}]});
//! let text = encode(&value);
//! assert_eq!(text, "rows[2]{a,b}:\n  1,x\n  2,y");
//! assert_eq!(decode(&text).unwrap(), value);
//! ```

#![warn(missing_docs)]

mod decode;
mod encode;
mod error;
mod options;
mod savings;
mod syntax;

pub use decode::decode;
pub use encode::{encode, encode_with};
pub use error::DecodeError;
pub use options::{Delimiter, EncodeOptions};
pub use savings::{compare_to_json, estimate_tokens, Savings};

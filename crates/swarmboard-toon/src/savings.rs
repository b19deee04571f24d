//! Size comparison against compact JSON

use crate::encode::encode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rough token estimate: one token per four characters, rounded up
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Character counts of one value in both notations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Savings {
    /// Characters in compact JSON
    pub json_chars: usize,
    /// Characters in TOON
    pub toon_chars: usize,
}

impl Savings {
    /// Fraction of characters saved relative to JSON (negative when TOON is larger)
    pub fn reduction(&self) -> f64 {
        if self.json_chars == 0 {
            return 0.0;
        }
        1.0 - self.toon_chars as f64 / self.json_chars as f64
    }

    /// Estimated tokens saved
    pub fn tokens_saved(&self) -> i64 {
        self.json_chars.div_ceil(4) as i64 - self.toon_chars.div_ceil(4) as i64
    }
}

/// Measure a value as compact JSON and as TOON
pub fn compare_to_json(value: &Value) -> Savings {
    let json = value.to_string();
    let toon = encode(value);
    Savings {
        json_chars: json.chars().count(),
        toon_chars: toon.chars().count(),
    }
}

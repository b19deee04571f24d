//! Sentiment tool - Lexicon-based sentiment of one or more texts

use super::{parse_params, to_output};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use swarmboard_domain::{Tool, ToolError, ToolSpec};

const POSITIVE: &[&str] = &[
    "good", "great", "excellent", "amazing", "love", "loved", "happy", "fast", "reliable",
    "recommend", "solid", "perfect", "best", "nice", "easy", "helpful", "fantastic", "works",
];

const NEGATIVE: &[&str] = &[
    "bad", "terrible", "awful", "hate", "hated", "broke", "broken", "slow", "poor", "worst",
    "disappointed", "disappointing", "useless", "refund", "late", "never", "problem", "crash",
];

const NEGATIONS: &[&str] = &["not", "no", "don't", "didn't", "isn't", "wasn't", "hardly"];

/// Parameters for sentiment analysis; give `text`, `texts` or both
#[derive(Debug, Deserialize)]
pub struct SentimentParams {
    /// A single text
    #[serde(default)]
    pub text: Option<String>,
    /// Several texts, scored individually
    #[serde(default)]
    pub texts: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TextSentiment {
    label: &'static str,
    score: f64,
    positive: usize,
    negative: usize,
}

#[derive(Debug, Serialize)]
struct SentimentResult {
    results: Vec<TextSentiment>,
    overall: &'static str,
    average_score: f64,
}

/// Keyword sentiment scorer
#[derive(Debug, Clone)]
pub struct Sentiment {
    spec: ToolSpec,
}

impl Sentiment {
    /// Create the sentiment tool
    pub fn new() -> Self {
        let spec = ToolSpec::new(
            "sentiment",
            "Score texts as positive, negative or neutral (score in [-1, 1])",
            json!({
                "type": "object",
                "properties": {
                    "text": {"type": "string"},
                    "texts": {"type": "array", "items": {"type": "string"}}
                }
            }),
        )
        .with_capabilities(["sentiment_analysis", "classification"])
        .with_domain("text");
        Self { spec }
    }
}

impl Default for Sentiment {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for Sentiment {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn invoke(&self, input: Value) -> Result<Value, ToolError> {
        let params: SentimentParams = parse_params(input)?;
        let texts: Vec<String> = params.text.into_iter().chain(params.texts).collect();
        if texts.is_empty() {
            return Err(ToolError::InvalidInput("provide `text` or `texts`".to_string()));
        }

        let results: Vec<TextSentiment> = texts.iter().map(|t| score(t)).collect();
        let average_score = results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64;
        to_output(SentimentResult {
            overall: label(average_score),
            average_score,
            results,
        })
    }
}

fn score(text: &str) -> TextSentiment {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .collect();

    let mut positive = 0;
    let mut negative = 0;
    let mut negated = false;
    for word in words {
        if NEGATIONS.contains(&word) {
            negated = true;
            continue;
        }
        let polarity = if POSITIVE.contains(&word) {
            1
        } else if NEGATIVE.contains(&word) {
            -1
        } else {
            0
        };
        match (polarity, negated) {
            (1, false) | (-1, true) => positive += 1,
            (-1, false) | (1, true) => negative += 1,
            _ => {}
        }
        if polarity != 0 {
            negated = false;
        }
    }

    let total = positive + negative;
    let score = if total == 0 {
        0.0
    } else {
        (positive as f64 - negative as f64) / total as f64
    };
    TextSentiment {
        label: label(score),
        score,
        positive,
        negative,
    }
}

fn label(score: f64) -> &'static str {
    if score > 0.0 {
        "positive"
    } else if score < 0.0 {
        "negative"
    } else {
        "neutral"
    }
}

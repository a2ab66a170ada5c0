use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author value recorded for posts whose author account is gone.
pub const DELETED_AUTHOR: &str = "deleted";

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub content: String,
    pub upvotes: i64,
    pub comments: u64,
    pub author: String,
    pub community: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Maps a raw model label to one of the three classes.
    ///
    /// Accepts the semantic names as well as the positional names emitted by
    /// models without an id2label mapping (`LABEL_0` is the most negative
    /// class, `LABEL_2` the most positive). Anything else is neutral.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "positive" | "label_2" => SentimentLabel::Positive,
            "negative" | "label_0" => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: String,
    pub score: f64,
}

impl SentimentResult {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// The result used whenever the model is skipped or fails.
    pub fn neutral_default() -> Self {
        Self::new("neutral", 0.5)
    }

    pub fn normalized(&self) -> SentimentLabel {
        SentimentLabel::normalize(&self.label)
    }
}

//! The JSON document emitted for one keyword analysis.
//!
//! Field names are part of the contract with the dashboard front end,
//! including the legacy `totalTweets` alias.

use pulse_core::SentimentLabel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentShare {
    pub name: String,
    pub value: f64,
    pub color: String,
}

impl SentimentShare {
    pub fn new(label: SentimentLabel, value: f64) -> Self {
        Self {
            name: label.display_name().to_string(),
            value,
            color: label_color(label).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub time: String,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordFrequency {
    pub text: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityMentions {
    pub name: String,
    pub mentions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetric {
    pub metric: String,
    pub value: i64,
}

impl EngagementMetric {
    pub fn new(metric: &str, value: i64) -> Self {
        Self {
            metric: metric.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub sentiment: Vec<SentimentShare>,
    pub timeline: Vec<TimelinePoint>,
    #[serde(rename = "wordCloud")]
    pub word_cloud: Vec<WordFrequency>,
    pub hashtags: Vec<CommunityMentions>,
    pub engagement: Vec<EngagementMetric>,
    #[serde(rename = "totalTweets")]
    pub total_tweets: usize,
    pub total_posts: usize,
    #[serde(rename = "averageSentiment")]
    pub average_sentiment: f64,
    pub upvotes: i64,
    pub comments: u64,
    pub users: usize,
}

impl ResultRecord {
    pub fn share(&self, label: SentimentLabel) -> Option<f64> {
        self.sentiment
            .iter()
            .find(|share| share.name == label.display_name())
            .map(|share| share.value)
    }
}

pub fn label_color(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "#10B981",
        SentimentLabel::Neutral => "#6B7280",
        SentimentLabel::Negative => "#EF4444",
    }
}

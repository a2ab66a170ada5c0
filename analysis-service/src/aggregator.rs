use crate::frequency::FrequencyCounter;
use crate::keywords::extract_keywords;
use crate::report::{
    CommunityMentions, EngagementMetric, ResultRecord, SentimentShare, TimelinePoint,
    WordFrequency,
};
use pulse_core::{Post, SentimentLabel, SentimentResult};
use sentiment_engine::Classification;
use std::collections::HashSet;

pub const WORD_CLOUD_SIZE: usize = 15;
pub const TOP_COMMUNITIES: usize = 5;

/// Synthetic timeline: each point shows the final counts divided by the
/// paired divisor. It does not bucket real post timestamps.
const TIMELINE: [(&str, usize); 4] = [("00:00", 4), ("06:00", 3), ("12:00", 2), ("18:00", 1)];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    /// Share of `label` in percent, unrounded. Zero when nothing was counted.
    pub fn percentage(&self, label: SentimentLabel) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.get(label) as f64 / total as f64 * 100.0
    }
}

/// Single-pass accumulator over classified posts.
#[derive(Debug, Default)]
pub struct SentimentAggregator {
    counts: SentimentCounts,
    total_upvotes: i64,
    total_comments: u64,
    authors: HashSet<String>,
    words: FrequencyCounter,
    communities: FrequencyCounter,
    model_failures: usize,
}

impl SentimentAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, post: &Post, sentiment: &SentimentResult) {
        self.total_upvotes += post.upvotes;
        self.total_comments += post.comments;
        self.authors.insert(post.author.clone());
        self.counts.record(sentiment.normalized());

        for word in extract_keywords(&post.content) {
            self.words.add(word);
        }
        self.communities.add(format!("r/{}", post.community));
    }

    pub fn observe_classification(&mut self, post: &Post, classification: &Classification) {
        if classification.is_model_failure() {
            self.model_failures += 1;
        }
        self.observe(post, &classification.result());
    }

    pub fn counts(&self) -> SentimentCounts {
        self.counts
    }

    pub fn total_posts(&self) -> usize {
        self.counts.total()
    }

    pub fn model_failures(&self) -> usize {
        self.model_failures
    }

    pub fn finish(self) -> ResultRecord {
        let counts = self.counts;
        let total_posts = counts.total();
        let unique_users = self.authors.len();

        let sentiment = [
            SentimentLabel::Positive,
            SentimentLabel::Neutral,
            SentimentLabel::Negative,
        ]
        .into_iter()
        .map(|label| SentimentShare::new(label, round_one_decimal(counts.percentage(label))))
        .collect();

        let timeline = TIMELINE
            .iter()
            .map(|(time, divisor)| TimelinePoint {
                time: time.to_string(),
                positive: counts.positive / divisor,
                negative: counts.negative / divisor,
                neutral: counts.neutral / divisor,
            })
            .collect();

        let word_cloud = self
            .words
            .most_common(WORD_CLOUD_SIZE)
            .into_iter()
            .map(|(text, value)| WordFrequency { text, value })
            .collect();

        let hashtags = self
            .communities
            .most_common(TOP_COMMUNITIES)
            .into_iter()
            .map(|(name, mentions)| CommunityMentions { name, mentions })
            .collect();

        let engagement = vec![
            EngagementMetric::new("Posts", total_posts as i64),
            EngagementMetric::new("Total Upvotes", self.total_upvotes),
            EngagementMetric::new("Total Comments", self.total_comments as i64),
            EngagementMetric::new("Unique Users", unique_users as i64),
        ];

        ResultRecord {
            sentiment,
            timeline,
            word_cloud,
            hashtags,
            engagement,
            total_tweets: total_posts,
            total_posts,
            average_sentiment: counts.percentage(SentimentLabel::Positive) / 100.0,
            upvotes: self.total_upvotes,
            comments: self.total_comments,
            users: unique_users,
        }
    }
}

/// Rounds to one decimal place using the exact binary value, with ties going
/// to the even digit: 6.25 becomes 6.2 and 93.75 becomes 93.8.
fn round_one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pulse_core::DELETED_AUTHOR;

    fn post(id: usize, content: &str, community: &str, author: &str) -> Post {
        Post {
            id: format!("p{id}"),
            content: content.to_string(),
            upvotes: 10,
            comments: 3,
            author: author.to_string(),
            community: community.to_string(),
            created_at: Utc::now(),
        }
    }

    fn aggregate(labels: &[(&str, usize)]) -> ResultRecord {
        let mut aggregator = SentimentAggregator::new();
        let mut id = 0;
        for (label, count) in labels {
            for _ in 0..*count {
                let p = post(id, "Electric vehicles everywhere", "cars", "driver");
                aggregator.observe(&p, &SentimentResult::new(*label, 0.9));
                id += 1;
            }
        }
        aggregator.finish()
    }

    #[test]
    fn test_documented_example() {
        let record = aggregate(&[("positive", 90), ("neutral", 40), ("negative", 20)]);

        assert_eq!(record.total_tweets, 150);
        assert_eq!(record.total_posts, 150);
        assert_eq!(record.sentiment[0].name, "Positive");
        assert_eq!(record.sentiment[0].value, 60.0);
        assert_eq!(record.sentiment[1].name, "Neutral");
        assert_eq!(record.sentiment[1].value, 26.7);
        assert_eq!(record.sentiment[2].name, "Negative");
        assert_eq!(record.sentiment[2].value, 13.3);
        assert!((record.average_sentiment - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        for split in [(1, 1, 1), (7, 0, 3), (13, 29, 58), (0, 0, 1), (2, 5, 11)] {
            let record = aggregate(&[
                ("positive", split.0),
                ("neutral", split.1),
                ("negative", split.2),
            ]);
            let sum: f64 = record.sentiment.iter().map(|s| s.value).sum();
            assert!((sum - 100.0).abs() <= 0.3, "sum {} for {:?}", sum, split);
        }
    }

    #[test]
    fn test_empty_input() {
        let record = SentimentAggregator::new().finish();

        assert_eq!(record.total_tweets, 0);
        assert!(record.sentiment.iter().all(|s| s.value == 0.0));
        assert_eq!(record.average_sentiment, 0.0);
        assert!(record.word_cloud.is_empty());
        assert!(record.hashtags.is_empty());
        assert_eq!(record.timeline.len(), 4);
        assert!(record
            .timeline
            .iter()
            .all(|t| t.positive == 0 && t.negative == 0 && t.neutral == 0));
        assert_eq!(record.engagement[0].value, 0);
    }

    #[test]
    fn test_rounding_ties_go_to_even() {
        let record = aggregate(&[("positive", 1), ("neutral", 15)]);
        let values: Vec<f64> = record.sentiment.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![6.2, 93.8, 0.0]);

        let record = aggregate(&[("positive", 5), ("neutral", 11)]);
        assert_eq!(record.share(SentimentLabel::Positive), Some(31.2));
        assert_eq!(record.share(SentimentLabel::Neutral), Some(68.8));
    }

    #[test]
    fn test_rounding_inexact_values() {
        assert_eq!(round_one_decimal(200.0 / 3.0), 66.7);
        assert_eq!(round_one_decimal(100.0 / 3.0), 33.3);
        assert_eq!(round_one_decimal(0.15), 0.1);
        assert_eq!(round_one_decimal(0.0), 0.0);
        assert_eq!(round_one_decimal(100.0), 100.0);
    }

    #[test]
    fn test_timeline_fractions() {
        let record = aggregate(&[("positive", 12), ("neutral", 7), ("negative", 5)]);
        let points: Vec<(&str, usize, usize, usize)> = record
            .timeline
            .iter()
            .map(|t| (t.time.as_str(), t.positive, t.negative, t.neutral))
            .collect();

        assert_eq!(
            points,
            vec![
                ("00:00", 3, 1, 1),
                ("06:00", 4, 1, 2),
                ("12:00", 6, 2, 3),
                ("18:00", 12, 5, 7)
            ]
        );
    }

    #[test]
    fn test_positional_labels_count() {
        let record = aggregate(&[("LABEL_2", 1), ("LABEL_0", 1), ("LABEL_1", 2)]);
        assert_eq!(record.share(SentimentLabel::Positive), Some(25.0));
        assert_eq!(record.share(SentimentLabel::Negative), Some(25.0));
        assert_eq!(record.share(SentimentLabel::Neutral), Some(50.0));
    }

    #[test]
    fn test_engagement_totals() {
        let mut aggregator = SentimentAggregator::new();
        let mut first = post(0, "Battery range matters", "cars", "alice");
        first.upvotes = -4;
        let second = post(1, "Battery prices dropping", "cars", DELETED_AUTHOR);
        let third = post(2, "Charging network growth", "energy", DELETED_AUTHOR);

        let neutral = SentimentResult::neutral_default();
        aggregator.observe(&first, &neutral);
        aggregator.observe(&second, &neutral);
        aggregator.observe(&third, &neutral);
        let record = aggregator.finish();

        assert_eq!(record.upvotes, 16);
        assert_eq!(record.comments, 9);
        assert_eq!(record.users, 2);
        let metrics: Vec<(&str, i64)> = record
            .engagement
            .iter()
            .map(|m| (m.metric.as_str(), m.value))
            .collect();
        assert_eq!(
            metrics,
            vec![
                ("Posts", 3),
                ("Total Upvotes", 16),
                ("Total Comments", 9),
                ("Unique Users", 2)
            ]
        );
    }

    #[test]
    fn test_word_cloud_and_hashtags_are_capped() {
        let mut aggregator = SentimentAggregator::new();
        for i in 0..40 {
            let content = format!("keyword{i} keyword{i} shared topic discussion");
            let p = post(i, &content, &format!("community{}", i % 9), "user");
            aggregator.observe(&p, &SentimentResult::neutral_default());
        }
        let record = aggregator.finish();

        assert_eq!(record.word_cloud.len(), WORD_CLOUD_SIZE);
        assert_eq!(record.hashtags.len(), TOP_COMMUNITIES);
        assert_eq!(record.word_cloud[0].text, "shared");
        assert_eq!(record.word_cloud[0].value, 40);
        assert_eq!(record.hashtags[0].name, "r/community0");
        assert_eq!(record.hashtags[0].mentions, 5);
    }

    #[test]
    fn test_model_failures_counted() {
        use sentiment_engine::DefaultReason;

        let mut aggregator = SentimentAggregator::new();
        let p = post(0, "Some content here", "cars", "user");
        aggregator.observe_classification(
            &p,
            &Classification::Defaulted(DefaultReason::ModelFailed(
                pulse_core::ClassifierError::EmptyScores {
                    model: "test".to_string(),
                },
            )),
        );
        aggregator.observe_classification(&p, &Classification::Defaulted(DefaultReason::EmptyText));

        assert_eq!(aggregator.model_failures(), 1);
        assert_eq!(aggregator.counts().neutral, 2);
    }
}

pub mod aggregator;
pub mod frequency;
pub mod keywords;
pub mod pipeline;
pub mod report;

pub use aggregator::{SentimentAggregator, SentimentCounts};
pub use pipeline::{Analyzer, RedditAnalyzer};
pub use report::ResultRecord;

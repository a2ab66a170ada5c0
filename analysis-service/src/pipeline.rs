use crate::aggregator::SentimentAggregator;
use crate::report::ResultRecord;
use pulse_core::{AnalysisSettings, AppConfig, CoreError};
use reddit_client::{FetchSettings, PostFetcher, RedditClient, SubmissionSearch};
use sentiment_engine::{Classifier, HostedInference, SentimentModel};
use tracing::{debug, info, warn};

/// Runs fetch, classification and aggregation for one keyword.
pub struct Analyzer<S, M> {
    fetcher: PostFetcher<S>,
    classifier: Classifier<M>,
}

pub type RedditAnalyzer = Analyzer<RedditClient, HostedInference>;

impl<S: SubmissionSearch, M: SentimentModel> Analyzer<S, M> {
    pub fn new(fetcher: PostFetcher<S>, classifier: Classifier<M>) -> Self {
        Self {
            fetcher,
            classifier,
        }
    }

    pub fn from_parts(source: S, model: M, settings: &AnalysisSettings) -> Self {
        Self::new(
            PostFetcher::new(source, FetchSettings::from(settings)),
            Classifier::new(model),
        )
    }

    pub async fn analyze_keyword(&mut self, keyword: &str) -> Result<ResultRecord, CoreError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(CoreError::InvalidInput {
                message: "keyword must not be empty".to_string(),
            });
        }

        let posts = self.fetcher.fetch(keyword).await?;
        info!("Analyzing sentiment of {} posts", posts.len());

        let mut aggregator = SentimentAggregator::new();
        for post in &posts {
            let classification = self.classifier.classify(&post.content).await;
            debug!("Post {} classified as {}", post.id, classification.label());
            aggregator.observe_classification(post, &classification);
        }

        if aggregator.model_failures() > 0 {
            warn!(
                "{} of {} posts defaulted to neutral after model errors",
                aggregator.model_failures(),
                aggregator.total_posts()
            );
        }

        let counts = aggregator.counts();
        info!(
            "Sentiment for '{}': {} positive, {} neutral, {} negative",
            keyword, counts.positive, counts.neutral, counts.negative
        );

        Ok(aggregator.finish())
    }
}

impl Analyzer<RedditClient, HostedInference> {
    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        let reddit = RedditClient::new(&config.reddit)?;
        let model = HostedInference::new(&config.inference)?;
        Ok(Self::from_parts(reddit, model, &config.analysis))
    }
}

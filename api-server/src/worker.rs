use analysis_service::{Analyzer, ResultRecord};
use pulse_core::{CoreError, ErrorReporter};
use reddit_client::SubmissionSearch;
use sentiment_engine::SentimentModel;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

/// Requests that may wait behind the running analysis before senders block.
pub const JOB_QUEUE_DEPTH: usize = 16;

pub type AnalysisReply = Result<ResultRecord, CoreError>;

/// Something that turns a keyword into a finished record.
pub trait KeywordAnalysis {
    async fn analyze(&mut self, keyword: &str) -> AnalysisReply;
}

impl<S: SubmissionSearch, M: SentimentModel> KeywordAnalysis for Analyzer<S, M> {
    async fn analyze(&mut self, keyword: &str) -> AnalysisReply {
        self.analyze_keyword(keyword).await
    }
}

/// One queued request and the channel its result goes back on.
#[derive(Debug)]
pub struct AnalysisJob {
    pub keyword: String,
    pub reply: oneshot::Sender<AnalysisReply>,
}

impl AnalysisJob {
    pub fn new(keyword: impl Into<String>) -> (Self, oneshot::Receiver<AnalysisReply>) {
        let (reply, receiver) = oneshot::channel();
        let job = Self {
            keyword: keyword.into(),
            reply,
        };
        (job, receiver)
    }
}

/// Runs queued analyses one at a time until every sender is dropped. One
/// analyzer serves every request, so searches never overlap.
pub async fn run_worker<A: KeywordAnalysis>(mut analysis: A, mut jobs: mpsc::Receiver<AnalysisJob>) {
    let reporter = ErrorReporter::new();

    while let Some(job) = jobs.recv().await {
        info!("Analyzing Reddit sentiment for keyword: {}", job.keyword);
        let result = analysis.analyze(&job.keyword).await;

        match &result {
            Ok(record) => info!(
                "Analysis of '{}' completed with {} posts",
                job.keyword, record.total_posts
            ),
            Err(e) => reporter.report_error(e),
        }

        if job.reply.send(result).is_err() {
            warn!(
                "Client went away before the analysis of '{}' finished",
                job.keyword
            );
        }
    }

    info!("Analysis queue closed");
}

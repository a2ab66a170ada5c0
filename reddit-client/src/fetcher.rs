use crate::api::RedditPostData;
use pulse_core::{AnalysisSettings, CoreError, ErrorReporter, Post};
use std::collections::HashSet;
use tracing::{info, warn};

/// Listing searched first; it spans every public subreddit.
pub const GLOBAL_LISTING: &str = "all";

/// A source of relevance-ranked search results.
pub trait SubmissionSearch {
    async fn search(
        &mut self,
        subreddit: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<RedditPostData>, CoreError>;
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub max_posts: usize,
    pub fallback_subreddits: Vec<String>,
    pub fallback_limit: u32,
    pub min_content_chars: usize,
}

impl From<&AnalysisSettings> for FetchSettings {
    fn from(settings: &AnalysisSettings) -> Self {
        Self {
            max_posts: settings.max_posts,
            fallback_subreddits: settings.fallback_subreddits.clone(),
            fallback_limit: settings.fallback_limit,
            min_content_chars: settings.min_content_chars,
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self::from(&AnalysisSettings::default())
    }
}

/// Collects keyword posts from the global listing, topping up from the
/// fallback subreddits when the global search comes back short.
pub struct PostFetcher<S> {
    source: S,
    settings: FetchSettings,
    reporter: ErrorReporter,
}

impl<S: SubmissionSearch> PostFetcher<S> {
    pub fn new(source: S, settings: FetchSettings) -> Self {
        Self {
            source,
            settings,
            reporter: ErrorReporter::new(),
        }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches up to `max_posts` unique posts for `keyword`.
    ///
    /// A failure of the global search is returned to the caller. A failure
    /// in one fallback subreddit is logged and that subreddit is skipped.
    pub async fn fetch(&mut self, keyword: &str) -> Result<Vec<Post>, CoreError> {
        let cap = self.settings.max_posts;
        let mut collector = Collector::new(cap, self.settings.min_content_chars);

        info!("Searching Reddit for posts about: '{}'", keyword);
        let primary_limit = u32::try_from(cap).unwrap_or(u32::MAX);
        let results = self
            .source
            .search(GLOBAL_LISTING, keyword, primary_limit)
            .await?;
        collector.extend(results);
        info!("Found {} Reddit posts", collector.len());

        if collector.is_full() {
            return Ok(collector.into_posts());
        }

        info!("Searching fallback subreddits for more posts");
        for subreddit in &self.settings.fallback_subreddits {
            if collector.is_full() {
                break;
            }

            match self
                .source
                .search(subreddit, keyword, self.settings.fallback_limit)
                .await
            {
                Ok(results) => {
                    let added = collector.extend(results);
                    info!("Added {} posts from r/{}", added, subreddit);
                }
                Err(e) => {
                    warn!("Skipping r/{} after a failed search", subreddit);
                    self.reporter.report_warning(&e);
                }
            }
        }

        info!("Total posts found: {}", collector.len());
        Ok(collector.into_posts())
    }
}

struct Collector {
    posts: Vec<Post>,
    seen: HashSet<String>,
    cap: usize,
    min_content_chars: usize,
}

impl Collector {
    fn new(cap: usize, min_content_chars: usize) -> Self {
        Self {
            posts: Vec::with_capacity(cap),
            seen: HashSet::new(),
            cap,
            min_content_chars,
        }
    }

    fn len(&self) -> usize {
        self.posts.len()
    }

    fn is_full(&self) -> bool {
        self.posts.len() >= self.cap
    }

    /// Adds results in order until the cap is hit; returns how many were kept.
    fn extend(&mut self, results: Vec<RedditPostData>) -> usize {
        let before = self.posts.len();
        for post_data in results {
            if self.is_full() {
                break;
            }
            if self.seen.contains(&post_data.id) {
                continue;
            }

            let post = Post::from(post_data);
            if post.content.chars().count() <= self.min_content_chars {
                continue;
            }

            self.seen.insert(post.id.clone());
            self.posts.push(post);
        }
        self.posts.len() - before
    }

    fn into_posts(self) -> Vec<Post> {
        self.posts
    }
}

use crate::api::{RedditListing, RedditPostData, MAX_PAGE_SIZE};
use pulse_core::CoreError;
use tracing::debug;

/// Fetches one page of a relevance search, starting after the `after` cursor.
pub trait ListingPages {
    async fn page(
        &mut self,
        subreddit: &str,
        query: &str,
        limit: u32,
        after: Option<&str>,
    ) -> Result<RedditListing<RedditPostData>, CoreError>;
}

/// Follows the listing cursor until `limit` results are collected, a page
/// comes back empty, or Reddit returns no further cursor.
pub async fn collect_pages<P: ListingPages>(
    pages: &mut P,
    subreddit: &str,
    query: &str,
    limit: u32,
) -> Result<Vec<RedditPostData>, CoreError> {
    let limit = limit as usize;
    let mut collected = Vec::with_capacity(limit.min(MAX_PAGE_SIZE as usize));
    let mut after: Option<String> = None;

    while collected.len() < limit {
        let page_size = (limit - collected.len()).min(MAX_PAGE_SIZE as usize) as u32;
        let listing = pages
            .page(subreddit, query, page_size, after.as_deref())
            .await?;

        let page_len = listing.data.children.len();
        collected.extend(listing.data.children.into_iter().map(|child| child.data));
        after = listing.data.after;

        if page_len == 0 || after.is_none() {
            break;
        }
        debug!("Continuing r/{} search after {:?}", subreddit, after);
    }

    collected.truncate(limit);
    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{RedditListingChild, RedditListingData};
    use pulse_core::RedditApiError;
    use std::collections::VecDeque;

    /// Serves canned pages in order and records each request.
    #[derive(Default)]
    struct ScriptedPages {
        pages: VecDeque<Result<RedditListing<RedditPostData>, RedditApiError>>,
        requests: Vec<(u32, Option<String>)>,
    }

    impl ScriptedPages {
        fn then(mut self, prefix: &str, count: usize, after: Option<&str>) -> Self {
            self.pages.push_back(Ok(listing(prefix, count, after)));
            self
        }

        fn then_fail(mut self, error: RedditApiError) -> Self {
            self.pages.push_back(Err(error));
            self
        }
    }

    impl ListingPages for ScriptedPages {
        async fn page(
            &mut self,
            _subreddit: &str,
            _query: &str,
            limit: u32,
            after: Option<&str>,
        ) -> Result<RedditListing<RedditPostData>, CoreError> {
            self.requests.push((limit, after.map(str::to_string)));
            match self.pages.pop_front() {
                Some(Ok(mut listing)) => {
                    listing.data.children.truncate(limit as usize);
                    Ok(listing)
                }
                Some(Err(e)) => Err(CoreError::RedditApi(e)),
                None => Ok(listing("none", 0, None)),
            }
        }
    }

    fn listing(prefix: &str, count: usize, after: Option<&str>) -> RedditListing<RedditPostData> {
        let children = (0..count)
            .map(|i| RedditListingChild {
                kind: "t3".to_string(),
                data: RedditPostData {
                    id: format!("{prefix}{i}"),
                    title: "Electric vehicles and the grid".to_string(),
                    selftext: String::new(),
                    author: Some("driver".to_string()),
                    subreddit: "all".to_string(),
                    permalink: String::new(),
                    created_utc: 1_700_000_000.0,
                    score: 1,
                    num_comments: 0,
                    over_18: false,
                    stickied: false,
                },
            })
            .collect();

        RedditListing {
            kind: "Listing".to_string(),
            data: RedditListingData {
                children,
                after: after.map(str::to_string),
                before: None,
                dist: Some(count as u32),
            },
        }
    }

    #[tokio::test]
    async fn test_follows_cursor_across_pages() {
        let mut pages = ScriptedPages::default()
            .then("p", 100, Some("t3_p99"))
            .then("q", 100, Some("t3_q99"));

        let posts = collect_pages(&mut pages, "all", "evs", 150).await.unwrap();
        assert_eq!(posts.len(), 150);
        assert_eq!(posts[99].id, "p99");
        assert_eq!(posts[100].id, "q0");
        assert_eq!(posts[149].id, "q49");
        assert_eq!(
            pages.requests,
            vec![(100, None), (50, Some("t3_p99".to_string()))]
        );
    }

    #[tokio::test]
    async fn test_stops_without_cursor() {
        let mut pages = ScriptedPages::default()
            .then("p", 40, None)
            .then("q", 100, Some("t3_q99"));

        let posts = collect_pages(&mut pages, "all", "evs", 150).await.unwrap();
        assert_eq!(posts.len(), 40);
        assert_eq!(pages.requests, vec![(100, None)]);
    }

    #[tokio::test]
    async fn test_stops_on_empty_page() {
        let mut pages = ScriptedPages::default()
            .then("p", 100, Some("t3_p99"))
            .then("q", 0, Some("t3_stale"))
            .then("r", 100, None);

        let posts = collect_pages(&mut pages, "all", "evs", 300).await.unwrap();
        assert_eq!(posts.len(), 100);
        assert_eq!(pages.requests.len(), 2);
        assert_eq!(pages.requests[1], (100, Some("t3_p99".to_string())));
    }

    #[tokio::test]
    async fn test_small_limit_is_one_request() {
        let mut pages = ScriptedPages::default().then("p", 100, Some("t3_p99"));

        let posts = collect_pages(&mut pages, "news", "evs", 30).await.unwrap();
        assert_eq!(posts.len(), 30);
        assert_eq!(pages.requests, vec![(30, None)]);
    }

    #[tokio::test]
    async fn test_page_error_is_returned() {
        let mut pages = ScriptedPages::default()
            .then("p", 100, Some("t3_p99"))
            .then_fail(RedditApiError::ServerError { status_code: 502 });

        let result = collect_pages(&mut pages, "all", "evs", 150).await;
        assert!(matches!(
            result,
            Err(CoreError::RedditApi(RedditApiError::ServerError { status_code: 502 }))
        ));
    }

    #[test]
    fn test_zero_limit_makes_no_request() {
        let mut pages = ScriptedPages::default().then("p", 10, None);

        let posts = tokio_test::block_on(collect_pages(&mut pages, "all", "evs", 0)).unwrap();
        assert!(posts.is_empty());
        assert!(pages.requests.is_empty());
    }
}

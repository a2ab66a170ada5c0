pub mod api;
pub mod auth;
pub mod fetcher;
pub mod pagination;


pub use api::{RedditApiClient, RedditListing, RedditPostData, MAX_PAGE_SIZE};
pub use auth::{AppOnlyAuthenticator, AuthState, RedditToken};
pub use fetcher::{FetchSettings, PostFetcher, SubmissionSearch, GLOBAL_LISTING};
pub use pagination::{collect_pages, ListingPages};

use pulse_core::{CoreError, RedditCredentials};

/// Authenticated Reddit search client.
#[derive(Debug)]
pub struct RedditClient {
    api: RedditApiClient,
    auth: AppOnlyAuthenticator,
}

impl RedditClient {
    pub fn new(credentials: &RedditCredentials) -> Result<Self, CoreError> {
        let api = RedditApiClient::new(credentials.user_agent.clone())?;
        let auth = AppOnlyAuthenticator::new(credentials, api.http_client().clone())?;
        Ok(Self { api, auth })
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub fn get_auth_state(&self) -> &AuthState {
        self.auth.auth_state()
    }

    pub fn set_token(&mut self, token: RedditToken) {
        self.auth.set_token(token);
    }

    pub fn user_agent(&self) -> &str {
        self.api.user_agent()
    }

    /// Searches `subreddit` by relevance, following the listing cursor
    /// until `limit` results are collected or the listing runs out.
    pub async fn search(
        &mut self,
        subreddit: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<RedditPostData>, CoreError> {
        collect_pages(self, subreddit, query, limit).await
    }
}

impl ListingPages for RedditClient {
    async fn page(
        &mut self,
        subreddit: &str,
        query: &str,
        limit: u32,
        after: Option<&str>,
    ) -> Result<RedditListing<RedditPostData>, CoreError> {
        let access_token = self.auth.access_token().await?;
        self.api
            .search_subreddit(&access_token, subreddit, query, limit, after)
            .await
    }
}

impl SubmissionSearch for RedditClient {
    async fn search(
        &mut self,
        subreddit: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<RedditPostData>, CoreError> {
        RedditClient::search(self, subreddit, query, limit).await
    }
}

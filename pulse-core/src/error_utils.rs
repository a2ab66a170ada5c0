use crate::error::*;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        match self {
            CoreError::RedditApi(e) => {
                e.log_error();
            }
            CoreError::Classifier(e) => {
                e.log_error();
            }
            CoreError::Config(e) => {
                e.log_error();
            }
            _ => {
                error!("CoreError: {}", self);
            }
        }
        self
    }

    fn log_warn(&self) -> &Self {
        match self {
            CoreError::RedditApi(e) => {
                e.log_warn();
            }
            CoreError::Classifier(e) => {
                e.log_warn();
            }
            CoreError::Config(e) => {
                e.log_warn();
            }
            _ => {
                warn!("CoreError (warning): {}", self);
            }
        }
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::RedditApi(e) => e.user_friendly_message(),
            CoreError::Classifier(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::InvalidInput { message } => format!("Invalid input: {}", message),
            _ => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::RedditApi(_) => "REDDIT_API".to_string(),
            CoreError::Classifier(_) => "CLASSIFIER".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
        }
    }
}

impl ErrorExt for RedditApiError {
    fn log_error(&self) -> &Self {
        error!("RedditApiError [{}]: {}", self.error_code(), self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("RedditApiError (warning) [{}]: {}", self.error_code(), self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            RedditApiError::AuthenticationFailed { .. } => {
                "Reddit authentication failed. Please check your credentials.".to_string()
            }
            RedditApiError::RateLimitExceeded { retry_after } => format!(
                "Too many requests. Please wait {} seconds before trying again.",
                retry_after
            ),
            RedditApiError::Forbidden { resource } => format!(
                "Access denied to {}. You may not have permission to view this content.",
                resource
            ),
            RedditApiError::SubredditNotFound { subreddit } => {
                format!("Subreddit '{}' not found or is private.", subreddit)
            }
            RedditApiError::InvalidToken => {
                "Reddit authentication token is invalid. Please check your credentials."
                    .to_string()
            }
            RedditApiError::RequestTimeout => {
                "Request to Reddit timed out. Please try again.".to_string()
            }
            _ => "Reddit API error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            RedditApiError::AuthenticationFailed { .. } => "REDDIT_AUTH_FAILED".to_string(),
            RedditApiError::RateLimitExceeded { .. } => "REDDIT_RATE_LIMIT".to_string(),
            RedditApiError::Forbidden { .. } => "REDDIT_FORBIDDEN".to_string(),
            RedditApiError::SubredditNotFound { .. } => "REDDIT_SUBREDDIT_NOT_FOUND".to_string(),
            RedditApiError::InvalidToken => "REDDIT_INVALID_TOKEN".to_string(),
            RedditApiError::RequestTimeout => "REDDIT_TIMEOUT".to_string(),
            RedditApiError::InvalidResponse { .. } => "REDDIT_INVALID_RESPONSE".to_string(),
            RedditApiError::ServerError { .. } => "REDDIT_SERVER_ERROR".to_string(),
        }
    }
}

impl ErrorExt for ClassifierError {
    fn log_error(&self) -> &Self {
        error!("ClassifierError [{}]: {}", self.error_code(), self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ClassifierError (warning) [{}]: {}", self.error_code(), self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ClassifierError::ModelLoading { model } => format!(
                "Sentiment model '{}' is still loading. Please try again shortly.",
                model
            ),
            ClassifierError::RequestFailed { model, .. } => format!(
                "Sentiment service for '{}' could not be reached.",
                model
            ),
            _ => "Sentiment analysis error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            ClassifierError::RequestFailed { .. } => "CLASSIFIER_REQUEST_FAILED".to_string(),
            ClassifierError::ModelLoading { .. } => "CLASSIFIER_MODEL_LOADING".to_string(),
            ClassifierError::InvalidResponseFormat { .. } => {
                "CLASSIFIER_INVALID_RESPONSE".to_string()
            }
            ClassifierError::EmptyScores { .. } => "CLASSIFIER_EMPTY_SCORES".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError [{}]: {}", self.error_code(), self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning) [{}]: {}", self.error_code(), self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::MissingEnvironmentVariables { names } => format!(
                "Environment variables {} are required but not set.",
                names.join(", ")
            ),
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::EnvFile { path, .. } => {
                format!("Env file '{}' is malformed. Please check its syntax.", path)
            }
            ConfigError::Parse(_) => {
                "Settings file format is invalid. Please check the settings.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::MissingEnvironmentVariables { .. } => {
                "CONFIG_MISSING_ENV_VAR".to_string()
            }
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::EnvFile { .. } => "CONFIG_ENV_FILE".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

/// Logs errors at the boundary where they stop propagating.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorReporter;

impl ErrorReporter {
    pub fn new() -> Self {
        Self
    }

    /// For errors that end the current operation.
    pub fn report_error(&self, error: &CoreError) {
        error.log_error();
        info!("Error code: {}", error.error_code());
        info!("User message: {}", error.user_friendly_message());
    }

    /// For errors that are recovered from, such as a skipped subreddit.
    pub fn report_warning(&self, error: &CoreError) {
        error.log_warn();
    }
}

//! Startup configuration.
//!
//! Credentials come from the process environment, optionally seeded from an
//! env file. Analysis tuning comes from an optional TOML settings file. Both
//! are resolved once in the binary and handed to constructors explicitly.

use crate::error::{ConfigError, CoreError};
use crate::error_utils::ErrorReporter;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

pub const REDDIT_CLIENT_ID: &str = "REDDIT_CLIENT_ID";
pub const REDDIT_CLIENT_SECRET: &str = "REDDIT_CLIENT_SECRET";
pub const REDDIT_USER_AGENT: &str = "REDDIT_USER_AGENT";
pub const SENTIMENT_API_TOKEN: &str = "SENTIMENT_API_TOKEN";
pub const SENTIMENT_MODEL: &str = "SENTIMENT_MODEL";
pub const SENTIMENT_ENDPOINT: &str = "SENTIMENT_ENDPOINT";

pub const SERVER_HOST: &str = "HOST";
pub const SERVER_PORT: &str = "PORT";

pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 5000;

pub const DEFAULT_SENTIMENT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";
pub const DEFAULT_SENTIMENT_ENDPOINT: &str = "https://api-inference.huggingface.co/models";

const DEFAULT_FALLBACK_SUBREDDITS: &[&str] = &[
    "technology",
    "news",
    "worldnews",
    "stocks",
    "investing",
    "business",
    "askreddit",
    "movies",
    "television",
    "entertainment",
    "celebrity",
    "bollywood",
    "india",
    "pics",
    "videos",
];

#[derive(Debug, Clone, PartialEq)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl RedditCredentials {
    /// Resolves the three required credentials through `lookup`.
    ///
    /// Blank values count as missing. Every missing key is reported at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let client_id = read(REDDIT_CLIENT_ID);
        let client_secret = read(REDDIT_CLIENT_SECRET);
        let user_agent = read(REDDIT_USER_AGENT);

        match (client_id, client_secret, user_agent) {
            (Some(client_id), Some(client_secret), Some(user_agent)) => Ok(Self {
                client_id,
                client_secret,
                user_agent,
            }),
            (client_id, client_secret, user_agent) => {
                let names = [
                    (REDDIT_CLIENT_ID, client_id.is_none()),
                    (REDDIT_CLIENT_SECRET, client_secret.is_none()),
                    (REDDIT_USER_AGENT, user_agent.is_none()),
                ]
                .into_iter()
                .filter(|(_, missing)| *missing)
                .map(|(name, _)| name.to_string())
                .collect();

                Err(ConfigError::MissingEnvironmentVariables { names })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InferenceConfig {
    pub endpoint: String,
    pub model: String,
    pub api_token: Option<String>,
}

impl InferenceConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            endpoint: read(SENTIMENT_ENDPOINT)
                .unwrap_or_else(|| DEFAULT_SENTIMENT_ENDPOINT.to_string()),
            model: read(SENTIMENT_MODEL).unwrap_or_else(|| DEFAULT_SENTIMENT_MODEL.to_string()),
            api_token: read(SENTIMENT_API_TOKEN),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Listen address for `--serve` mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match read(SERVER_PORT) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue {
                    field: SERVER_PORT.to_string(),
                    value: raw.clone(),
                })?,
            None => DEFAULT_SERVER_PORT,
        };

        Ok(Self {
            host: read(SERVER_HOST).unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            port,
        })
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisSettings {
    /// Cap on the number of posts collected per run.
    pub max_posts: usize,
    /// Subreddits searched, in order, when the global search under-fills.
    pub fallback_subreddits: Vec<String>,
    /// Search limit used for each fallback subreddit.
    pub fallback_limit: u32,
    /// Posts whose trimmed title+body is not longer than this are dropped.
    pub min_content_chars: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            max_posts: 150,
            fallback_subreddits: DEFAULT_FALLBACK_SUBREDDITS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            fallback_limit: 30,
            min_content_chars: 10,
        }
    }
}

impl AnalysisSettings {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        debug!("Loaded analysis settings from {}", path.display());
        Self::from_toml_str(&source)
    }

    pub fn with_max_posts(mut self, max_posts: usize) -> Self {
        self.max_posts = max_posts;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_posts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_posts".to_string(),
                value: self.max_posts.to_string(),
            });
        }
        if self.fallback_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fallback_limit".to_string(),
                value: self.fallback_limit.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub reddit: RedditCredentials,
    pub inference: InferenceConfig,
    pub analysis: AnalysisSettings,
}

impl AppConfig {
    pub fn from_lookup<F>(lookup: F, analysis: AnalysisSettings) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let reddit = RedditCredentials::from_lookup(&lookup)?;
        let inference = InferenceConfig::from_lookup(&lookup);
        analysis.validate()?;

        Ok(Self {
            reddit,
            inference,
            analysis,
        })
    }

    /// Seeds the environment from `env_file` (or a `.env` in the working
    /// directory when none is given) and resolves the configuration from it.
    ///
    /// An explicit env file must exist and parse. A malformed default `.env`
    /// is reported as a warning and the process environment is used as is.
    pub fn load(env_file: Option<&Path>, analysis: AnalysisSettings) -> Result<Self, ConfigError> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| env_file_error(path, e))?;
                info!("Loaded environment from {}", path.display());
            }
            None => match dotenvy::dotenv() {
                Ok(path) => info!("Loaded environment from {}", path.display()),
                Err(e) if is_missing_file(&e) => {
                    debug!("No {} file found, using the process environment", DEFAULT_ENV_FILE)
                }
                Err(e) => {
                    let error = env_file_error(Path::new(DEFAULT_ENV_FILE), e);
                    ErrorReporter::new().report_warning(&CoreError::Config(error));
                }
            },
        }

        Self::from_lookup(|key| std::env::var(key).ok(), analysis)
    }
}

fn is_missing_file(error: &dotenvy::Error) -> bool {
    matches!(error, dotenvy::Error::Io(e) if e.kind() == ErrorKind::NotFound)
}

fn env_file_error(path: &Path, error: dotenvy::Error) -> ConfigError {
    if is_missing_file(&error) {
        ConfigError::FileNotFound {
            path: path.display().to_string(),
        }
    } else {
        ConfigError::EnvFile {
            path: path.display().to_string(),
            details: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_credentials_resolved() {
        let lookup = lookup_from(&[
            (REDDIT_CLIENT_ID, "id"),
            (REDDIT_CLIENT_SECRET, "secret"),
            (REDDIT_USER_AGENT, "reddit-pulse/0.1 by tester"),
        ]);

        let credentials = RedditCredentials::from_lookup(lookup).unwrap();
        assert_eq!(credentials.client_id, "id");
        assert_eq!(credentials.client_secret, "secret");
        assert_eq!(credentials.user_agent, "reddit-pulse/0.1 by tester");
    }

    #[test]
    fn test_missing_credentials_are_all_named() {
        let lookup = lookup_from(&[(REDDIT_CLIENT_ID, "id"), (REDDIT_USER_AGENT, "  ")]);

        match RedditCredentials::from_lookup(lookup) {
            Err(ConfigError::MissingEnvironmentVariables { names }) => {
                assert_eq!(names, vec![REDDIT_CLIENT_SECRET, REDDIT_USER_AGENT]);
            }
            other => panic!("Expected MissingEnvironmentVariables, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_credentials_message() {
        let error = RedditCredentials::from_lookup(|_| None).unwrap_err();
        let message = error.to_string();
        assert!(message.contains("'REDDIT_CLIENT_ID'"));
        assert!(message.contains("'REDDIT_CLIENT_SECRET'"));
        assert!(message.contains("'REDDIT_USER_AGENT'"));
    }

    #[test]
    fn test_inference_defaults() {
        let inference = InferenceConfig::default();
        assert_eq!(inference.model, DEFAULT_SENTIMENT_MODEL);
        assert_eq!(inference.endpoint, DEFAULT_SENTIMENT_ENDPOINT);
        assert!(inference.api_token.is_none());

        let inference = InferenceConfig::from_lookup(lookup_from(&[
            (SENTIMENT_MODEL, "custom/model"),
            (SENTIMENT_API_TOKEN, "hf_token"),
        ]));
        assert_eq!(inference.model, "custom/model");
        assert_eq!(inference.api_token.as_deref(), Some("hf_token"));
    }

    #[test]
    fn test_settings_defaults() {
        let settings = AnalysisSettings::default();
        assert_eq!(settings.max_posts, 150);
        assert_eq!(settings.fallback_limit, 30);
        assert_eq!(settings.min_content_chars, 10);
        assert_eq!(settings.fallback_subreddits.len(), 15);
        assert_eq!(settings.fallback_subreddits[0], "technology");
        assert_eq!(settings.fallback_subreddits[14], "videos");
    }

    #[test]
    fn test_settings_from_toml() {
        let settings = AnalysisSettings::from_toml_str(
            r#"
            max_posts = 40
            fallback_subreddits = ["rust", "programming"]
            "#,
        )
        .unwrap();

        assert_eq!(settings.max_posts, 40);
        assert_eq!(settings.fallback_subreddits, vec!["rust", "programming"]);
        assert_eq!(settings.fallback_limit, 30);
    }

    #[test]
    fn test_settings_rejects_zero_cap() {
        let result = AnalysisSettings::from_toml_str("max_posts = 0");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

        let result = AnalysisSettings::from_toml_str("unknown_key = 1");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_app_config_from_lookup() {
        let lookup = lookup_from(&[
            (REDDIT_CLIENT_ID, "id"),
            (REDDIT_CLIENT_SECRET, "secret"),
            (REDDIT_USER_AGENT, "agent"),
        ]);

        let config =
            AppConfig::from_lookup(lookup, AnalysisSettings::default().with_max_posts(20)).unwrap();
        assert_eq!(config.analysis.max_posts, 20);
        assert_eq!(config.inference.model, DEFAULT_SENTIMENT_MODEL);
    }

    #[test]
    fn test_server_config() {
        let server = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(server, ServerConfig::default());
        assert_eq!(server.address(), "0.0.0.0:5000");

        let server =
            ServerConfig::from_lookup(lookup_from(&[(SERVER_PORT, "8080"), (SERVER_HOST, "127.0.0.1")]))
                .unwrap();
        assert_eq!(server.address(), "127.0.0.1:8080");
        assert_eq!(server.with_port(9000).port, 9000);

        let result = ServerConfig::from_lookup(lookup_from(&[(SERVER_PORT, "http")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_env_file_errors() {
        let dir = std::env::temp_dir().join(format!("reddit-pulse-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let malformed = dir.join("malformed.env");
        std::fs::write(&malformed, "NOT A VALID LINE\n").unwrap();
        let missing = dir.join("missing.env");

        let parse_error = dotenvy::from_path(&malformed).unwrap_err();
        assert!(!is_missing_file(&parse_error));
        assert!(matches!(
            env_file_error(&malformed, parse_error),
            ConfigError::EnvFile { .. }
        ));

        let io_error = dotenvy::from_path(&missing).unwrap_err();
        assert!(is_missing_file(&io_error));
        assert!(matches!(
            env_file_error(&missing, io_error),
            ConfigError::FileNotFound { .. }
        ));

        let result = AppConfig::load(Some(&malformed), AnalysisSettings::default());
        assert!(matches!(result, Err(ConfigError::EnvFile { .. })));
        let result = AppConfig::load(Some(&missing), AnalysisSettings::default());
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));

        std::fs::remove_dir_all(&dir).ok();
    }
}

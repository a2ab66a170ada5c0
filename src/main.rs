mod cli;

use analysis_service::{RedditAnalyzer, ResultRecord};
use clap::error::ErrorKind;
use clap::Parser;
use cli::Args;
use pulse_core::{AnalysisSettings, AppConfig, ConfigError, CoreError, ErrorReporter, ServerConfig};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "reddit_pulse=info,reddit_client=info,analysis_service=info,\
     api_server=info,sentiment_engine=warn,pulse_core=info";

const MISSING_KEYWORD: &str = "Please provide a keyword to analyze";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // stdout carries only the JSON document; all logging goes to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => return emit_error(&usage_error(&e)),
    };

    if args.serve {
        return serve(&args).await;
    }

    let keyword = match requested_keyword(&args) {
        Ok(keyword) => keyword,
        Err(message) => return emit_error(message),
    };

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => return config_failure(e),
    };

    tracing::info!("Starting Reddit sentiment analysis for '{}'", keyword);

    match run(&config, &keyword).await {
        Ok(record) => emit_record(&record, args.compact),
        Err(e) => {
            ErrorReporter::new().report_error(&e);
            emit_error(&format!("Analysis failed: {e}"))
        }
    }
}

/// The trimmed keyword, or the message reported when none was given.
fn requested_keyword(args: &Args) -> Result<String, &'static str> {
    args.keyword
        .as_deref()
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .ok_or(MISSING_KEYWORD)
}

/// First line of a clap error, without its `error: ` prefix.
fn usage_error(error: &clap::Error) -> String {
    let rendered = error.to_string();
    rendered
        .lines()
        .next()
        .unwrap_or("Invalid arguments")
        .trim_start_matches("error: ")
        .to_string()
}

fn load_config(args: &Args) -> Result<AppConfig, ConfigError> {
    let mut settings = match &args.settings {
        Some(path) => AnalysisSettings::from_file(path)?,
        None => AnalysisSettings::default(),
    };
    if let Some(max_posts) = args.max_posts {
        settings = settings.with_max_posts(max_posts);
    }

    AppConfig::load(args.env_file.as_deref(), settings)
}

/// Resolved after `load_config`, so HOST and PORT may come from the env file.
fn server_config(args: &Args) -> Result<ServerConfig, ConfigError> {
    let mut server = ServerConfig::from_lookup(|key| std::env::var(key).ok())?;
    if let Some(host) = &args.host {
        server = server.with_host(host.clone());
    }
    if let Some(port) = args.port {
        server = server.with_port(port);
    }
    Ok(server)
}

async fn run(config: &AppConfig, keyword: &str) -> Result<ResultRecord, CoreError> {
    let mut analyzer = RedditAnalyzer::from_config(config)?;
    analyzer.analyze_keyword(keyword).await
}

async fn serve(args: &Args) -> ExitCode {
    let config = match load_config(args) {
        Ok(config) => config,
        Err(e) => return config_failure(e),
    };
    let server = match server_config(args) {
        Ok(server) => server,
        Err(e) => return config_failure(e),
    };

    let result = match RedditAnalyzer::from_config(&config) {
        Ok(analyzer) => api_server::serve(analyzer, &server).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ErrorReporter::new().report_error(&e);
            emit_error(&format!("Server failed: {e}"))
        }
    }
}

fn config_failure(error: ConfigError) -> ExitCode {
    let message = error.to_string();
    ErrorReporter::new().report_error(&CoreError::Config(error));
    emit_error(&message)
}

fn emit_record(record: &ResultRecord, compact: bool) -> ExitCode {
    let rendered = if compact {
        serde_json::to_string(record)
    } else {
        serde_json::to_string_pretty(record)
    };

    match rendered {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => emit_error(&format!("Analysis failed: {e}")),
    }
}

fn error_document(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

fn emit_error(message: &str) -> ExitCode {
    println!("{}", error_document(message));
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("reddit-pulse").chain(argv.iter().copied()))
    }

    #[test]
    fn test_keyword_is_required() {
        let args = parse(&[]).unwrap();
        assert_eq!(requested_keyword(&args), Err(MISSING_KEYWORD));

        let args = parse(&["   "]).unwrap();
        assert_eq!(requested_keyword(&args), Err(MISSING_KEYWORD));

        let args = parse(&["  electric vehicles "]).unwrap();
        assert_eq!(requested_keyword(&args).as_deref(), Ok("electric vehicles"));
    }

    #[test]
    fn test_error_document() {
        assert_eq!(
            error_document(MISSING_KEYWORD),
            r#"{"error":"Please provide a keyword to analyze"}"#
        );
    }

    #[test]
    fn test_usage_error_message() {
        let error = parse(&["evs", "--max-posts", "many"]).unwrap_err();
        let message = usage_error(&error);
        assert!(!message.starts_with("error:"));
        assert!(message.contains("many"), "{}", message);
    }

    #[test]
    fn test_serve_flags() {
        let args = parse(&["--serve", "--port", "8080"]).unwrap();
        assert!(args.serve);
        assert_eq!(args.port, Some(8080));

        assert!(parse(&["--port", "8080", "evs"]).is_err());
        assert!(parse(&["--serve", "evs"]).is_err());
    }
}

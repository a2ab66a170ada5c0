use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Reddit keyword sentiment analysis", long_about = None)]
pub struct Args {
    /// Keyword to search Reddit for
    pub keyword: Option<String>,

    /// Maximum number of posts to analyze (overrides the settings file)
    #[arg(long)]
    pub max_posts: Option<usize>,

    /// Env file holding the Reddit credentials (defaults to ./.env when present)
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// TOML file with analysis settings
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Print the result on a single line instead of indented
    #[arg(long)]
    pub compact: bool,

    /// Serve the HTTP API instead of analyzing a single keyword
    #[arg(long, conflicts_with = "keyword")]
    pub serve: bool,

    /// Address to listen on in serve mode (overrides HOST)
    #[arg(long, requires = "serve")]
    pub host: Option<String>,

    /// Port to listen on in serve mode (overrides PORT)
    #[arg(long, requires = "serve")]
    pub port: Option<u16>,
}

//! Command-line entry point for lokalise-dl

use clap::Parser;
use lokalise_dl::{Config, FetchMode, TranslationDownloader};
use std::error::Error as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lokalise-dl")]
#[command(version, about = "Download Lokalise translations as .properties files")]
struct Args {
    /// Lokalise API token
    #[arg(long, env = "LOKALISE_API_TOKEN", hide_env_values = true)]
    api_token: String,

    /// Lokalise project identifier
    #[arg(long, env = "LOKALISE_PROJECT_ID")]
    project_id: String,

    /// Comma-separated language codes, or '*' for every project language
    #[arg(short, long = "languages", env = "LOKALISE_LANGUAGE_CODES")]
    language_codes: Option<String>,

    /// Prefix for every written file name
    #[arg(long, env = "LOKALISE_FILE_PREFIX", default_value = "")]
    file_prefix: String,

    /// Directory receiving the .properties files
    #[arg(
        short,
        long,
        env = "LOKALISE_OUTPUT_DIR",
        default_value = "src/main/resources/i18n"
    )]
    output_dir: PathBuf,

    /// One bundle for all languages (batch) or one per language (per-language)
    #[arg(long, env = "LOKALISE_FETCH_MODE", default_value = "batch", value_parser = parse_fetch_mode)]
    fetch_mode: FetchMode,

    /// Lokalise API root
    #[arg(long, env = "LOKALISE_API_URL", default_value = lokalise_dl::config::DEFAULT_API_URL)]
    api_url: String,

    /// Request timeout in seconds (default: no timeout)
    #[arg(long = "timeout", env = "LOKALISE_REQUEST_TIMEOUT")]
    timeout_secs: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_fetch_mode(value: &str) -> Result<FetchMode, String> {
    value.parse().map_err(|e: lokalise_dl::Error| e.to_string())
}

impl Args {
    fn into_config(self) -> Config {
        let mut config = Config::new(self.api_token, self.project_id);
        config.language_codes = self.language_codes;
        config.file_prefix = self.file_prefix;
        config.output_dir = self.output_dir;
        config.fetch_mode = self.fetch_mode;
        config.api_url = self.api_url;
        config.request_timeout = self.timeout_secs.map(Duration::from_secs);
        config
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lokalise_dl={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match TranslationDownloader::new(args.into_config()) {
        Ok(downloader) => downloader.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => {
            println!(
                "Downloaded {} file(s) for {} language(s)",
                report.files.len(),
                report.languages.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

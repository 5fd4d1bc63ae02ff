// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2md::{
    parse_since, ApiKey, CommandLineInput, NotionHttpClient, NotionRepository, RunOptions,
    SyncConfig,
};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion2md.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).map_err(|e| anyhow::anyhow!("logging setup failed: {}", e))?;

    let mut config = SyncConfig::load(&cli.config)?;

    // Flags override the file; parallelism 0 forces serial mode.
    config.parallelism = cli.parallelism;
    if cli.parallelism == 0 {
        config.parallelize = false;
    } else {
        config.parallelize = cli.parallelize;
    }

    let since = match cli.since.as_deref() {
        None => None,
        Some(raw) => match parse_since(raw) {
            Some(cutoff) => {
                println!("Filtering pages modified since: {}", cutoff.to_rfc3339());
                Some(cutoff)
            }
            None => {
                log::warn!("Error parsing --since value '{}'. Ignoring flag.", raw);
                None
            }
        },
    };

    let secret = std::env::var("NOTION_SECRET")
        .map_err(|_| anyhow::anyhow!("NOTION_SECRET environment variable is not set"))?;
    let api_key = ApiKey::new(secret)?;
    let client = NotionHttpClient::new(&api_key)?;
    let repo: Arc<dyn NotionRepository> = Arc::new(client);

    let options = RunOptions {
        keywords: cli.keywords,
        since,
        dry_run: cli.dry_run,
    };

    // Run failures are logged without a failing exit status; only startup
    // problems (bad config, missing secret) abort with a non-zero code.
    if let Err(error) = notion2md::run(repo, Arc::new(config), options).await {
        log::error!("{}", error);
    }

    Ok(())
}

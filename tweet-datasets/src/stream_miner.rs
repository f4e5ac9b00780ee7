use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use reqwest::Client;
use tracing::{info, Level};
use tweet_datasets::logging;
use tweet_datasets_common::{Credentials, JsonStorage};
use twitter::{Miner, StreamMiner, TwitterClient};

/// Get tweets using the Twitter streaming API
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Maximum number of tweets to download; zero or a negative number
    /// means no limit
    #[arg(short, long, value_name = "LIMIT")]
    max: Option<String>,

    /// Logging level (DEBUG, INFO, WARNING, ERROR or CRITICAL)
    #[arg(short, long, default_value = "ERROR", value_name = "LEVEL")]
    log_level: String,

    /// A file to log the output
    #[arg(short = 'o', long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// File with the Twitter API credentials, one `key value` pair per line
    #[arg(value_name = "CREDENTIALSFILE")]
    credentials_file: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let limit = match args.max.as_deref().map(str::parse::<i64>).transpose() {
        Ok(max) => max.unwrap_or(0),
        Err(_) => {
            eprintln!("limit must be a number\n");
            usage_and_exit();
        }
    };
    let Some(level) = logging::parse_level(&args.log_level) else {
        usage_and_exit();
    };

    match run(&args, limit, level).await {
        Ok(()) => process::exit(0),
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

fn usage_and_exit() -> ! {
    eprintln!("{}", Args::command().render_help());
    process::exit(1);
}

async fn run(args: &Args, limit: i64, level: Level) -> Result<()> {
    logging::init(level, args.log_file.as_deref())?;

    info!(
        "reading credentials file {}",
        args.credentials_file.display()
    );
    let credentials = Credentials::load(&args.credentials_file)?;

    let client = Client::new();
    let miner = StreamMiner::new(TwitterClient::new(&client, &credentials)?, limit);
    let tweets = miner.collect().await?;

    JsonStorage::new("tweets").store(&tweets)?;
    Ok(())
}

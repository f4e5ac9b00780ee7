use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use reqwest::Client;
use tracing::{debug, info, Level};
use tweet_datasets::logging;
use tweet_datasets_common::{load_topics, Credentials, JsonStorage};
use twitter::{Miner, TopicMiner, TwitterClient};

const CONFIG_HELP: &str = "Configuration file format:
    topic1 = 'query1', 'query2', ..., 'queryN'
    topic2 = 'query1', 'query2', ..., 'queryN'

where `topic` is the name of the file in which the tweets will be stored,
and `query` is a valid Twitter search query.";

/// Get tweets matching the queries defined in the configuration file
#[derive(Parser, Debug)]
#[command(version, about, after_help = CONFIG_HELP)]
struct Args {
    /// Logging level (DEBUG, INFO, WARNING, ERROR or CRITICAL)
    #[arg(short, long, default_value = "ERROR", value_name = "LEVEL")]
    log_level: String,

    /// A file to log the output
    #[arg(short = 'o', long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// File with the topics and their queries
    #[arg(value_name = "CONFIGFILE")]
    config_file: PathBuf,

    /// File with the Twitter API credentials, one `key value` pair per line
    #[arg(value_name = "CREDENTIALSFILE")]
    credentials_file: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let Some(level) = logging::parse_level(&args.log_level) else {
        eprintln!("{}", Args::command().render_help());
        process::exit(1);
    };

    match run(&args, level).await {
        Ok(()) => process::exit(0),
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

async fn run(args: &Args, level: Level) -> Result<()> {
    logging::init(level, args.log_file.as_deref())?;

    info!(
        "reading credentials file {}",
        args.credentials_file.display()
    );
    let credentials = Credentials::load(&args.credentials_file)?;
    info!("reading configuration file {}", args.config_file.display());
    let topics = load_topics(&args.config_file)?;

    let client = Client::new();
    for topic in topics {
        debug!(
            "creating a topic miner for {}: queries={:?}",
            topic.name, topic.queries
        );
        let miner = TopicMiner::new(TwitterClient::new(&client, &credentials)?, topic.queries);
        let tweets = miner.collect().await?;
        JsonStorage::new(&topic.name).store(&tweets)?;
    }
    Ok(())
}

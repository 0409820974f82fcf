use anyhow::Context;
use clap::Parser;
use config::Settings;
use dashboard::Dashboard;
use dotenv::dotenv;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use tgpulse_analysis::{parse_channel_list, ScrapeRequest};
use tgpulse_sentiment::SentimentModel;
use tgpulse_telegram::ContentSource;
use tracing_subscriber::EnvFilter;
mod config;
mod dashboard;
mod render;
mod report;
mod scrape;

const MIN_LIMIT: usize = 10;
const LIMIT_STEP: usize = 10;

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrape Telegram channels and chart their sentiment", long_about = None)]
struct Args {
    /// Telegram channel names separated by comma (e.g. Channel1, Channel2, Channel3).
    /// Prompted for when omitted.
    #[arg(long, short)]
    channels: Option<String>,

    /// Maximum number of posts to scrape per channel (min 10, step 10)
    #[arg(long, short, default_value = "10", value_parser = parse_limit)]
    limit: usize,

    /// Stop at exactly `limit` posts per channel instead of one past it
    #[arg(long)]
    exact_limit: bool,

    /// Rows shown in the results table
    #[arg(long, default_value = "50")]
    rows: usize,

    /// Also write the dashboard as an HTML page
    #[arg(long)]
    html: Option<PathBuf>,
}

fn parse_limit(value: &str) -> Result<usize, String> {
    let limit: usize = value
        .trim()
        .parse()
        .map_err(|_| format!("`{value}` is not a whole number"))?;

    if limit < MIN_LIMIT {
        return Err(format!("limit must be at least {MIN_LIMIT}"));
    }
    if limit % LIMIT_STEP != 0 {
        return Err(format!("limit must be a multiple of {LIMIT_STEP}"));
    }

    Ok(limit)
}

fn prompt_channels() -> anyhow::Result<String> {
    print!("Enter the list of Telegram channel names separated by comma (e.g. Channel1, Channel2, Channel3): ");
    stdout().flush()?;

    let mut line = String::new();
    stdin()
        .read_line(&mut line)
        .context("Failed to read channel list")?;

    Ok(line)
}

/// `None` when no channel names were given; nothing is scraped then.
fn build_request(raw_channels: &str, args: &Args) -> Option<ScrapeRequest> {
    let channels = parse_channel_list(raw_channels);
    if channels.is_empty() {
        return None;
    }

    Some(
        ScrapeRequest::builder()
            .channels(channels)
            .max_limit(args.limit)
            .exact_limit(args.exact_limit)
            .build(),
    )
}

async fn run(args: Args, settings: Settings) -> anyhow::Result<()> {
    println!("{}", render::header());

    let raw_channels = match &args.channels {
        Some(channels) => channels.clone(),
        None => prompt_channels()?,
    };

    let client = scrape::client(&settings)?;
    let model = scrape::sentiment_model(&settings)?;

    run_with(&client, &model, &raw_channels, &args, &mut stdout()).await
}

async fn run_with<S, M, W>(
    source: &S,
    model: &M,
    raw_channels: &str,
    args: &Args,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: ContentSource + ?Sized,
    M: SentimentModel + ?Sized,
    W: Write,
{
    let Some(request) = build_request(raw_channels, args) else {
        writeln!(out, "{}", render::MISSING_CHANNELS)?;
        return Ok(());
    };

    let batch = scrape::scrape(source, model, &request).await?;

    if batch.is_empty() {
        writeln!(out, "{}", render::NO_DATA)?;
        return Ok(());
    }

    let dashboard =
        Dashboard::build(&batch, args.rows).context("Failed to aggregate scraped posts")?;

    write!(out, "{}", render::terminal(&dashboard))?;

    if let Some(path) = &args.html {
        report::write(&dashboard, path)
            .with_context(|| format!("Failed to write dashboard to {}", path.display()))?;
        writeln!(out, "\nDashboard written to {}", path.display())?;
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let settings = Settings::new().context("Failed to load configuration")?;

    let rt = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    if let Err(e) = rt.block_on(run(args, settings)) {
        tracing::error!("scrape failed: {e:#}");
        return Err(e);
    }

    Ok(())
}

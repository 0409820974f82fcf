use crate::config::Settings;
use anyhow::{Context, Result};
use tgpulse_analysis::{scrape_channels, Batch, ScrapeRequest};
use tgpulse_sentiment::{Lexicon, LexiconModel, SentimentModel};
use tgpulse_telegram::{ContentSource, TelegramClient};

pub fn client(settings: &Settings) -> Result<TelegramClient> {
    TelegramClient::new(&settings.base_url, &settings.user_agent, settings.timeout)
        .context("Failed to build Telegram client")
}

pub fn sentiment_model(settings: &Settings) -> Result<LexiconModel> {
    let lexicon = match &settings.lexicon_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading sentiment lexicon");
            Lexicon::from_path(path)
                .with_context(|| format!("Failed to load lexicon {}", path.display()))?
        }
        None => Lexicon::embedded().context("Failed to load embedded lexicon")?,
    };

    Ok(LexiconModel::new(lexicon))
}

pub async fn scrape<S, M>(source: &S, model: &M, request: &ScrapeRequest) -> Result<Batch>
where
    S: ContentSource + ?Sized,
    M: SentimentModel + ?Sized,
{
    tracing::info!(
        channels = request.channels.len(),
        max_limit = request.max_limit,
        exact_limit = request.exact_limit,
        "starting scrape"
    );

    let batch = scrape_channels(source, model, request).await?;

    tracing::info!(posts = batch.len(), "scrape finished");

    Ok(batch)
}

use crate::cleaner::clean_text;
use crate::mentions::most_mentioned;
use bon::Builder;
use tgpulse_sentiment::{SentimentError, SentimentModel};
use tgpulse_shared_models::{CleanedPost, MentionTally, Post};
use tgpulse_telegram::{ContentSource, TelegramError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Error fetching channel content: {0}")]
    Source(#[from] TelegramError),
    #[error("Error scoring sentiment: {0}")]
    Sentiment(#[from] SentimentError),
}

#[derive(Debug, Clone, Builder)]
pub struct ScrapeRequest {
    pub channels: Vec<String>,
    /// Per-channel cap on scraped posts.
    pub max_limit: usize,
    /// Stop at exactly `max_limit` posts instead of `max_limit + 1`.
    #[builder(default)]
    pub exact_limit: bool,
}

impl ScrapeRequest {
    pub fn per_channel_cap(&self) -> usize {
        if self.exact_limit {
            self.max_limit
        } else {
            self.max_limit.saturating_add(1)
        }
    }
}

/// The enriched posts of one request, channel by channel, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub posts: Vec<CleanedPost>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn clean_texts(&self) -> impl Iterator<Item = &str> {
        self.posts.iter().map(|post| post.clean_context.as_str())
    }

    pub fn mentions(&self) -> MentionTally {
        most_mentioned(self.clean_texts())
    }
}

/// Splits a comma separated channel list, trimming names and dropping empty ones.
pub fn parse_channel_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn enrich<M>(model: &M, channel: &str, post: Post) -> Result<CleanedPost, SentimentError>
where
    M: SentimentModel + ?Sized,
{
    let clean_context = clean_text(post.content.as_deref());
    let scores = model.score(&clean_context)?;

    tracing::trace!(url = %post.url, polarity = scores.polarity, "scored post");

    Ok(CleanedPost::new(channel, post, clean_context, scores))
}

/// Scrapes every channel in order and cleans and scores each post.
///
/// Failures from the source or the model abort the whole batch.
pub async fn scrape_channels<S, M>(
    source: &S,
    model: &M,
    request: &ScrapeRequest,
) -> Result<Batch, PipelineError>
where
    S: ContentSource + ?Sized,
    M: SentimentModel + ?Sized,
{
    let cap = request.per_channel_cap();
    let mut posts = Vec::new();

    for channel in &request.channels {
        tracing::info!(%channel, cap, "scraping channel");

        let raw = fetch_channel(source, channel, cap).await?;
        tracing::info!(%channel, posts = raw.len(), "channel scraped");

        for post in raw {
            posts.push(enrich(model, channel, post)?);
        }
    }

    Ok(Batch { posts })
}

async fn fetch_channel<S>(source: &S, channel: &str, cap: usize) -> Result<Vec<Post>, TelegramError>
where
    S: ContentSource + ?Sized,
{
    let mut posts = Vec::new();
    if cap == 0 {
        return Ok(posts);
    }

    let mut before = None;
    loop {
        let page = source.fetch_page(channel, before).await?;
        tracing::debug!(channel, ?before, received = page.posts.len(), "page received");

        if page.posts.is_empty() {
            return Ok(posts);
        }
        for post in page.posts {
            posts.push(post);
            if posts.len() >= cap {
                return Ok(posts);
            }
        }

        match page.before {
            Some(cursor) => before = Some(cursor),
            None => return Ok(posts),
        }
    }
}

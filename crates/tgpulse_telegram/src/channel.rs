use crate::TelegramError;
use crate::method::Method;
use bon::Builder;
use chrono::{DateTime, Utc};
use reqwest::Url;
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tgpulse_shared_models::Post;

const POST_URL_PREFIX: &str = "https://t.me/";

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("selector literal is valid CSS")
}

static MESSAGE: LazyLock<Selector> =
    LazyLock::new(|| selector("div.tgme_widget_message[data-post]"));
static DATE: LazyLock<Selector> =
    LazyLock::new(|| selector("a.tgme_widget_message_date time[datetime]"));
// Reply previews reuse the text class; skip them.
static TEXT: LazyLock<Selector> =
    LazyLock::new(|| selector("div.tgme_widget_message_text:not(.js-message_reply_text)"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static MORE: LazyLock<Selector> =
    LazyLock::new(|| selector("a.tme_messages_more[data-before]"));

#[derive(Serialize, Deserialize, Debug, Default, Builder)]
pub struct ChannelParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelPage {
    /// Newest first.
    pub posts: Vec<Post>,
    /// Cursor of the next (older) page, if any.
    pub before: Option<u64>,
}

/// The public web preview at `/s/<channel>`.
pub struct ChannelPreview;

impl Method for ChannelPreview {
    const PATH: &'static str = "s";

    type Params = ChannelParams;
    type Response = ChannelPage;

    fn parse(page_url: &Url, body: &str) -> Result<Self::Response, TelegramError> {
        // Channels without a public preview redirect to the plain `/<channel>` page.
        if !is_preview_url(page_url) {
            tracing::warn!(%page_url, "channel has no public preview, nothing to scrape");
            return Ok(ChannelPage::default());
        }

        parse_page(page_url, body)
    }
}

/// Whether the path ends in `s/<channel>`, below any base path prefix.
fn is_preview_url(page_url: &Url) -> bool {
    let segments: Vec<&str> = page_url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    matches!(segments.as_slice(), [.., prefix, _channel] if *prefix == ChannelPreview::PATH)
}

pub fn parse_page(page_url: &Url, body: &str) -> Result<ChannelPage, TelegramError> {
    let document = Html::parse_document(body);

    let mut posts = document
        .select(&MESSAGE)
        .map(|message| parse_post(page_url, message))
        .collect::<Result<Vec<_>, _>>()?;
    // The page lists posts oldest to newest.
    posts.reverse();

    let before = document
        .select(&MORE)
        .next()
        .and_then(|more| more.value().attr("data-before"))
        .and_then(|value| value.parse::<u64>().ok());

    Ok(ChannelPage { posts, before })
}

fn parse_post(page_url: &Url, message: ElementRef<'_>) -> Result<Post, TelegramError> {
    let data_post = message.value().attr("data-post").unwrap_or_default();
    let url = format!("{POST_URL_PREFIX}{data_post}");

    let raw_date = message
        .select(&DATE)
        .next()
        .and_then(|time| time.value().attr("datetime"))
        .ok_or_else(|| TelegramError::MalformedPost {
            url: url.clone(),
            reason: "missing timestamp".to_string(),
        })?;
    let date = DateTime::parse_from_rfc3339(raw_date)
        .map_err(|e| TelegramError::MalformedPost {
            url: url.clone(),
            reason: format!("invalid timestamp {raw_date:?}: {e}"),
        })?
        .with_timezone(&Utc);

    let (content, outlinks) = match message.select(&TEXT).next() {
        Some(text) => (Some(message_text(text)), outlinks(page_url, message, &url)),
        None => (None, Vec::new()),
    };

    tracing::trace!(%url, has_text = content.is_some(), "parsed post");

    Ok(Post {
        url,
        date,
        content,
        outlinks,
    })
}

fn message_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(fragment) => text.push_str(fragment),
            Node::Element(inner) if inner.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    text
}

fn outlinks(page_url: &Url, message: ElementRef<'_>, post_url: &str) -> Vec<String> {
    let self_link = format!("{post_url}?");
    let mut links: Vec<String> = Vec::new();

    for link in message.select(&LINK) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if is_author_link(link) || href == post_url || href.starts_with(&self_link) {
            continue;
        }
        let Ok(resolved) = page_url.join(href) else {
            continue;
        };
        let resolved = resolved.to_string();
        if !links.contains(&resolved) {
            links.push(resolved);
        }
    }

    links
}

fn is_author_link(link: ElementRef<'_>) -> bool {
    link.parent()
        .and_then(ElementRef::wrap)
        .is_some_and(|parent| {
            parent.value().classes().any(|class| {
                class == "tgme_widget_message_user" || class == "tgme_widget_message_author"
            })
        })
}

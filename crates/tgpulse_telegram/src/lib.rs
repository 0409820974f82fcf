pub mod channel;
pub mod method;

use async_trait::async_trait;
use channel::{ChannelPage, ChannelParams, ChannelPreview};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder, Url};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://t.me";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Malformed post {url}: {reason}")]
    MalformedPost { url: String, reason: String },
}

/// Capability: fetch one page of a channel's posts, newest first.
///
/// `before` is the cursor returned by the previous page; `None` asks for the
/// most recent page.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_page(
        &self,
        channel: &str,
        before: Option<u64>,
    ) -> Result<ChannelPage, TelegramError>;
}

#[derive(Debug)]
pub struct TelegramClient {
    reqwest: Client,
    base_url: Url,
}

impl TelegramClient {
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, TelegramError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| TelegramError::InvalidUrl(format!("{base_url}: {e}")))?;
        // `join` replaces the last segment unless the path ends with `/`.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html"));

        let mut builder = ClientBuilder::new()
            .default_headers(headers)
            .user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            reqwest: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) async fn get<P: Serialize + ?Sized>(
        &self,
        url: Url,
        params: &P,
    ) -> reqwest::Result<(Url, String)> {
        let response = self
            .reqwest
            .get(url)
            .query(params)
            .send()
            .await?
            .error_for_status()?;

        let page_url = response.url().clone();
        let body = response.text().await?;

        Ok((page_url, body))
    }

    pub async fn call<M: method::Method>(
        &self,
        channel: &str,
        params: M::Params,
    ) -> Result<M::Response, TelegramError> {
        let url = self
            .base_url
            .join(&format!("{}/{}", M::PATH, channel))
            .map_err(|e| TelegramError::InvalidUrl(format!("{channel}: {e}")))?;

        let (page_url, body) = self.get(url, &params).await?;
        M::parse(&page_url, &body)
    }
}

#[async_trait]
impl ContentSource for TelegramClient {
    async fn fetch_page(
        &self,
        channel: &str,
        before: Option<u64>,
    ) -> Result<ChannelPage, TelegramError> {
        tracing::debug!(channel, ?before, "fetching channel page");

        let params = ChannelParams::builder().maybe_before(before).build();
        self.call::<ChannelPreview>(channel, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_base_url() {
        let result = TelegramClient::new("not a url", DEFAULT_USER_AGENT, None);

        assert!(matches!(result, Err(TelegramError::InvalidUrl(_))));
    }

    #[test]
    fn keeps_configured_base_url() {
        let client = TelegramClient::new(DEFAULT_BASE_URL, DEFAULT_USER_AGENT, None)
            .expect("client should build");

        assert_eq!(client.base_url().as_str(), "https://t.me/");
    }

    #[test]
    fn base_url_path_is_kept_as_prefix() {
        let client = TelegramClient::new("http://127.0.0.1:9/proxy", DEFAULT_USER_AGENT, None)
            .expect("client should build");

        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:9/proxy/");
        assert_eq!(
            client.base_url().join("s/chan").unwrap().as_str(),
            "http://127.0.0.1:9/proxy/s/chan"
        );
    }
}

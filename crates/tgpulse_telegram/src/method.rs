use crate::TelegramError;
use reqwest::Url;
use serde::Serialize;

pub trait Method {
    const PATH: &'static str;

    type Params: Serialize;
    type Response;

    /// `page_url` is the final URL after redirects.
    fn parse(page_url: &Url, body: &str) -> Result<Self::Response, TelegramError>;
}

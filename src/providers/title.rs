use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};

use crate::errors::ProviderError;
use crate::providers::{map_request_error, TitleResolver};

// @const: HTML title element
static TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap()
});

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Resolves titles by reading the `<title>` element of the linked page
#[derive(Debug, Clone)]
pub struct HtmlTitleResolver {
    client: Client,
}

impl HtmlTitleResolver {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Extract the text of the first `<title>` element.
    ///
    /// Whitespace runs collapse to single spaces and the common character
    /// references are decoded; an empty title counts as missing.
    pub fn extract_title(html: &str) -> Option<String> {
        let raw = TITLE_REGEX.captures(html)?.get(1)?.as_str();
        let collapsed = WHITESPACE_REGEX.replace_all(raw.trim(), " ");
        let title = decode_entities(&collapsed);
        if title.is_empty() {
            None
        } else {
            Some(title)
        }
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[async_trait]
impl TitleResolver for HtmlTitleResolver {
    async fn resolve_title(&self, url: &str) -> Result<String, ProviderError> {
        debug!("Resolving title of {}", url);

        let response = self.client.get(url).send().await.map_err(map_request_error)?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProviderError::HttpStatus {
                url: url.to_string(),
                status_code: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(map_request_error)?;

        // A page without a title still counts as resolved
        Ok(Self::extract_title(&body).unwrap_or_else(|| url.to_string()))
    }
}

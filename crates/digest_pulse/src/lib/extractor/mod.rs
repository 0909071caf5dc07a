//! # Content extraction
//!
//! Turns a url into [`ExtractedContent`]: fetch (directly, escalating once to
//! the rendering proxy when blocked), strip boilerplate, keep the main text and
//! enforce the length bounds.

pub mod fetcher;
pub mod readability;

use std::future::Future;

use crate::{
    links::{classify_link, host_matches},
    ContentOrigin, ExtractedContent, Result, SummarizerError,
};

pub use fetcher::{FetchError, FetchedPage, HttpPageFetcher, PageFetcher};

/// Status some sites answer with instead of 403 when they detect a bot
pub const SOFT_BLOCK_STATUS: u16 = 999;

pub trait ContentExtractor {
    fn extract_content(&self, url: &str) -> impl Future<Output = Result<ExtractedContent>> + Send;
}

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Rendering proxy credential. Without it blocked pages fail outright.
    pub proxy_api_key: Option<String>,
    /// Hosts fetched through the proxy straight away when a key is present
    pub proxied_domains: Vec<String>,
    /// Hosts whose whole body text is kept instead of the scored main block
    pub literal_domains: Vec<String>,
    pub min_content_length: usize,
    pub max_content_length: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        let hostile = vec!["linkedin.com".to_string(), "lnkd.in".to_string()];
        Self {
            proxy_api_key: None,
            proxied_domains: hostile.clone(),
            literal_domains: hostile,
            min_content_length: 200,
            max_content_length: 50_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArticleExtractor<F> {
    fetcher: F,
    config: ExtractorConfig,
}

impl<F: PageFetcher + Sync> ArticleExtractor<F> {
    pub fn new(fetcher: F, config: ExtractorConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    fn proxy_key(&self) -> Option<&str> {
        self.config
            .proxy_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let proxy_key = self.proxy_key();

        if let Some(key) = proxy_key {
            if host_matches(url, &self.config.proxied_domains) {
                tracing::info!(url, "Host is known to block scrapers, using proxy");
                return self.fetch_proxied(url, key).await;
            }
        }

        let page = self.fetcher.fetch(url).await?;

        match (page.status, proxy_key) {
            (200..=299, _) => Ok(page.body),
            (403, Some(key)) => {
                tracing::warn!(url, "Access denied (403), escalating to proxy");
                self.fetch_proxied(url, key).await
            }
            (403, None) => Err(SummarizerError::NetworkError("Access denied (403)".into())),
            (404, _) => Err(SummarizerError::NetworkError("Page not found (404)".into())),
            (SOFT_BLOCK_STATUS, Some(key)) => {
                tracing::warn!(url, "Soft block ({SOFT_BLOCK_STATUS}), escalating to proxy");
                self.fetch_proxied(url, key).await
            }
            (status, _) if status >= 500 => Err(SummarizerError::NetworkError(format!(
                "Server error ({status})"
            ))),
            (status, _) => Err(SummarizerError::NetworkError(format!(
                "Unexpected HTTP status ({status})"
            ))),
        }
    }

    async fn fetch_proxied(&self, url: &str, key: &str) -> Result<String> {
        let page = self.fetcher.fetch_via_proxy(url, key).await?;

        if page.status == 200 {
            Ok(page.body)
        } else {
            tracing::error!(url, status = page.status, "Proxy fetch rejected");
            Err(SummarizerError::NetworkError(format!(
                "Proxy error ({}): {}",
                page.status,
                page.body.trim()
            )))
        }
    }

    /// Extracts, validates and bounds the text of an already fetched page
    pub fn process_html(&self, html: &str, url: &str) -> Result<ExtractedContent> {
        let literal = host_matches(url, &self.config.literal_domains);
        let readable = readability::extract_readable(html, literal);

        let length = readable.text.chars().count();
        if length < self.config.min_content_length {
            tracing::warn!(url, length, "Extracted content too short");
            return Err(SummarizerError::ParsingError(format!(
                "Content too short or protected ({length} chars)"
            )));
        }

        let max = self.config.max_content_length;
        let was_truncated = length > max;
        let text = if was_truncated {
            tracing::info!(url, length, max, "Truncating extracted content");
            readable.text.chars().take(max).collect()
        } else {
            readable.text
        };

        Ok(ExtractedContent {
            text,
            title: readable.title,
            source_url: url.to_string(),
            was_truncated,
            origin: ContentOrigin::Web(classify_link(url)),
        })
    }
}

impl<F: PageFetcher + Sync> ContentExtractor for ArticleExtractor<F> {
    #[tracing::instrument(skip(self))]
    async fn extract_content(&self, url: &str) -> Result<ExtractedContent> {
        let html = self.fetch_html(url).await?;
        self.process_html(&html, url)
    }
}

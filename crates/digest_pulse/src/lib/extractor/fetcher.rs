use std::{future::Future, time::Duration};

use reqwest::{header, Client};

use crate::SummarizerError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(30);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);
/// Js rendering behind the proxy is slow
const PROXY_TIMEOUT: Duration = Duration::from_secs(90);

pub const DEFAULT_PROXY_URL: &str = "https://api.zenrows.com/v1/";

/// Raw response of a page fetch, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Connection timeout. Site may be slow or blocking requests.")]
    ConnectTimeout,
    #[error("Request timeout. Site took too long to respond.")]
    RequestTimeout,
    #[error("Request failed: {0}")]
    Transport(String),
}

// the proxy url carries the api key in its query, so urls never reach the message
impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() && e.is_connect() {
            FetchError::ConnectTimeout
        } else if e.is_timeout() {
            FetchError::RequestTimeout
        } else {
            FetchError::Transport(e.without_url().to_string())
        }
    }
}

impl From<FetchError> for SummarizerError {
    fn from(e: FetchError) -> Self {
        SummarizerError::NetworkError(e.to_string())
    }
}

pub trait PageFetcher {
    /// Plain GET of `url` with browser-like headers
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;

    /// GET of `url` through the rendering proxy authenticated with `api_key`
    fn fetch_via_proxy(
        &self,
        url: &str,
        api_key: &str,
    ) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
    cookie: Option<String>,
    proxy_url: String,
}

impl HttpPageFetcher {
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7"),
        );
        headers.insert(
            "sec-ch-ua",
            header::HeaderValue::from_static(
                r#""Not_A Brand";v="8", "Chromium";v="120", "Google Chrome";v="120""#,
            ),
        );
        headers.insert("sec-ch-ua-mobile", header::HeaderValue::from_static("?0"));
        headers.insert("sec-fetch-dest", header::HeaderValue::from_static("document"));
        headers.insert("sec-fetch-mode", header::HeaderValue::from_static("navigate"));
        headers.insert("sec-fetch-site", header::HeaderValue::from_static("none"));
        headers.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            header::HeaderValue::from_static("1"),
        );

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            cookie: None,
            proxy_url: DEFAULT_PROXY_URL.into(),
        })
    }

    /// Cookie sent with direct fetches, e.g. a session for a site that gates content
    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn with_proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = url.into();
        self
    }

    async fn read(&self, request: reqwest::RequestBuilder) -> Result<FetchedPage, FetchError> {
        let resp = request.send().await?;
        let status = resp.status().as_u16();

        let body = tokio::time::timeout(READ_TIMEOUT, resp.text())
            .await
            .map_err(|_| FetchError::RequestTimeout)??;

        Ok(FetchedPage { status, body })
    }
}

impl PageFetcher for HttpPageFetcher {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let mut request = self.client.get(url);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }

        self.read(request)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Direct fetch failed"))
    }

    #[tracing::instrument(skip(self, api_key))]
    async fn fetch_via_proxy(&self, url: &str, api_key: &str) -> Result<FetchedPage, FetchError> {
        let request = self
            .client
            .get(&self.proxy_url)
            .query(&[
                ("apikey", api_key),
                ("url", url),
                ("js_render", "true"),
                ("premium_proxy", "true"),
            ])
            .timeout(PROXY_TIMEOUT);

        self.read(request)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Proxy fetch failed"))
    }
}

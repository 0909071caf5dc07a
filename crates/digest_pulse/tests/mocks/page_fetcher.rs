use digest_pulse::{FetchError, FetchedPage, PageFetcher};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockPageFetcher {
    pub direct: Result<FetchedPage, FetchError>,
    pub proxy: Result<FetchedPage, FetchError>,
    pub direct_calls: Arc<Mutex<Vec<String>>>,
    /// (url, api key) pairs
    pub proxy_calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockPageFetcher {
    pub fn new(status: u16, body: &str) -> Self {
        Self::failing(FetchError::Transport("unused".into()))
            .with_direct(Ok(FetchedPage::new(status, body)))
    }

    pub fn failing(error: FetchError) -> Self {
        Self {
            direct: Err(error),
            proxy: Err(FetchError::Transport("proxy not stubbed".into())),
            direct_calls: Arc::new(Mutex::new(Vec::new())),
            proxy_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_direct(mut self, direct: Result<FetchedPage, FetchError>) -> Self {
        self.direct = direct;
        self
    }

    pub fn with_proxy(mut self, status: u16, body: &str) -> Self {
        self.proxy = Ok(FetchedPage::new(status, body));
        self
    }
}

impl PageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.direct_calls.lock().unwrap().push(url.to_string());
        self.direct.clone()
    }

    async fn fetch_via_proxy(&self, url: &str, api_key: &str) -> Result<FetchedPage, FetchError> {
        self.proxy_calls
            .lock()
            .unwrap()
            .push((url.to_string(), api_key.to_string()));
        self.proxy.clone()
    }
}

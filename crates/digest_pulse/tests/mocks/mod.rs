pub mod downloader;
pub mod extractor;
pub mod orchestrator;
pub mod page_fetcher;
pub mod summarizer;
pub mod transcriber;

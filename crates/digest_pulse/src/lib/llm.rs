pub mod openai;
pub mod prompts;
pub mod summarizer;
pub mod transcriber;

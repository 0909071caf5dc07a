use std::{sync::Arc, time::Duration};

use clap::Parser;
use digest_pulse::{
    config::BotConfig,
    openai::OpenAIClient,
    telegram::{BotController, TelegramClient},
    tracing::init_tracing_subscriber,
    ArticleExtractor, HttpPageFetcher, SummaryProcessor, VoiceProcessorBuilder,
};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let config = BotConfig::parse();
    init_tracing_subscriber()?;

    // shared by the OpenAI and Telegram clients; getUpdates sets its own timeout
    let api_client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(120))
        .build()?;

    //XXX: one client serves summaries and transcription, so it is cloned into both
    let openai = OpenAIClient::new(&config.openai_key)
        .with_http_client(api_client.clone())
        .with_model(&config.openai_model)
        .with_language(&config.transcription_language)
        .with_output_language(&config.summary_language)
        .with_max_input_chars(config.ai_max_input_chars);

    let fetcher =
        HttpPageFetcher::new(&config.user_agent)?.with_cookie(config.scraper_cookie.clone());
    let extractor = ArticleExtractor::new(fetcher, config.extractor_config());
    let summaries = SummaryProcessor::new(extractor, openai.clone());

    let telegram = TelegramClient::new(&config.bot_token, api_client)
        .with_max_file_bytes(config.max_audio_bytes());

    let voice = VoiceProcessorBuilder::new()
        .downloader(telegram.clone())
        .transcriber(openai)
        .orchestrator(summaries.clone())
        .short_text_threshold(config.short_text_threshold)
        .max_text_length(config.max_text_length)
        .build();

    tracing::info!(
        model = %config.openai_model,
        proxy_enabled = config.extractor_config().proxy_api_key.is_some(),
        "Starting digest-pulse"
    );

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutdown signal received");
        signal.cancel();
    });

    let bot = Arc::new(BotController::new(
        telegram,
        summaries,
        voice,
        config.poll_timeout,
    ));
    bot.run(shutdown).await;

    Ok(())
}

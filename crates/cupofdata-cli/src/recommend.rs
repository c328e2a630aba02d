//! The `cupofdata <brand>` run: list the board, fetch matching articles, rank drinks.

use std::sync::Arc;
use std::time::Duration;

use cupofdata_core::{load_dictionary, AppConfig, KeywordDictionary};
use cupofdata_extract::{BrandPipeline, Capabilities, FixedDelay, PipelineOptions};
use cupofdata_llm::{LlmConfig, OpenAiClassifier};
use cupofdata_ptt::{select_targets, PttClient};

use crate::output;

/// Base delay for PTT retry back-off.
const RETRY_BACKOFF_BASE_MS: u64 = 1_000;

/// # Errors
///
/// Returns an error if the dictionary file cannot be loaded, an HTTP client
/// cannot be built, or the board's newest index page cannot be found.
/// Individual index pages and articles that fail are skipped.
pub(crate) async fn run_recommend(
    config: &AppConfig,
    brand: &str,
    pages: u32,
    limit: usize,
) -> anyhow::Result<()> {
    let dictionary = match &config.dictionary_path {
        Some(path) => load_dictionary(path)?,
        None => KeywordDictionary::builtin(),
    };
    let caps = build_capabilities(config)?;
    tracing::info!(brand, ?caps, "capabilities configured");

    let client = PttClient::new(
        &config.ptt_base_url,
        &config.ptt_board,
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        RETRY_BACKOFF_BASE_MS,
    )?;

    let rows = client
        .list_recent(pages, Duration::from_millis(config.rate_limit_ms))
        .await?;
    let targets = select_targets(&rows, brand, limit);
    tracing::info!(
        board = client.board(),
        listed = rows.len(),
        matched = targets.len(),
        "board scanned"
    );

    if targets.is_empty() {
        println!("{}", output::no_articles(brand, client.board()));
        return Ok(());
    }

    let options = PipelineOptions {
        dictionary,
        known_brands: config.known_brands.clone(),
    };
    let pipeline = BrandPipeline::new(brand, options, caps);
    let ids: Vec<&str> = targets.iter().map(|row| row.url.as_str()).collect();
    let report = pipeline.analyze_from_source(&client, &ids).await;

    for line in output::render_report(&report) {
        println!("{line}");
    }
    Ok(())
}

/// Every classifier capability when an API key is configured, none otherwise.
/// External calls are paced by `rate_limit_ms` and bounded by `call_timeout_secs`.
fn build_capabilities(config: &AppConfig) -> anyhow::Result<Capabilities> {
    let mut caps = Capabilities {
        hooks: Arc::new(FixedDelay(Duration::from_millis(config.rate_limit_ms))),
        call_timeout: Duration::from_secs(config.call_timeout_secs),
        ..Capabilities::none()
    };

    let Some(llm_config) = LlmConfig::from_app_config(config) else {
        tracing::info!("OPENAI_API_KEY not set; running keyword-only analysis");
        return Ok(caps);
    };

    let classifier = Arc::new(OpenAiClassifier::new(llm_config)?);
    tracing::info!(model = classifier.model(), "classifier enabled");
    caps.entity_extractor = Some(classifier.clone());
    caps.relevance = Some(classifier.clone());
    caps.segmenter = Some(classifier.clone());
    caps.opinion = Some(classifier.clone());
    caps.summarizer = Some(classifier);
    Ok(caps)
}

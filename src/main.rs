//! Credit Scoring Pipeline - Main Entry Point
//!
//! Consumes loan scoring requests from NATS, resolves a scoring tier, and
//! publishes score events. Supports parallel request processing.

use anyhow::Result;
use credit_scoring_pipeline::{
    config::AppConfig,
    consumer::ScoreRequestConsumer,
    metrics::{MetricsReporter, ScoringMetrics},
    models::ModelLoader,
    producer::ScoreEventProducer,
    scoring::{ScoringService, ScoringTier},
    types::{LoanRiskRequest, ScoreEvent},
};
use futures::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("credit_scoring_pipeline=info".parse()?),
        )
        .init();

    info!("Starting Credit Scoring Pipeline");

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");

    // Initialize metrics
    let metrics = Arc::new(ScoringMetrics::new());

    // Load the model bundle; an empty bundle still scores rule-based
    let bundle = Arc::new(ModelLoader::new(&config.models).load());
    info!(
        model_loaded = bundle.is_loaded(),
        version = %bundle.version(),
        "Model bundle published"
    );

    let service = Arc::new(ScoringService::new(
        bundle,
        config.scoring.enable_explanations,
    ));

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    // Initialize consumer and producer
    let consumer = ScoreRequestConsumer::new(client.clone(), &config.nats.request_subject);
    let producer = Arc::new(ScoreEventProducer::new(
        client.clone(),
        &config.nats.score_subject,
    ));

    let num_workers = config.pipeline.workers;
    info!(
        "Starting request processing loop with {} parallel workers",
        num_workers
    );
    info!("Listening on subject: {}", config.nats.request_subject);
    info!("Publishing scores to: {}", config.nats.score_subject);

    // Semaphore to limit concurrent processing
    let semaphore = Arc::new(Semaphore::new(num_workers));
    let processed_count = Arc::new(AtomicU64::new(0));

    // Start metrics reporter (prints summary every 30 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    // Process requests in parallel
    let mut subscription = consumer.subscribe().await?;

    while let Some(message) = subscription.next().await {
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break, // semaphore closed on shutdown
        };

        let service = service.clone();
        let producer = producer.clone();
        let metrics = metrics.clone();
        let processed_count = processed_count.clone();

        tokio::spawn(async move {
            match serde_json::from_slice::<LoanRiskRequest>(&message.payload) {
                Ok(request) => {
                    let wallet = request.wallet_address.clone();

                    let (result, tier) = service.score(&request);

                    metrics.record_score(
                        tier.as_str(),
                        std::time::Duration::from_millis(result.processing_time_ms),
                        result.credit_score,
                    );
                    if tier == ScoringTier::FallbackService {
                        metrics.record_degrade();
                    }

                    debug!(
                        wallet = %wallet,
                        credit_score = result.credit_score,
                        risk_level = ?result.risk_level,
                        tier = tier.as_str(),
                        "Request scored"
                    );

                    let event = ScoreEvent::new(wallet.clone(), result);
                    if let Err(e) = producer.publish(&event).await {
                        error!(
                            wallet = %wallet,
                            error = %e,
                            "Failed to publish score event"
                        );
                    }

                    let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;
                    if count % 100 == 0 {
                        let stats = metrics.get_processing_stats();
                        info!(
                            processed = count,
                            throughput = format!("{:.1} req/s", metrics.get_throughput()),
                            avg_latency_us = stats.mean_us,
                            "Processing milestone"
                        );
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to deserialize scoring request");
                }
            }

            drop(permit);
        });
    }

    info!("Pipeline shutting down...");
    metrics.print_summary();

    Ok(())
}

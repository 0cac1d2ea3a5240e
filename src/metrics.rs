//! Performance and degrade-event tracking for the scoring pipeline.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for scoring throughput and tier usage
pub struct ScoringMetrics {
    /// Total requests scored
    pub requests_scored: AtomicU64,
    /// Degrade events (model failure, explanation failure)
    pub degrade_events: AtomicU64,
    /// Scores by producing tier
    scores_by_tier: RwLock<HashMap<String, u64>>,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Credit score distribution buckets (100-wide)
    score_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ScoringMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            requests_scored: AtomicU64::new(0),
            degrade_events: AtomicU64::new(0),
            scores_by_tier: RwLock::new(HashMap::new()),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            score_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a scored request
    pub fn record_score(&self, tier: &str, processing_time: Duration, credit_score: u32) {
        self.requests_scored.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut by_tier) = self.scores_by_tier.write() {
            *by_tier.entry(tier.to_string()).or_insert(0) += 1;
        }

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // keep only the recent window
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        let bucket = ((credit_score / 100).min(9)) as usize;
        if let Ok(mut buckets) = self.score_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record a degrade event (a tier failed and a cheaper one took over)
    pub fn record_degrade(&self) {
        self.degrade_events.fetch_add(1, Ordering::Relaxed);
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let times = match self.processing_times.read() {
            Ok(times) => times,
            Err(_) => return ProcessingStats::default(),
        };
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
        }
    }

    /// Get current throughput (requests per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.requests_scored.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get scores by producing tier
    pub fn get_scores_by_tier(&self) -> HashMap<String, u64> {
        self.scores_by_tier
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let scored = self.requests_scored.load(Ordering::Relaxed);
        let degrades = self.degrade_events.load(Ordering::Relaxed);
        let processing = self.get_processing_stats();
        let by_tier = self.get_scores_by_tier();

        info!(
            requests = scored,
            throughput = format!("{:.1} req/s", self.get_throughput()),
            degrade_events = degrades,
            "scoring summary"
        );
        info!(
            mean_us = processing.mean_us,
            p50_us = processing.p50_us,
            p95_us = processing.p95_us,
            p99_us = processing.p99_us,
            "processing time"
        );
        for (tier, count) in &by_tier {
            let pct = if scored > 0 {
                (*count as f64 / scored as f64) * 100.0
            } else {
                0.0
            };
            info!(tier = %tier, count = count, pct = format!("{:.1}%", pct), "tier usage");
        }

        if let Ok(buckets) = self.score_buckets.read() {
            let total: u64 = buckets.iter().sum();
            if total > 0 {
                for (i, &count) in buckets.iter().enumerate() {
                    if count > 0 {
                        info!(
                            range = format!("{}-{}", i * 100, (i + 1) * 100),
                            count = count,
                            "credit score bucket"
                        );
                    }
                }
            }
        }
    }
}

impl Default for ScoringMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
}

/// Real-time metrics reporter that prints periodic summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<ScoringMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<ScoringMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

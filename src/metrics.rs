//! Request statistics for the prediction service.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Width of one predicted-price distribution bucket, in GBP
const PRICE_BUCKET_WIDTH: f64 = 10_000.0;

/// Number of price distribution buckets (last bucket is open-ended)
const PRICE_BUCKETS: usize = 10;

/// Metrics collector for the request pipeline
pub struct RequestMetrics {
    /// Total prediction requests received
    pub requests_total: AtomicU64,
    /// Successful predictions served
    pub predictions_total: AtomicU64,
    /// Requests rejected by the validator
    pub validation_failures: AtomicU64,
    /// Requests that reached the predictor and failed
    pub prediction_failures: AtomicU64,
    /// Requests rejected because the model was not ready
    pub rejected_not_ready: AtomicU64,
    /// End-to-end processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Predicted price distribution buckets (10k GBP wide)
    price_buckets: RwLock<[u64; PRICE_BUCKETS]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            predictions_total: AtomicU64::new(0),
            validation_failures: AtomicU64::new(0),
            prediction_failures: AtomicU64::new(0),
            rejected_not_ready: AtomicU64::new(0),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            price_buckets: RwLock::new([0; PRICE_BUCKETS]),
            start_time: Instant::now(),
        }
    }

    /// Record a request arriving at the prediction endpoint
    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful prediction
    pub fn record_prediction(&self, processing_time: Duration, price: f64) {
        self.predictions_total.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only the most recent samples
            if times.len() > 10_000 {
                times.drain(0..5_000);
            }
        }

        let bucket = ((price / PRICE_BUCKET_WIDTH) as usize).min(PRICE_BUCKETS - 1);
        if let Ok(mut buckets) = self.price_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    pub fn record_validation_failure(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_prediction_failure(&self) {
        self.prediction_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_not_ready(&self) {
        self.rejected_not_ready.fetch_add(1, Ordering::Relaxed);
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let times = self.processing_times.read().unwrap();
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
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Current throughput (requests per second since start)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.requests_total.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Seconds since the collector was created
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Point-in-time snapshot for the stats endpoint
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            predictions_total: self.predictions_total.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            prediction_failures: self.prediction_failures.load(Ordering::Relaxed),
            rejected_not_ready: self.rejected_not_ready.load(Ordering::Relaxed),
            uptime_seconds: self.uptime_seconds(),
            throughput_rps: self.get_throughput(),
            processing: self.get_processing_stats(),
            price_distribution: *self.price_buckets.read().unwrap(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Log a summary of current counters and latencies
    pub fn print_summary(&self) {
        let requests = self.requests_total.load(Ordering::Relaxed);
        let predictions = self.predictions_total.load(Ordering::Relaxed);
        let validation = self.validation_failures.load(Ordering::Relaxed);
        let failures = self.prediction_failures.load(Ordering::Relaxed);
        let processing = self.get_processing_stats();

        info!(
            requests = requests,
            predictions = predictions,
            validation_failures = validation,
            prediction_failures = failures,
            throughput = format!("{:.1} req/s", self.get_throughput()),
            mean_us = processing.mean_us,
            p95_us = processing.p95_us,
            p99_us = processing.p99_us,
            "Request metrics summary"
        );
    }
}

impl Default for RequestMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Serializable snapshot served by the stats endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub predictions_total: u64,
    pub validation_failures: u64,
    pub prediction_failures: u64,
    pub rejected_not_ready: u64,
    pub uptime_seconds: u64,
    pub throughput_rps: f64,
    pub processing: ProcessingStats,
    /// Predicted price counts in 10k GBP buckets, last bucket open-ended
    pub price_distribution: [u64; PRICE_BUCKETS],
    pub timestamp: String,
}

/// Periodic reporter that logs a metrics summary
pub struct MetricsReporter {
    metrics: std::sync::Arc<RequestMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<RequestMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting loop
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_recording() {
        let metrics = RequestMetrics::new();

        metrics.record_request();
        metrics.record_request();
        metrics.record_prediction(Duration::from_micros(120), 15_000.0);
        metrics.record_validation_failure();

        assert_eq!(metrics.requests_total.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.predictions_total.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.validation_failures.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_processing_stats() {
        let metrics = RequestMetrics::new();
        for us in [100, 200, 300, 400, 500] {
            metrics.record_prediction(Duration::from_micros(us), 10_000.0);
        }

        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.mean_us, 300);
        assert_eq!(stats.max_us, 500);
    }

    #[test]
    fn test_price_buckets() {
        let metrics = RequestMetrics::new();
        metrics.record_prediction(Duration::from_micros(100), 5_000.0); // bucket 0
        metrics.record_prediction(Duration::from_micros(100), 25_000.0); // bucket 2
        metrics.record_prediction(Duration::from_micros(100), 500_000.0); // clamped to last

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.price_distribution[0], 1);
        assert_eq!(snapshot.price_distribution[2], 1);
        assert_eq!(snapshot.price_distribution[PRICE_BUCKETS - 1], 1);
    }

    #[test]
    fn test_empty_stats_default() {
        let metrics = RequestMetrics::new();
        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.p99_us, 0);
    }
}

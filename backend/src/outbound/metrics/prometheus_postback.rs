//! Prometheus adapter for postback outcome metrics.
//!
//! Registers one counter with the registry served at `/metrics`.

use async_trait::async_trait;
use prometheus::{IntCounterVec, Opts, Registry};

use crate::domain::Aim;
use crate::domain::ports::{PostbackMetrics, PostbackMetricsError, PostbackRejection};

const ACCEPTED: &str = "accepted";
const REJECTED: &str = "rejected";

/// Prometheus-backed postback metrics recorder.
///
/// # Metric Specification
///
/// - **Name**: `postback_events_total`
/// - **Type**: Counter
/// - **Labels**:
///   - `outcome`: `accepted` or `rejected`
///   - `reason`: the aim (`reg`, `dep`, `dep_without_reg`) for accepted
///     events; `not_found`, `missing_parameters`, `invalid_aim`, or
///     `store_unavailable` for rejected ones
pub struct PrometheusPostbackMetrics {
    events_total: IntCounterVec,
}

impl PrometheusPostbackMetrics {
    /// Create and register metrics with the given registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let events_total = IntCounterVec::new(
            Opts::new("postback_events_total", "Postbacks received by outcome"),
            &["outcome", "reason"],
        )?;
        registry.register(Box::new(events_total.clone()))?;
        Ok(Self { events_total })
    }

    fn record(&self, outcome: &str, reason: &str) {
        self.events_total.with_label_values(&[outcome, reason]).inc();
    }
}

#[async_trait]
impl PostbackMetrics for PrometheusPostbackMetrics {
    async fn record_accepted(&self, aim: Aim) -> Result<(), PostbackMetricsError> {
        self.record(ACCEPTED, aim.as_text());
        Ok(())
    }

    async fn record_rejected(&self, reason: PostbackRejection) -> Result<(), PostbackMetricsError> {
        self.record(REJECTED, reason.as_label());
        Ok(())
    }
}

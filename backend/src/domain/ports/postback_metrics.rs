//! Domain port surface for recording postback outcomes.
//!
//! Lets the postback service report accepted and rejected events without
//! depending on a metrics backend. The Prometheus adapter lives behind the
//! `metrics` feature; everything else uses [`NoOpPostbackMetrics`].

use async_trait::async_trait;

use crate::domain::Aim;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording postback metrics.
    pub enum PostbackMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "postback metrics exporter failed: {message}",
    }
}

/// Why a postback was not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostbackRejection {
    /// No usable mapping for the source.
    NotFound,
    /// A mapped parameter was absent.
    MissingParameters,
    /// The aim value was not recognised.
    InvalidAim,
    /// The store failed while reading or writing.
    StoreUnavailable,
}

impl PostbackRejection {
    /// Metric label value.
    #[must_use]
    pub const fn as_label(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::MissingParameters => "missing_parameters",
            Self::InvalidAim => "invalid_aim",
            Self::StoreUnavailable => "store_unavailable",
        }
    }
}

/// Metrics recording port for postback outcomes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostbackMetrics: Send + Sync {
    /// Record an accepted postback.
    async fn record_accepted(&self, aim: Aim) -> Result<(), PostbackMetricsError>;

    /// Record a rejected postback.
    async fn record_rejected(&self, reason: PostbackRejection) -> Result<(), PostbackMetricsError>;
}

/// No-op implementation for when metrics are disabled or in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpPostbackMetrics;

#[async_trait]
impl PostbackMetrics for NoOpPostbackMetrics {
    async fn record_accepted(&self, _aim: Aim) -> Result<(), PostbackMetricsError> {
        Ok(())
    }

    async fn record_rejected(
        &self,
        _reason: PostbackRejection,
    ) -> Result<(), PostbackMetricsError> {
        Ok(())
    }
}

//! Postback domain service.
//!
//! Implements [`PostbackCommand`]: resolve the source mapping, validate the
//! request parameters against it, normalise the aim value, and insert one
//! record. Every outcome is reported to [`PostbackMetrics`]; recorder failures
//! are logged and otherwise ignored.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::domain::ports::{
    NoOpPostbackMetrics, PostbackCommand, PostbackMetrics, PostbackRejection, PostbackRequest,
    PostbackStore,
};
use crate::domain::{
    Error, ErrorCode, MappingResolver, PostbackRecord, PostbackValidationError,
};

struct Rejected {
    reason: PostbackRejection,
    error: Error,
}

impl Rejected {
    fn from_resolution(error: Error) -> Self {
        let reason = if error.code() == ErrorCode::NotFound {
            PostbackRejection::NotFound
        } else {
            PostbackRejection::StoreUnavailable
        };
        Self { reason, error }
    }

    fn from_validation(err: PostbackValidationError) -> Self {
        let reason = match &err {
            PostbackValidationError::MissingParameters { names } => {
                debug!(missing = ?names, "postback rejected");
                PostbackRejection::MissingParameters
            }
            PostbackValidationError::UnknownAim { parameter, value } => {
                debug!(parameter = %parameter, value = %value, "postback rejected");
                PostbackRejection::InvalidAim
            }
        };
        Self {
            reason,
            error: Error::invalid_request(err.to_string()),
        }
    }
}

/// Postback service implementing the driving port.
pub struct PostbackService<S, M = NoOpPostbackMetrics> {
    resolver: MappingResolver<S>,
    store: Arc<S>,
    metrics: Arc<M>,
}

impl<S, M> Clone for PostbackService<S, M> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            store: Arc::clone(&self.store),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<S> PostbackService<S, NoOpPostbackMetrics> {
    /// Create a service without metrics.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_metrics(store, Arc::new(NoOpPostbackMetrics))
    }
}

impl<S, M> PostbackService<S, M> {
    /// Create a service reporting outcomes to `metrics`.
    pub fn with_metrics(store: Arc<S>, metrics: Arc<M>) -> Self {
        Self {
            resolver: MappingResolver::new(Arc::clone(&store)),
            store,
            metrics,
        }
    }
}

impl<S, M> PostbackService<S, M>
where
    S: PostbackStore,
    M: PostbackMetrics,
{
    async fn handle(&self, request: PostbackRequest) -> Result<PostbackRecord, Rejected> {
        let PostbackRequest { source, parameters } = request;

        let mapping = self
            .resolver
            .resolve(&source)
            .await
            .map_err(Rejected::from_resolution)?;

        let record = PostbackRecord::from_parameters(source, &mapping, &parameters)
            .map_err(Rejected::from_validation)?;

        self.store.insert_postback(&record).await.map_err(|err| {
            let error = Error::internal(format!("postback insert failed: {err}"));
            error!(
                source = %record.source(),
                trace_id = error.trace_id().unwrap_or_default(),
                error = %error,
                "postback insert failed"
            );
            Rejected {
                reason: PostbackRejection::StoreUnavailable,
                error,
            }
        })?;

        Ok(record)
    }

    async fn report(&self, outcome: &Result<PostbackRecord, Rejected>) {
        let result = match outcome {
            Ok(record) => self.metrics.record_accepted(record.aim()).await,
            Err(rejected) => self.metrics.record_rejected(rejected.reason).await,
        };
        if let Err(err) = result {
            warn!(error = %err, "failed to record postback metrics");
        }
    }
}

#[async_trait]
impl<S, M> PostbackCommand for PostbackService<S, M>
where
    S: PostbackStore,
    M: PostbackMetrics,
{
    async fn record(&self, request: PostbackRequest) -> Result<PostbackRecord, Error> {
        let outcome = self.handle(request).await;
        self.report(&outcome).await;
        outcome.map_err(|rejected| rejected.error)
    }
}

#[cfg(test)]
#[path = "postback_service_tests.rs"]
mod tests;

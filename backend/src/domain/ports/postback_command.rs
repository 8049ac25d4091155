//! Driving port for recording postbacks.
//!
//! Inbound adapters hand the raw source segment and merged request
//! parameters to this port and translate the returned domain [`Error`] into
//! their transport's status codes.

use async_trait::async_trait;

use crate::domain::{Error, PostbackRecord, RequestParameters, SourceId};

/// Postback received from a partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostbackRequest {
    /// Source named by the request path.
    pub source: SourceId,
    /// Query and form parameters, first occurrence kept.
    pub parameters: RequestParameters,
}

impl PostbackRequest {
    /// Bundle a source with its parameters.
    pub fn new(source: SourceId, parameters: RequestParameters) -> Self {
        Self { source, parameters }
    }
}

/// Domain use-case port for accepting postbacks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostbackCommand: Send + Sync {
    /// Resolve the source mapping, validate, and persist one record.
    ///
    /// Returns the persisted record on success. Errors carry
    /// [`crate::domain::ErrorCode::InvalidRequest`] for client mistakes,
    /// [`crate::domain::ErrorCode::NotFound`] for unknown sources, and
    /// [`crate::domain::ErrorCode::InternalError`] for store failures.
    async fn record(&self, request: PostbackRequest) -> Result<PostbackRecord, Error>;
}

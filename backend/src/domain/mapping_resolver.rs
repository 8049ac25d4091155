//! Source mapping lookup.
//!
//! One store read per call. Zero and multiple matches both surface as
//! [`ErrorCode::NotFound`](crate::domain::ErrorCode::NotFound); the multiple
//! case is a configuration problem and is logged.

use std::sync::Arc;

use tracing::{error, warn};

use crate::domain::ports::{PostbackStore, PostbackStoreError};
use crate::domain::{Error, ParameterMapping, SourceId};

/// Resolves the parameter mapping configured for a source.
pub struct MappingResolver<S> {
    store: Arc<S>,
}

impl<S> Clone for MappingResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> MappingResolver<S> {
    /// Create a resolver reading from `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> MappingResolver<S>
where
    S: PostbackStore,
{
    /// Fetch the single mapping for `source`.
    ///
    /// # Errors
    /// [`ErrorCode::NotFound`](crate::domain::ErrorCode::NotFound) when the
    /// source has zero or several mappings,
    /// [`ErrorCode::InternalError`](crate::domain::ErrorCode::InternalError)
    /// when the store fails.
    pub async fn resolve(&self, source: &SourceId) -> Result<ParameterMapping, Error> {
        self.store
            .find_mapping(source)
            .await
            .map_err(|err| Self::map_store_error(source, err))
    }

    fn map_store_error(source: &SourceId, err: PostbackStoreError) -> Error {
        match err {
            PostbackStoreError::MappingNotFound { .. } => {
                Error::not_found(format!("no mapping for source {source}"))
            }
            PostbackStoreError::AmbiguousMapping { count, .. } => {
                warn!(source = %source, count, "multiple mappings configured for source");
                Error::not_found(format!("no unique mapping for source {source}"))
            }
            PostbackStoreError::Connection { message } | PostbackStoreError::Query { message } => {
                let error = Error::internal(format!("mapping lookup failed: {message}"));
                error!(
                    source = %source,
                    trace_id = error.trace_id().unwrap_or_default(),
                    error = %error,
                    "mapping lookup failed"
                );
                error
            }
        }
    }
}

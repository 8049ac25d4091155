//! Port abstraction for the relational store behind postback handling.
//!
//! The postback flow needs exactly two store operations: look up the mapping
//! configured for a source and insert one normalised record. Adapters keep
//! row-shape concerns to themselves and report failures through
//! [`PostbackStoreError`].

use async_trait::async_trait;

use crate::domain::{ParameterMapping, PostbackRecord, SourceId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by postback store adapters.
    pub enum PostbackStoreError {
        /// No mapping row exists for the source.
        MappingNotFound { source_id: String } =>
            "no mapping configured for source {source_id}",
        /// More than one mapping row exists for the source.
        AmbiguousMapping { source_id: String, count: usize } =>
            "{count} mappings configured for source {source_id}",
        /// Store connection could not be established.
        Connection { message: String } =>
            "postback store connection failed: {message}",
        /// Query or insert failed during execution.
        Query { message: String } =>
            "postback store query failed: {message}",
    }
}

/// Store operations consumed by the postback flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostbackStore: Send + Sync {
    /// Fetch the single mapping configured for `source`.
    ///
    /// Zero rows yield [`PostbackStoreError::MappingNotFound`]; more than one
    /// yields [`PostbackStoreError::AmbiguousMapping`].
    async fn find_mapping(&self, source: &SourceId)
    -> Result<ParameterMapping, PostbackStoreError>;

    /// Insert one postback record.
    async fn insert_postback(&self, record: &PostbackRecord) -> Result<(), PostbackStoreError>;
}

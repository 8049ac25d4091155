//! Port for bulk-loading source mappings.

use async_trait::async_trait;

use crate::domain::SourceMapping;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mapping repository adapters.
    pub enum MappingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "mapping repository connection failed: {message}",
        /// Insert failed; no rows from the batch were kept.
        Query { message: String } =>
            "mapping repository query failed: {message}",
    }
}

/// Write access to the `mapping` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Insert every mapping atomically and return how many rows were written.
    async fn insert_mappings(
        &self,
        mappings: &[SourceMapping],
    ) -> Result<usize, MappingRepositoryError>;
}

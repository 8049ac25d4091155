//! Mapping import domain service.
//!
//! Parses a CSV upload into [`SourceMapping`](crate::domain::SourceMapping)
//! rows and hands them to the repository as one batch. Parse problems are the
//! caller's fault; repository failures surface as
//! [`ErrorCode::NotImplemented`](crate::domain::ErrorCode::NotImplemented).

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::ports::{MappingImportCommand, MappingImportOutcome, MappingRepository};
use crate::domain::{Error, parse_mapping_csv};

/// Mapping import service implementing the driving port.
pub struct MappingImportService<R> {
    repository: Arc<R>,
}

impl<R> Clone for MappingImportService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> MappingImportService<R> {
    /// Create a service writing to `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> MappingImportCommand for MappingImportService<R>
where
    R: MappingRepository,
{
    async fn import_csv(&self, csv: &[u8]) -> Result<MappingImportOutcome, Error> {
        let mappings = parse_mapping_csv(csv).map_err(|err| Error::invalid_request(err.to_string()))?;

        let imported = self
            .repository
            .insert_mappings(&mappings)
            .await
            .map_err(|err| {
                let error = Error::not_implemented(format!("mapping import failed: {err}"));
                error!(
                    rows = mappings.len(),
                    trace_id = error.trace_id().unwrap_or_default(),
                    error = %error,
                    "mapping import failed"
                );
                error
            })?;

        info!(imported, "mapping import complete");
        Ok(MappingImportOutcome { imported })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MappingRepositoryError, MockMappingRepository};

    const CSV: &[u8] = b"source,user_id,code,aim\nacme,uid,clk,goal\nbeta,u,c,a\n";

    #[tokio::test]
    async fn imports_every_row_in_one_batch() {
        let mut repository = MockMappingRepository::new();
        repository
            .expect_insert_mappings()
            .times(1)
            .withf(|rows| rows.len() == 2 && rows[1].source.as_ref() == "beta")
            .returning(|rows| Ok(rows.len()));

        let service = MappingImportService::new(Arc::new(repository));
        let outcome = service.import_csv(CSV).await.expect("import succeeds");
        assert_eq!(outcome, MappingImportOutcome { imported: 2 });
    }

    #[tokio::test]
    async fn parse_errors_are_invalid_requests() {
        let mut repository = MockMappingRepository::new();
        repository.expect_insert_mappings().never();

        let service = MappingImportService::new(Arc::new(repository));
        let err = service.import_csv(b"").await.expect_err("empty upload");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Empty file");
    }

    #[tokio::test]
    async fn repository_failures_are_not_implemented() {
        let mut repository = MockMappingRepository::new();
        repository
            .expect_insert_mappings()
            .times(1)
            .returning(|_| Err(MappingRepositoryError::query("duplicate key")));

        let service = MappingImportService::new(Arc::new(repository));
        let err = service.import_csv(CSV).await.expect_err("store fails");
        assert_eq!(err.code(), ErrorCode::NotImplemented);
    }
}

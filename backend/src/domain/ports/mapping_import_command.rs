//! Driving port for bulk mapping imports.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::Error;

/// Result of a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MappingImportOutcome {
    /// Number of mapping rows written.
    pub imported: usize,
}

/// Domain use-case port for loading mappings from CSV.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingImportCommand: Send + Sync {
    /// Parse `csv` and insert every row in one transaction.
    async fn import_csv(&self, csv: &[u8]) -> Result<MappingImportOutcome, Error>;
}

//! In-process store used by tests and local tooling.
//!
//! Implements both [`PostbackStore`] and [`MappingRepository`] over a shared
//! `Mutex`, so a mapping imported through one port is visible to the other.
//! Mapping rows are kept as a list rather than keyed by source, matching the
//! `mapping` table: importing a source twice makes its lookup ambiguous.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    MappingRepository, MappingRepositoryError, PostbackStore, PostbackStoreError,
};
use crate::domain::{ParameterMapping, PostbackRecord, SourceId, SourceMapping};

#[derive(Debug, Default)]
struct Tables {
    mappings: Vec<SourceMapping>,
    postbacks: Vec<PostbackRecord>,
    failure: Option<String>,
}

/// Memory-backed implementation of the store ports.
///
/// # Examples
/// ```
/// use postback::domain::{ParameterMapping, SourceId, SourceMapping};
/// use postback::outbound::memory::InMemoryPostbackStore;
///
/// let source = SourceId::new("acme").expect("valid source");
/// let store = InMemoryPostbackStore::with_mappings([SourceMapping::new(
///     source,
///     ParameterMapping::new("uid", "clk", "goal"),
/// )]);
/// assert!(store.records().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryPostbackStore {
    tables: Mutex<Tables>,
}

impl InMemoryPostbackStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with `mappings`.
    pub fn with_mappings(mappings: impl IntoIterator<Item = SourceMapping>) -> Self {
        let store = Self::default();
        store.lock().mappings.extend(mappings);
        store
    }

    /// Make every subsequent store call fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.lock().failure = Some(message.into());
    }

    /// Snapshot of the persisted postbacks in insertion order.
    #[must_use]
    pub fn records(&self) -> Vec<PostbackRecord> {
        self.lock().postbacks.clone()
    }

    /// Snapshot of the stored mappings in insertion order.
    #[must_use]
    pub fn mappings(&self) -> Vec<SourceMapping> {
        self.lock().mappings.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // Every mutation is a single push or extend; poisoned data is intact.
        self.tables
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl PostbackStore for InMemoryPostbackStore {
    async fn find_mapping(
        &self,
        source: &SourceId,
    ) -> Result<ParameterMapping, PostbackStoreError> {
        let tables = self.lock();
        if let Some(message) = &tables.failure {
            return Err(PostbackStoreError::query(message.as_str()));
        }

        let mut matches = tables
            .mappings
            .iter()
            .filter(|row| &row.source == source)
            .map(|row| row.mapping.clone());
        match (matches.next(), matches.count()) {
            (None, _) => Err(PostbackStoreError::mapping_not_found(source.as_ref())),
            (Some(mapping), 0) => Ok(mapping),
            (Some(_), rest) => Err(PostbackStoreError::ambiguous_mapping(
                source.as_ref(),
                rest + 1,
            )),
        }
    }

    async fn insert_postback(&self, record: &PostbackRecord) -> Result<(), PostbackStoreError> {
        let mut tables = self.lock();
        if let Some(message) = &tables.failure {
            return Err(PostbackStoreError::query(message.as_str()));
        }
        tables.postbacks.push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl MappingRepository for InMemoryPostbackStore {
    async fn insert_mappings(
        &self,
        mappings: &[SourceMapping],
    ) -> Result<usize, MappingRepositoryError> {
        let mut tables = self.lock();
        if let Some(message) = &tables.failure {
            return Err(MappingRepositoryError::query(message.as_str()));
        }
        tables.mappings.extend_from_slice(mappings);
        Ok(mappings.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Aim;
    use rstest::{fixture, rstest};

    fn source(value: &str) -> SourceId {
        SourceId::new(value).expect("valid source")
    }

    #[fixture]
    fn store() -> InMemoryPostbackStore {
        InMemoryPostbackStore::with_mappings([SourceMapping::new(
            source("acme"),
            ParameterMapping::new("uid", "clk", "goal"),
        )])
    }

    #[rstest]
    #[tokio::test]
    async fn finds_configured_mapping(store: InMemoryPostbackStore) {
        let mapping = store.find_mapping(&source("acme")).await.expect("mapping");
        assert_eq!(mapping, ParameterMapping::new("uid", "clk", "goal"));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_source_is_not_found(store: InMemoryPostbackStore) {
        let err = store
            .find_mapping(&source("unknown"))
            .await
            .expect_err("no mapping");
        assert_eq!(err, PostbackStoreError::mapping_not_found("unknown"));
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_import_makes_lookup_ambiguous(store: InMemoryPostbackStore) {
        let duplicate = SourceMapping::new(source("acme"), ParameterMapping::new("u", "c", "a"));
        store
            .insert_mappings(&[duplicate])
            .await
            .expect("import succeeds");

        let err = store.find_mapping(&source("acme")).await.expect_err("ambiguous");
        assert_eq!(err, PostbackStoreError::ambiguous_mapping("acme", 2_usize));
    }

    #[rstest]
    #[tokio::test]
    async fn inserts_are_kept_in_order(store: InMemoryPostbackStore) {
        let first = PostbackRecord::new("1", "a", Aim::Registration, source("acme"));
        let second = PostbackRecord::new("2", "b", Aim::Deposit, source("acme"));
        store.insert_postback(&first).await.expect("insert");
        store.insert_postback(&second).await.expect("insert");

        assert_eq!(store.records(), vec![first, second]);
    }

    #[rstest]
    #[tokio::test]
    async fn injected_failure_applies_to_every_port(store: InMemoryPostbackStore) {
        store.fail_with("disk full");

        assert!(store.find_mapping(&source("acme")).await.is_err());
        let record = PostbackRecord::new("1", "a", Aim::Registration, source("acme"));
        assert!(store.insert_postback(&record).await.is_err());
        assert_eq!(
            store.insert_mappings(&[]).await,
            Err(MappingRepositoryError::query("disk full"))
        );
        assert!(store.records().is_empty());
    }
}

//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and only see the driving
//! ports, so tests can swap in mocks or the in-memory store.

use std::sync::Arc;

use crate::domain::ports::{MappingImportCommand, PostbackCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Postback use-case.
    pub postbacks: Arc<dyn PostbackCommand>,
    /// Mapping import use-case.
    pub mapping_import: Arc<dyn MappingImportCommand>,
}

impl HttpState {
    /// Bundle the driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use postback::domain::{MappingImportService, PostbackService};
    /// use postback::inbound::http::state::HttpState;
    /// use postback::outbound::memory::InMemoryPostbackStore;
    ///
    /// let store = Arc::new(InMemoryPostbackStore::new());
    /// let state = HttpState::new(
    ///     Arc::new(PostbackService::new(store.clone())),
    ///     Arc::new(MappingImportService::new(store)),
    /// );
    /// let _postbacks = state.postbacks.clone();
    /// ```
    pub fn new(
        postbacks: Arc<dyn PostbackCommand>,
        mapping_import: Arc<dyn MappingImportCommand>,
    ) -> Self {
        Self {
            postbacks,
            mapping_import,
        }
    }
}

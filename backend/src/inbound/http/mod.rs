//! HTTP inbound adapter exposing the postback, mapping import, and health
//! endpoints.

use actix_web::web;

pub mod error;
pub mod health;
pub mod mapping;
pub mod postback;
pub mod state;

pub use error::ApiResult;

/// Register every HTTP route.
///
/// The caller supplies [`state::HttpState`] and [`health::HealthState`] as
/// app data. The catch-all `/{source}` route is registered last.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::{App, web};
/// use postback::domain::{MappingImportService, PostbackService};
/// use postback::inbound::http::{configure, health::HealthState, state::HttpState};
/// use postback::outbound::memory::InMemoryPostbackStore;
///
/// let store = Arc::new(InMemoryPostbackStore::new());
/// let state = HttpState::new(
///     Arc::new(PostbackService::new(store.clone())),
///     Arc::new(MappingImportService::new(store)),
/// );
/// let _app = App::new()
///     .app_data(web::Data::new(state))
///     .app_data(web::Data::new(HealthState::new()))
///     .configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::ready)
        .service(health::live)
        .service(mapping::import_mapping_resource())
        .service(postback::receive_postback);
}

//! Shared app wiring for endpoint tests.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use postback::Trace;
use postback::domain::{MappingImportService, ParameterMapping, PostbackService, SourceId, SourceMapping};
use postback::inbound::http::configure;
use postback::inbound::http::health::HealthState;
use postback::inbound::http::state::HttpState;
use postback::outbound::memory::InMemoryPostbackStore;

/// Mapping used by the partner scenarios: `acme` sends `uid`, `clk`, `goal`.
pub fn acme_mapping() -> SourceMapping {
    SourceMapping::new(
        SourceId::new("acme").expect("valid source"),
        ParameterMapping::new("uid", "clk", "goal"),
    )
}

/// Full route table over `store`, wrapped in [`Trace`].
pub async fn init_app(
    store: Arc<InMemoryPostbackStore>,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let state = HttpState::new(
        Arc::new(PostbackService::new(Arc::clone(&store))),
        Arc::new(MappingImportService::new(store)),
    );
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(web::Data::new(HealthState::new()))
            .wrap(Trace)
            .configure(configure),
    )
    .await
}

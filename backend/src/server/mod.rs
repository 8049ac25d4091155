//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod settings;

pub use config::ServerConfig;
pub use settings::ServerSettings;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use postback::Trace;
#[cfg(debug_assertions)]
use postback::doc::ApiDoc;
use postback::domain::ports::PostbackCommand;
use postback::domain::{MappingImportService, PostbackService};
use postback::inbound::http::configure;
use postback::inbound::http::health::HealthState;
use postback::inbound::http::state::HttpState;
#[cfg(feature = "metrics")]
use postback::outbound::metrics::PrometheusPostbackMetrics;
use postback::outbound::persistence::{DieselMappingRepository, DieselPostbackStore};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Build the postback command, reporting to Prometheus when a registry is
/// configured.
///
/// # Errors
/// Returns [`std::io::Error`] if the postback counters cannot be registered.
#[cfg(feature = "metrics")]
fn build_postback_command(config: &ServerConfig) -> std::io::Result<Arc<dyn PostbackCommand>> {
    let store = Arc::new(DieselPostbackStore::new(config.db_pool.clone()));
    match &config.prometheus {
        Some(prom) => {
            let metrics = PrometheusPostbackMetrics::new(&prom.registry).map_err(|e| {
                std::io::Error::other(format!("postback metrics registration failed: {e}"))
            })?;
            Ok(Arc::new(PostbackService::with_metrics(
                store,
                Arc::new(metrics),
            )))
        }
        None => Ok(Arc::new(PostbackService::new(store))),
    }
}

/// Build the postback command without metrics.
#[cfg(not(feature = "metrics"))]
fn build_postback_command(config: &ServerConfig) -> std::io::Result<Arc<dyn PostbackCommand>> {
    Ok(Arc::new(PostbackService::new(Arc::new(
        DieselPostbackStore::new(config.db_pool.clone()),
    ))))
}

fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let postbacks = build_postback_command(config)?;
    let mapping_import = Arc::new(MappingImportService::new(Arc::new(
        DieselMappingRepository::new(config.db_pool.clone()),
    )));
    Ok(web::Data::new(HttpState::new(postbacks, mapping_import)))
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace);

    // Registered ahead of the `/{source}` catch-all.
    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/api-docs/ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app.configure(configure)
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Marks `health_state` ready once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or registering
/// metrics fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config)?;
    let ServerConfig {
        bind_addr,
        db_pool: _,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(server_health_state.clone(), http_state.clone());

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

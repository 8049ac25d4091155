//! Prometheus request metrics as an optional middleware layer.
//!
//! `App::wrap` needs one concrete type whether or not the exporter came up,
//! so both arms box the inner service.

use std::sync::Arc;

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::PrometheusMetrics;
use futures_util::future::LocalBoxFuture;

#[derive(Clone)]
pub(crate) enum MetricsLayer {
    Enabled(Arc<PrometheusMetrics>),
    Disabled,
}

impl MetricsLayer {
    pub(crate) fn from_option(metrics: Option<PrometheusMetrics>) -> Self {
        metrics.map_or(Self::Disabled, |metrics| Self::Enabled(Arc::new(metrics)))
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        match self {
            Self::Enabled(metrics) => {
                let transform = Compat::new(PrometheusMetrics::clone(metrics)).new_transform(service);
                Box::pin(async move { Ok(boxed::service(transform.await?)) })
            }
            Self::Disabled => {
                let passthrough = service.map(|res: ServiceResponse<B>| res.map_into_boxed_body());
                Box::pin(async move { Ok(boxed::service(passthrough)) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use actix_web_prom::PrometheusMetricsBuilder;

    async fn status_of(layer: MetricsLayer, uri: &str) -> StatusCode {
        let app = test::init_service(
            App::new()
                .wrap(layer)
                .route("/acme", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        test::call_service(&app, test::TestRequest::get().uri(uri).to_request())
            .await
            .status()
    }

    #[actix_web::test]
    async fn disabled_layer_passes_requests_through() {
        assert_eq!(status_of(MetricsLayer::from_option(None), "/acme").await, StatusCode::OK);
        assert_eq!(
            status_of(MetricsLayer::from_option(None), "/metrics").await,
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn enabled_layer_serves_the_exporter() {
        let prometheus = PrometheusMetricsBuilder::new("postback_test")
            .endpoint("/metrics")
            .build()
            .expect("metrics builder");
        let layer = MetricsLayer::from_option(Some(prometheus));
        assert_eq!(status_of(layer, "/metrics").await, StatusCode::OK);
    }
}

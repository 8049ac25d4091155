//! OpenAPI documentation.
//!
//! [`ApiDoc`] registers the postback receiver, the mapping import endpoint,
//! and the health probes. Debug builds serve it through Swagger UI and the
//! `openapi-dump` binary prints it for external tooling.

use utoipa::OpenApi;

use crate::inbound::http::mapping::MappingImportResponseBody;

/// OpenAPI document for the HTTP API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Postback receiver",
        description = "Records conversion postbacks from partner sources."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::postback::receive_postback,
        crate::inbound::http::mapping::import_mapping,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(MappingImportResponseBody)),
    tags(
        (name = "postback", description = "Partner conversion callbacks"),
        (name = "mapping", description = "Per-source parameter mappings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postback_path_accepts_get_and_post() {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get("/{source}").expect("postback path");
        assert!(item.get.is_some(), "GET should be documented");
        assert!(item.post.is_some(), "POST should be documented");
    }

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in ["/admin/mapping", "/health/ready", "/health/live"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn import_response_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.contains_key("MappingImportResponseBody"));
    }
}

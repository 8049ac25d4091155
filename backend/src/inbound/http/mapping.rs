//! Bulk mapping import.
//!
//! ```text
//! POST /admin/mapping
//! Content-Type: text/csv
//!
//! source,user_id,code,aim
//! acme,uid,clk,goal
//! ```

use actix_web::{Resource, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::MappingImportOutcome;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Largest accepted upload. Other routes keep actix's default body limit.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Response payload for a completed import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MappingImportResponseBody {
    /// Number of mapping rows written.
    #[schema(example = 2)]
    pub imported: usize,
}

impl From<MappingImportOutcome> for MappingImportResponseBody {
    fn from(value: MappingImportOutcome) -> Self {
        Self {
            imported: value.imported,
        }
    }
}

/// Load source mappings from a CSV upload.
///
/// The header row names the `source`, `user_id`, `code`, and `aim` columns in
/// any order. All rows are written in one transaction.
#[utoipa::path(
    post,
    path = "/admin/mapping",
    request_body(
        content = String,
        content_type = "text/csv",
        description = "Header row followed by one mapping per line"
    ),
    responses(
        (status = 200, description = "Mappings imported", body = MappingImportResponseBody),
        (
            status = 400,
            description = "Empty or malformed upload",
            body = String,
            content_type = "text/plain",
            example = json!("Empty file")
        ),
        (status = 501, description = "The store rejected the batch")
    ),
    tags = ["mapping"],
    operation_id = "importMapping"
)]
pub async fn import_mapping(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<web::Json<MappingImportResponseBody>> {
    let outcome = state.mapping_import.import_csv(&body).await?;
    Ok(web::Json(MappingImportResponseBody::from(outcome)))
}

/// `POST /admin/mapping` with the upload limit raised to [`MAX_UPLOAD_BYTES`].
#[must_use]
pub fn import_mapping_resource() -> Resource {
    web::resource("/admin/mapping")
        .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
        .route(web::post().to(import_mapping))
}

//! Postback receiver.
//!
//! ```text
//! GET  /{source}?uid=42&clk=abc&goal=dep
//! POST /{source}    (query string and/or form-encoded body)
//! ```
//!
//! Parameters from the query string are read before form fields, and the
//! first value for a repeated name wins.

use actix_web::http::header;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, route, web};

use crate::domain::ports::PostbackRequest;
use crate::domain::{Error, RequestParameters, SourceId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

fn parse_pairs(raw: &str, origin: &str) -> Result<Vec<(String, String)>, Error> {
    web::Query::<Vec<(String, String)>>::from_query(raw)
        .map(web::Query::into_inner)
        .map_err(|err| Error::invalid_request(format!("Malformed {origin}: {err}")))
}

fn is_form(req: &HttpRequest) -> bool {
    req.headers().contains_key(header::CONTENT_TYPE)
        && req.content_type().eq_ignore_ascii_case(FORM_CONTENT_TYPE)
}

/// Merge query and form parameters, query first.
fn collect_parameters(req: &HttpRequest, body: &[u8]) -> Result<RequestParameters, Error> {
    let mut parameters =
        RequestParameters::from_pairs(parse_pairs(req.query_string(), "query string")?);

    if is_form(req) && !body.is_empty() {
        let raw = std::str::from_utf8(body)
            .map_err(|_| Error::invalid_request("Malformed form body: not valid UTF-8"))?;
        parameters.extend(parse_pairs(raw, "form body")?);
    }
    Ok(parameters)
}

/// Record a postback for `source`.
///
/// Responds 200 with an empty body once the record is stored.
#[utoipa::path(
    method(get, post),
    path = "/{source}",
    params(
        ("source" = String, Path, description = "Partner identifier configured in the mapping table")
    ),
    request_body(
        content = String,
        content_type = "application/x-www-form-urlencoded",
        description = "Optional form fields, merged after the query string"
    ),
    responses(
        (status = 200, description = "Postback recorded"),
        (
            status = 400,
            description = "Missing parameters or unknown aim value",
            body = String,
            content_type = "text/plain",
            example = json!("Not enough parameters: goal")
        ),
        (status = 404, description = "No unique mapping for the source"),
        (status = 500, description = "Store failure")
    ),
    tags = ["postback"],
    operation_id = "receivePostback"
)]
#[route("/{source}", method = "GET", method = "POST")]
pub async fn receive_postback(
    state: web::Data<HttpState>,
    source: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let source = SourceId::new(source.into_inner())
        .map_err(|err| Error::not_found(format!("no mapping for source: {err}")))?;
    let parameters = collect_parameters(&req, &body)?;

    state
        .postbacks
        .record(PostbackRequest::new(source, parameters))
        .await?;

    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
#[path = "postback_tests.rs"]
mod tests;

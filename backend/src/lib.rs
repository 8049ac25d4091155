//! Postback receiver library.
//!
//! Partners call `GET|POST /{source}` to report conversions. The request is
//! checked against the parameter mapping configured for `source` and stored
//! as one row in the `postback` table. Domain types and services live in
//! [`domain`], HTTP adapters in [`inbound`], and store adapters in
//! [`outbound`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

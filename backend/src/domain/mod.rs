//! Domain primitives, services, and ports.
//!
//! Purpose: model postbacks and source mappings independently of HTTP and
//! PostgreSQL. Inbound adapters call the driving ports in [`ports`]; outbound
//! adapters implement the driven ones.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — transport-agnostic failure payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - TraceId — per-request correlation identifier.
//! - SourceId, ParameterField, Aim, ParameterMapping, RequestParameters,
//!   PostbackRecord — the postback model.
//! - SourceMapping, parse_mapping_csv — bulk mapping import.
//! - MappingResolver, PostbackService, MappingImportService — use-cases.

pub mod error;
pub mod mapping_import;
pub mod mapping_import_service;
pub mod mapping_resolver;
pub mod ports;
pub mod postback;
pub mod postback_service;
pub mod trace_id;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::mapping_import::{
    MappingImportError, SOURCE_COLUMN, SourceMapping, parse_mapping_csv,
};
pub use self::mapping_import_service::MappingImportService;
pub use self::mapping_resolver::MappingResolver;
pub use self::postback::{
    Aim, ParameterField, ParameterMapping, PostbackRecord, PostbackValidationError,
    RequestParameters, SourceId, SourceIdValidationError,
};
pub use self::postback_service::PostbackService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};


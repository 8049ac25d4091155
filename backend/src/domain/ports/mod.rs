//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`PostbackStore`], [`MappingRepository`],
//! [`PostbackMetrics`]) describe what the domain needs from infrastructure.
//! Driving ports ([`PostbackCommand`], [`MappingImportCommand`]) are what
//! inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod mapping_import_command;
mod mapping_repository;
mod postback_command;
mod postback_metrics;
mod postback_store;

#[cfg(test)]
pub use mapping_import_command::MockMappingImportCommand;
pub use mapping_import_command::{MappingImportCommand, MappingImportOutcome};
#[cfg(test)]
pub use mapping_repository::MockMappingRepository;
pub use mapping_repository::{MappingRepository, MappingRepositoryError};
#[cfg(test)]
pub use postback_command::MockPostbackCommand;
pub use postback_command::{PostbackCommand, PostbackRequest};
#[cfg(test)]
pub use postback_metrics::MockPostbackMetrics;
pub use postback_metrics::{
    NoOpPostbackMetrics, PostbackMetrics, PostbackMetricsError, PostbackRejection,
};
#[cfg(test)]
pub use postback_store::MockPostbackStore;
pub use postback_store::{PostbackStore, PostbackStoreError};

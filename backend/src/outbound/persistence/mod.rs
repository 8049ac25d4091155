//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the store ports backed by PostgreSQL through
//! `diesel-async` and a `bb8` pool.
//!
//! - **Thin adapters**: they translate between row structs and domain types
//!   and contain no validation.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: Diesel and pool failures map onto the port error
//!   enums, keeping the driver message for logging.
//!
//! # Example
//!
//! ```no_run
//! use postback::outbound::persistence::{DbPool, DieselPostbackStore, PoolConfig};
//!
//! # async fn wire() -> Result<(), postback::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/postback")).await?;
//! let store = DieselPostbackStore::new(pool);
//! # let _ = store;
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_mapping_repository;
mod diesel_postback_store;
mod models;
mod pool;
mod schema;

pub use diesel_mapping_repository::DieselMappingRepository;
pub use diesel_postback_store::DieselPostbackStore;
pub use pool::{DbPool, PoolConfig, PoolError};

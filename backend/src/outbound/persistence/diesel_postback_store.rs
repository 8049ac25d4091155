//! PostgreSQL-backed `PostbackStore` implementation using Diesel ORM.
//!
//! One `SELECT` against `mapping` per lookup and one `INSERT` into `postback`
//! per accepted request. No transactions, no retries.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PostbackStore, PostbackStoreError};
use crate::domain::{ParameterMapping, PostbackRecord, SourceId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error_message};
use super::models::{MappingRow, NewPostbackRow};
use super::pool::{DbPool, PoolError};
use super::schema::{mapping, postback};

/// Diesel-backed implementation of the [`PostbackStore`] port.
#[derive(Clone)]
pub struct DieselPostbackStore {
    pool: DbPool,
}

impl DieselPostbackStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostbackStoreError {
    PostbackStoreError::connection(map_pool_error_message(error))
}

fn map_query_error(error: diesel::result::Error, operation: &str) -> PostbackStoreError {
    map_diesel_error(
        error,
        operation,
        PostbackStoreError::query,
        PostbackStoreError::connection,
    )
}

/// Reduce the rows matched for `source` to exactly one mapping.
fn single_mapping(
    source: &SourceId,
    mut rows: Vec<MappingRow>,
) -> Result<ParameterMapping, PostbackStoreError> {
    match rows.len() {
        0 => Err(PostbackStoreError::mapping_not_found(source.as_ref())),
        1 => rows
            .pop()
            .map(ParameterMapping::from)
            .ok_or_else(|| PostbackStoreError::mapping_not_found(source.as_ref())),
        count => Err(PostbackStoreError::ambiguous_mapping(source.as_ref(), count)),
    }
}

#[async_trait]
impl PostbackStore for DieselPostbackStore {
    async fn find_mapping(
        &self,
        source: &SourceId,
    ) -> Result<ParameterMapping, PostbackStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MappingRow> = mapping::table
            .filter(mapping::source.eq(source.as_ref()))
            .select(MappingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_query_error(err, "mapping lookup"))?;

        single_mapping(source, rows)
    }

    async fn insert_postback(&self, record: &PostbackRecord) -> Result<(), PostbackStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(postback::table)
            .values(&NewPostbackRow::from(record))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_query_error(err, "postback insert"))
    }
}

#[cfg(test)]
mod tests {
    //! Row reduction coverage; query execution needs a live database.
    use super::*;
    use rstest::rstest;

    fn row(user_id: &str) -> MappingRow {
        MappingRow {
            user_id: user_id.to_owned(),
            code: "clk".to_owned(),
            aim: "goal".to_owned(),
        }
    }

    fn acme() -> SourceId {
        SourceId::new("acme").expect("valid source")
    }

    #[rstest]
    fn no_rows_is_not_found() {
        let err = single_mapping(&acme(), Vec::new()).expect_err("no rows");
        assert_eq!(err, PostbackStoreError::mapping_not_found("acme"));
    }

    #[rstest]
    fn one_row_is_the_mapping() {
        let mapping = single_mapping(&acme(), vec![row("uid")]).expect("one row");
        assert_eq!(mapping, ParameterMapping::new("uid", "clk", "goal"));
    }

    #[rstest]
    fn several_rows_are_ambiguous() {
        let err = single_mapping(&acme(), vec![row("uid"), row("user")]).expect_err("two rows");
        assert_eq!(err, PostbackStoreError::ambiguous_mapping("acme", 2_usize));
    }
}

//! PostgreSQL-backed `MappingRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::SourceMapping;
use crate::domain::ports::{MappingRepository, MappingRepositoryError};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error_message};
use super::models::NewMappingRow;
use super::pool::{DbPool, PoolError};
use super::schema::mapping;

/// Rows per `INSERT`. Each row binds four values and PostgreSQL caps a
/// statement at 65 535 bind parameters.
const ROWS_PER_INSERT: usize = 16_383;

/// Diesel-backed implementation of the [`MappingRepository`] port.
#[derive(Clone)]
pub struct DieselMappingRepository {
    pool: DbPool,
}

impl DieselMappingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MappingRepositoryError {
    MappingRepositoryError::connection(map_pool_error_message(error))
}

fn map_query_error(error: diesel::result::Error) -> MappingRepositoryError {
    map_diesel_error(
        error,
        "mapping import",
        MappingRepositoryError::query,
        MappingRepositoryError::connection,
    )
}

#[async_trait]
impl MappingRepository for DieselMappingRepository {
    async fn insert_mappings(
        &self,
        mappings: &[SourceMapping],
    ) -> Result<usize, MappingRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        if mappings.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NewMappingRow<'_>> = mappings.iter().map(NewMappingRow::from).collect();

        conn.transaction(|conn| {
            async move {
                let mut inserted = 0;
                for chunk in rows.chunks(ROWS_PER_INSERT) {
                    inserted += diesel::insert_into(mapping::table)
                        .values(chunk)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(inserted)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_query_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParameterMapping, SourceId};
    use diesel::debug_query;
    use diesel::pg::Pg;

    const MAX_BIND_PARAMS: usize = 65_535;
    const BIND_PARAMS_PER_ROW: usize = 4;

    fn mappings(count: usize) -> Vec<SourceMapping> {
        (0..count)
            .map(|index| {
                SourceMapping::new(
                    SourceId::new(format!("source-{index}")).expect("valid source"),
                    ParameterMapping::new("uid", "clk", "goal"),
                )
            })
            .collect()
    }

    #[test]
    fn chunk_size_fits_the_bind_parameter_limit() {
        assert!(ROWS_PER_INSERT * BIND_PARAMS_PER_ROW <= MAX_BIND_PARAMS);
        assert!((ROWS_PER_INSERT + 1) * BIND_PARAMS_PER_ROW > MAX_BIND_PARAMS);
    }

    #[test]
    fn full_chunk_statement_stays_under_the_limit() {
        let source = mappings(ROWS_PER_INSERT + 1);
        let rows: Vec<NewMappingRow<'_>> = source.iter().map(NewMappingRow::from).collect();
        let chunks: Vec<&[NewMappingRow<'_>]> = rows.chunks(ROWS_PER_INSERT).collect();
        assert_eq!(chunks.len(), 2);

        let first = <[_]>::first(&chunks).expect("first chunk");
        let sql = debug_query::<Pg, _>(&diesel::insert_into(mapping::table).values(*first))
            .to_string();
        let highest = ROWS_PER_INSERT * BIND_PARAMS_PER_ROW;
        assert!(sql.contains(&format!("${highest},")) || sql.contains(&format!("${highest})")));
        assert!(!sql.contains(&format!("${}", highest + 1)));
    }
}

//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use diesel::prelude::*;

use crate::domain::{ParameterMapping, PostbackRecord, SourceMapping};

use super::schema::{mapping, postback};

/// Row struct for reading parameter names from the mapping table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = mapping)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MappingRow {
    pub user_id: String,
    pub code: String,
    pub aim: String,
}

impl From<MappingRow> for ParameterMapping {
    fn from(row: MappingRow) -> Self {
        Self::new(row.user_id, row.code, row.aim)
    }
}

/// Insertable struct for mapping imports.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = mapping)]
pub(crate) struct NewMappingRow<'a> {
    pub source: &'a str,
    pub user_id: &'a str,
    pub code: &'a str,
    pub aim: &'a str,
}

impl<'a> From<&'a SourceMapping> for NewMappingRow<'a> {
    fn from(value: &'a SourceMapping) -> Self {
        use crate::domain::ParameterField;

        Self {
            source: value.source.as_ref(),
            user_id: value.mapping.parameter_name(ParameterField::UserId),
            code: value.mapping.parameter_name(ParameterField::Code),
            aim: value.mapping.parameter_name(ParameterField::Aim),
        }
    }
}

/// Insertable struct for accepted postbacks.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = postback)]
pub(crate) struct NewPostbackRow<'a> {
    pub user_id: &'a str,
    pub code: &'a str,
    pub aim: i32,
    pub source: &'a str,
}

impl<'a> From<&'a PostbackRecord> for NewPostbackRow<'a> {
    fn from(record: &'a PostbackRecord) -> Self {
        Self {
            user_id: record.user_id(),
            code: record.code(),
            aim: record.aim().code(),
            source: record.source().as_ref(),
        }
    }
}

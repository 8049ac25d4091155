//! Diesel table definitions for the PostgreSQL schema.
//!
//! The service ships no migrations; these definitions describe the tables it
//! expects to find. Neither table needs a surrogate key, so the declared
//! primary key spans every column. Diesel requires one for `table!` even
//! though the adapters only select and insert.

diesel::table! {
    /// Per-source parameter names.
    ///
    /// Each column other than `source` holds the request parameter name that
    /// carries the matching postback field.
    mapping (source, user_id, code, aim) {
        /// Partner identifier, matched against the request path.
        source -> Varchar,
        /// Parameter name carrying the user identifier.
        user_id -> Varchar,
        /// Parameter name carrying the click or conversion code.
        code -> Varchar,
        /// Parameter name carrying the conversion type.
        aim -> Varchar,
    }
}

diesel::table! {
    /// Accepted postbacks. Insert-only.
    postback (user_id, code, aim, source) {
        /// Partner-side user identifier.
        user_id -> Varchar,
        /// Click or conversion code.
        code -> Varchar,
        /// Conversion type code: 0 `reg`, 1 `dep`, 2 `dep_without_reg`.
        aim -> Int4,
        /// Partner identifier.
        source -> Varchar,
    }
}

diesel::allow_tables_to_appear_in_same_query!(mapping, postback);

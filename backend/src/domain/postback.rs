//! Postback data model.
//!
//! Purpose: describe the per-source parameter mapping, the categorical aim
//! value, and the normalised record persisted for every accepted postback.
//!
//! A source's mapping names the query/form parameters that carry the three
//! logical fields. Those names differ between partners, so the record is built
//! by looking each [`ParameterField`] up in the mapping first and in the
//! request second.

use std::collections::HashMap;
use std::fmt;

/// Validation errors raised while constructing a [`SourceId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceIdValidationError {
    /// The identifier was empty.
    #[error("source identifier must not be empty")]
    Empty,
}

/// Identifier of the partner integration sending a postback.
///
/// ## Invariants
/// - Non-empty. No other format constraint applies; whitespace is kept as
///   given.
///
/// # Examples
/// ```
/// use postback::domain::SourceId;
///
/// let source = SourceId::new("acme").expect("valid source");
/// assert_eq!(source.as_ref(), "acme");
/// assert!(SourceId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceId(String);

impl SourceId {
    /// Validate and construct a [`SourceId`].
    pub fn new(value: impl Into<String>) -> Result<Self, SourceIdValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(SourceIdValidationError::Empty);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for SourceId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SourceId> for String {
    fn from(value: SourceId) -> Self {
        value.0
    }
}

/// Logical postback fields a source maps onto its own parameter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterField {
    /// Partner-side user identifier.
    UserId,
    /// Click or conversion code.
    Code,
    /// Conversion type, see [`Aim`].
    Aim,
}

impl ParameterField {
    /// Every field in mapping order.
    pub const ALL: [Self; 3] = [Self::UserId, Self::Code, Self::Aim];

    /// Column name shared by the `mapping` and `postback` tables.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::UserId => "user_id",
            Self::Code => "code",
            Self::Aim => "aim",
        }
    }

    /// Resolve a column name back to its field.
    #[must_use]
    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.column() == column)
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Conversion type reported by a postback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aim {
    /// `reg`: the user registered.
    Registration,
    /// `dep`: the user deposited.
    Deposit,
    /// `dep_without_reg`: deposit without a preceding registration.
    DepositWithoutRegistration,
}

impl Aim {
    /// Every aim, ordered by integer code.
    pub const ALL: [Self; 3] = [
        Self::Registration,
        Self::Deposit,
        Self::DepositWithoutRegistration,
    ];

    /// Parse the textual value partners send.
    ///
    /// # Examples
    /// ```
    /// use postback::domain::Aim;
    ///
    /// assert_eq!(Aim::from_text("dep"), Some(Aim::Deposit));
    /// assert_eq!(Aim::from_text("purchase"), None);
    /// ```
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|aim| aim.as_text() == text)
    }

    /// Textual value as transmitted by partners.
    #[must_use]
    pub const fn as_text(self) -> &'static str {
        match self {
            Self::Registration => "reg",
            Self::Deposit => "dep",
            Self::DepositWithoutRegistration => "dep_without_reg",
        }
    }

    /// Integer code stored in the `postback.aim` column.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Registration => 0,
            Self::Deposit => 1,
            Self::DepositWithoutRegistration => 2,
        }
    }
}

impl fmt::Display for Aim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

/// Per-source association between logical fields and request parameter names.
///
/// # Examples
/// ```
/// use postback::domain::{ParameterField, ParameterMapping};
///
/// let mapping = ParameterMapping::new("uid", "clk", "goal");
/// assert_eq!(mapping.parameter_name(ParameterField::Aim), "goal");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMapping {
    user_id: String,
    code: String,
    aim: String,
}

impl ParameterMapping {
    /// Build a mapping from the parameter names used for each field.
    pub fn new(
        user_id: impl Into<String>,
        code: impl Into<String>,
        aim: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            code: code.into(),
            aim: aim.into(),
        }
    }

    /// Request parameter name carrying `field`.
    #[must_use]
    pub fn parameter_name(&self, field: ParameterField) -> &str {
        match field {
            ParameterField::UserId => &self.user_id,
            ParameterField::Code => &self.code,
            ParameterField::Aim => &self.aim,
        }
    }

    /// Iterate `(field, parameter name)` pairs in mapping order.
    pub fn entries(&self) -> impl Iterator<Item = (ParameterField, &str)> + '_ {
        ParameterField::ALL
            .into_iter()
            .map(move |field| (field, self.parameter_name(field)))
    }

    /// Parameter names absent from `parameters`, in mapping order and without
    /// duplicates.
    #[must_use]
    pub fn missing_parameters(&self, parameters: &RequestParameters) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for (_, name) in self.entries() {
            if !parameters.contains(name) && !missing.iter().any(|seen| seen == name) {
                missing.push(name.to_owned());
            }
        }
        missing
    }
}

/// Request parameters merged from the query string and any form body.
///
/// The first value seen for a key wins, so callers should feed query pairs
/// before body pairs.
///
/// # Examples
/// ```
/// use postback::domain::RequestParameters;
///
/// let params = RequestParameters::from_pairs([("uid", "42"), ("uid", "43")]);
/// assert_eq!(params.get("uid"), Some("42"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParameters(HashMap<String, String>);

impl RequestParameters {
    /// Build from key/value pairs keeping the first value for repeated keys.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::default();
        params.extend(pairs);
        params
    }

    /// Append pairs, ignoring keys that are already present.
    pub fn extend<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            self.0.entry(key.into()).or_insert_with(|| value.into());
        }
    }

    /// Whether `name` was supplied.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Value supplied for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// Failures raised while turning request parameters into a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostbackValidationError {
    /// One or more mapped parameters were absent.
    #[error("Not enough parameters: {}", names.join(", "))]
    MissingParameters {
        /// Missing parameter names in mapping order.
        names: Vec<String>,
    },
    /// The aim parameter carried an unrecognised value.
    #[error("Unknown value for parameter <{parameter}>")]
    UnknownAim {
        /// Source-specific name of the aim parameter.
        parameter: String,
        /// Rejected value.
        value: String,
    },
}

/// Normalised conversion event persisted for an accepted postback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostbackRecord {
    user_id: String,
    code: String,
    aim: Aim,
    source: SourceId,
}

impl PostbackRecord {
    /// Assemble a record from already validated parts.
    pub fn new(
        user_id: impl Into<String>,
        code: impl Into<String>,
        aim: Aim,
        source: SourceId,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            code: code.into(),
            aim,
            source,
        }
    }

    /// Validate `parameters` against `mapping` and build the record.
    ///
    /// # Errors
    /// Returns [`PostbackValidationError::MissingParameters`] when any mapped
    /// name is absent, and [`PostbackValidationError::UnknownAim`] when the aim
    /// value is not one of `reg`, `dep`, or `dep_without_reg`.
    ///
    /// # Examples
    /// ```
    /// use postback::domain::{
    ///     Aim, ParameterMapping, PostbackRecord, RequestParameters, SourceId,
    /// };
    ///
    /// let mapping = ParameterMapping::new("uid", "clk", "goal");
    /// let params =
    ///     RequestParameters::from_pairs([("uid", "42"), ("clk", "abc"), ("goal", "dep")]);
    /// let source = SourceId::new("acme").expect("valid source");
    ///
    /// let record = PostbackRecord::from_parameters(source, &mapping, &params)
    ///     .expect("valid postback");
    /// assert_eq!(record.aim(), Aim::Deposit);
    /// ```
    pub fn from_parameters(
        source: SourceId,
        mapping: &ParameterMapping,
        parameters: &RequestParameters,
    ) -> Result<Self, PostbackValidationError> {
        let missing = mapping.missing_parameters(parameters);
        if !missing.is_empty() {
            return Err(PostbackValidationError::MissingParameters { names: missing });
        }

        let value_of = |field: ParameterField| {
            parameters
                .get(mapping.parameter_name(field))
                .unwrap_or_default()
        };

        let aim_parameter = mapping.parameter_name(ParameterField::Aim);
        let aim_value = value_of(ParameterField::Aim);
        let aim = Aim::from_text(aim_value).ok_or_else(|| PostbackValidationError::UnknownAim {
            parameter: aim_parameter.to_owned(),
            value: aim_value.to_owned(),
        })?;

        Ok(Self::new(
            value_of(ParameterField::UserId),
            value_of(ParameterField::Code),
            aim,
            source,
        ))
    }

    /// Partner-side user identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Click or conversion code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Conversion type.
    #[must_use]
    pub fn aim(&self) -> Aim {
        self.aim
    }

    /// Source that sent the postback.
    #[must_use]
    pub fn source(&self) -> &SourceId {
        &self.source
    }
}

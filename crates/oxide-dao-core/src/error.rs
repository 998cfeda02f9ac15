//! Error types for SQL generation and parameter binding.

/// Errors raised while translating criteria into backend SQL or binding
/// values for execution.
///
/// None of these are transient: they describe a mapping mistake, a caller
/// bug, or a backend that cannot express what was asked of it.
#[derive(Debug, thiserror::Error)]
pub enum DaoError {
    /// The number of bound values does not match the placeholders found.
    #[error(
        "{values} parameter values were specified but {placeholders} placeholders were found \
         in the command. CommandText: {sql}"
    )]
    ParameterCountMismatch {
        /// Placeholders found in the command text.
        placeholders: usize,
        /// Values supplied by the caller.
        values: usize,
        /// The offending command text.
        sql: String,
    },

    /// The dialect cannot translate this expression.
    #[error(
        "expression type {expression} on attribute '{attribute}' is not supported by this dialect"
    )]
    UnsupportedExpression {
        /// Name of the expression type.
        expression: &'static str,
        /// Attribute the expression targets.
        attribute: String,
    },

    /// The dialect was asked for a type or feature it does not have.
    #[error("{dialect} does not support {capability}: {hint}")]
    UnsupportedCapability {
        /// Dialect name.
        dialect: &'static str,
        /// The missing capability.
        capability: String,
        /// What to use instead.
        hint: &'static str,
    },

    /// A sequence name could not be parsed.
    #[error("malformed sequence name '{name}': {reason}")]
    MalformedSequenceName {
        /// The raw sequence name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A geometry token could not be decoded.
    #[error("cannot decode geometry from '{token}': {message}")]
    GeometryDecode {
        /// The raw token as returned by the backend.
        token: String,
        /// Parser message.
        message: String,
    },

    /// An attribute is not declared by the class mapping.
    #[error("attribute '{attribute}' is not mapped on table {table}")]
    UnknownAttribute {
        /// The attribute name.
        attribute: String,
        /// The mapped table.
        table: String,
    },

    /// A SELECT was requested for a mapping with no attributes.
    #[error("class mapping for table {table} declares no attributes to select")]
    EmptyMapping {
        /// The mapped table.
        table: String,
    },

    /// The external execution layer failed to run a statement.
    #[error("backend error while executing '{sql}': {source}")]
    Backend {
        /// The statement that failed.
        sql: String,
        /// Error reported by the backend client.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DaoError {
    /// Creates a geometry decode error for the given token.
    pub fn geometry(token: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GeometryDecode {
            token: token.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for data-access operations.
pub type Result<T> = std::result::Result<T, DaoError>;

//! Error types for docql.

use crate::condition::ConditionKind;
use thiserror::Error as ThisError;

/// The main error type for docql operations.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The query text is malformed or uses an unsupported construct
    #[error("Syntax error in query `{query}`: {message}")]
    Syntax { query: String, message: String },

    /// A condition, query or entity was constructed with invalid arguments
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A query with placeholders was sent down the immediate execution path
    #[error("Query `{query}` has parameters, use a prepared statement instead")]
    PreparedStatementRequired { query: String },

    /// A prepared statement was executed before every placeholder was bound
    #[error("Parameters are not bound: {}", .0.join(", "))]
    UnboundParameters(Vec<String>),

    /// `bind` was called with a name the statement does not declare
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// `single_result` found more than one entity
    #[error("Query `{query}` returned more than one result")]
    NonUniqueResult { query: String },

    /// A value could not be read as the requested shape
    #[error("Cannot convert {found} to {expected}")]
    Conversion { expected: &'static str, found: String },

    /// Failure raised by the storage collaborator, passed through untouched
    #[error(transparent)]
    Manager(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Build a syntax error carrying the offending query text.
    pub fn syntax(query: impl Into<String>, message: impl ToString) -> Self {
        Error::Syntax {
            query: query.into(),
            message: message.to_string(),
        }
    }

    /// Wrap a storage collaborator failure.
    pub fn manager<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Manager(err.into())
    }
}

/// Construction-time validation failures.
///
/// Kept apart from syntax errors: these come from well-formed input that
/// describes something the algebra or the query objects cannot hold.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum ValidationError {
    #[error("{kind} requires an iterable value, found {found}")]
    NotIterable { kind: ConditionKind, found: String },

    #[error("BETWEEN requires exactly two values, found {found}")]
    BetweenArity { found: usize },

    #[error("{0} requires at least one condition")]
    EmptyComposition(ConditionKind),

    #[error("an entity name is required")]
    MissingEntity,

    #[error("skip must not be negative, found {0}")]
    NegativeSkip(i64),

    #[error("limit must not be negative, found {0}")]
    NegativeLimit(i64),

    #[error("time to live must not be negative, found {0}")]
    NegativeTtl(i64),

    #[error("time to live of {amount} {unit} is out of range")]
    TtlOutOfRange { amount: i64, unit: String },
}

/// A specialized `Result` type for docql operations.
pub type Result<T> = std::result::Result<T, Error>;

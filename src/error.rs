//! Error taxonomy for query construction, expansion and evaluation.

use thiserror::Error;

pub type QueryResult<T> = Result<T, QueryError>;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("invalid attribute `{attribute}`: {reason}")]
    InvalidAttribute { attribute: String, reason: String },

    #[error("no such attribute: `{0}`")]
    NoSuchAttribute(String),

    #[error("no such field: `{0}`")]
    NoSuchField(String),

    #[error("expansion failed for term `{term}`: {reason}")]
    ExpansionFailed { term: String, reason: String },

    #[error("storage backend failure: {0}")]
    StorageFailure(String),
}

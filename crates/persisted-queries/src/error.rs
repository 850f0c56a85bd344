use crate::QueryId;

/// Result type of every fallible operation in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while computing keys, building maps or resolving persisted queries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source text is not a valid executable GraphQL document
    #[error(transparent)]
    Parse(#[from] graphql_parser::query::ParseError),
    /// A fragment spread references a fragment the document does not define
    #[error("fragment `{name}` is used but not defined in the document")]
    MissingFragment {
        /// Name of the missing fragment
        name: String,
    },
    /// Exactly one operation was expected
    #[error("expected a single operation per document, found {count}")]
    MultipleOperations {
        /// Number of operations in the document
        count: usize,
    },
    /// The document holds fragments only
    #[error("the document does not contain any operation")]
    MissingOperation,
    /// A query transformer refused the document
    #[error("query transformer `{transformer}` failed: {message}")]
    Transform {
        /// Name of the failing transformer
        transformer: String,
        /// What went wrong
        message: String,
    },
    /// The computed key has no entry in the query map
    #[error("could not find query inside query map")]
    KeyNotFound,
    /// The requested id has no entry in the query store
    #[error("could not find a query with id `{id}`")]
    IdNotFound {
        /// The id that was requested
        id: QueryId,
    },
    /// Two entries of a query map share an id
    #[error("the id `{id}` is used by more than one query")]
    DuplicateId {
        /// The id used twice
        id: QueryId,
    },
    /// A persisted request reached a resolver that has persisted queries turned off
    #[error("persisted queries are disabled")]
    PersistedQueriesDisabled,
    /// The template literal tag does not form a valid pattern
    #[error("invalid template literal tag: {0}")]
    Regex(#[from] regex::Error),
    /// Reading or writing a persisted map failed
    #[error("persisted map serialization: {0}")]
    Json(#[from] serde_json::Error),
}

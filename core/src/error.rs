//! Error types for the IGDB client.
//!
//! # Design
//! The first five variants are the sentinels every service operation can
//! return. Validation sentinels (`NegativeId`, `EmptyIds`, `OutOfRange`, ...)
//! are produced before a request is built and come back bare. Anything that
//! fails after dispatch is wrapped in `Context` naming the operation, so
//! callers compare on [`ApiError::root_cause`] rather than on the outer value.

use thiserror::Error;

/// Errors returned by `IgdbClient` and its services.
#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    /// An identifier argument was negative.
    #[error("igdb: ID cannot be negative")]
    NegativeId,

    /// A list operation was given no identifiers.
    #[error("igdb: IDs argument empty")]
    EmptyIds,

    /// The response body was empty or not the expected JSON shape.
    #[error("igdb: invalid JSON: {0}")]
    InvalidJson(String),

    /// A query option value fell outside the range the API accepts.
    #[error("igdb: option value out of range")]
    OutOfRange,

    /// The server answered with an empty JSON array.
    #[error("igdb: no results")]
    NoResults,

    /// A field-based option was given a blank field name or no values.
    #[error("igdb: field argument empty")]
    EmptyField,

    /// A search was attempted with a blank query.
    #[error("igdb: search query cannot be blank")]
    BlankQuery,

    /// The server returned a non-2xx status.
    #[error("igdb: HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response.
    #[error("igdb: transport failed: {0}")]
    Transport(String),

    /// No API key was configured.
    #[error("igdb: missing API key (set IGDB_API_KEY)")]
    MissingApiKey,

    /// Configuration could not be loaded.
    #[error("igdb: invalid configuration: {0}")]
    Config(String),

    /// An error annotated with the operation that produced it.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ApiError>,
    },
}

impl ApiError {
    /// Wrap `self` with a description of the failing operation.
    pub fn context(self, context: impl Into<String>) -> Self {
        ApiError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error with all `Context` layers removed.
    pub fn root_cause(&self) -> &ApiError {
        let mut err = self;
        while let ApiError::Context { source, .. } = err {
            err = source;
        }
        err
    }
}

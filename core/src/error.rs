//! Error types for index construction and per-request validation.

/// The index could not be built. Cloneable so a failed engine can hand the same
/// error to every caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("corpus contains no usable items")]
    EmptyCorpus,

    #[error("no record in the corpus has a title")]
    MissingTitle,

    #[error("index build was interrupted")]
    Interrupted,
}

/// A search request was rejected. Never affects engine state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error("{field} must be a number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("{field} must not be negative")]
    NegativeBound { field: &'static str },

    #[error("min_price ({min}) is greater than max_price ({max})")]
    InvertedPriceRange { min: f64, max: f64 },

    #[error("limit must be at least 1")]
    ZeroLimit,
}

#[derive(Debug, thiserror::Error)]
pub enum LanguagePackError {
    #[error("invalid language pack: {0}")]
    Json(#[from] serde_json::Error),

    #[error("synonym target {target:?} of {source_word:?} is itself mapped to {next:?}")]
    ChainedSynonym {
        source_word: String,
        target: String,
        next: String,
    },
}

/// Errors returned by [`SearchEngine::search`](crate::SearchEngine::search).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("index unavailable: {0}")]
    Build(#[from] BuildError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

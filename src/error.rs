use thiserror::Error;

/// Input rejected before any storage write.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} must be {max} characters or less")]
    TooLong { field: &'static str, max: usize },
    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("evidence file is {size} bytes, limit is {limit}")]
    EvidenceTooLarge { size: u64, limit: u64 },
    #[error("evidence file type '{0}' is not allowed")]
    EvidenceType(String),
    #[error("evidence content looks like '{detected}', not '{claimed}'")]
    EvidenceMismatch { claimed: String, detected: String },
}

/// Persistence-layer failure. Slug conflicts are retried internally and only
/// reach callers as `SlugExhausted` once the retry budget is spent.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("slug space exhausted for '{base}' after {attempts} attempts")]
    SlugExhausted { base: String, attempts: u32 },
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A promotion attempt that failed after the submission itself was stored.
/// The submission stays pending; no article row is left behind.
#[derive(Debug, Error)]
pub enum PromotionError {
    #[error("no submission with slug '{0}'")]
    NotFound(String),
    #[error("evidence file '{0}' is missing from the media store")]
    MissingEvidence(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<rusqlite::Error> for PromotionError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(err.into())
    }
}

impl From<r2d2::Error> for PromotionError {
    fn from(err: r2d2::Error) -> Self {
        Self::Store(err.into())
    }
}

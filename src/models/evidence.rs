use serde::Serialize;

/// Opaque reference to a validated upload in the media store. Promotion
/// copies the reference; the blob itself is never duplicated.
#[derive(Debug, Clone, Serialize)]
pub struct StoredEvidence {
    pub filename: String,
    pub sha256: String,
    pub size_bytes: u64,
    pub original_name: String,
}

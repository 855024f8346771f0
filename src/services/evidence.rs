use crate::error::{StoreError, ValidationError};
use crate::models::StoredEvidence;
use sha2::{Digest, Sha256};
use std::path::Path;
use uuid::Uuid;

pub const MAX_EVIDENCE_BYTES: u64 = 100 * 1024 * 1024;

pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "doc", "docx"];

/// Validate an evidence upload against the intake contract: size cap,
/// extension allow-list, and a content sniff so a renamed binary cannot
/// masquerade as an allowed type. Returns the canonical lower-case
/// extension. Runs before anything touches disk.
pub fn validate_evidence(original_name: &str, data: &[u8]) -> Result<String, ValidationError> {
    if data.len() as u64 > MAX_EVIDENCE_BYTES {
        return Err(ValidationError::EvidenceTooLarge {
            size: data.len() as u64,
            limit: MAX_EVIDENCE_BYTES,
        });
    }

    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ValidationError::EvidenceType(ext));
    }

    // Legacy .doc and some valid files sniff as nothing; only a positive
    // mismatch is rejected.
    if let Some(kind) = infer::get(data) {
        let detected = kind.extension();
        if !extension_matches(&ext, detected) {
            return Err(ValidationError::EvidenceMismatch {
                claimed: ext,
                detected: detected.to_string(),
            });
        }
    }

    Ok(ext)
}

fn extension_matches(claimed: &str, detected: &str) -> bool {
    match (claimed, detected) {
        ("jpeg", "jpg") => true,
        // docx is a zip container; some matchers stop at the outer format
        ("docx", "zip") => true,
        _ => claimed == detected,
    }
}

/// Write a validated upload into the media store under a fresh opaque name
/// and record its checksum. The returned reference is what submissions and
/// articles carry; promotion copies it without touching the blob.
pub fn store_evidence(
    media_dir: &Path,
    original_name: &str,
    extension: &str,
    data: &[u8],
) -> Result<StoredEvidence, StoreError> {
    let filename = format!("{}.{}", Uuid::new_v4(), extension);

    std::fs::create_dir_all(media_dir)?;
    std::fs::write(media_dir.join(&filename), data)?;

    let sha256 = hex::encode(Sha256::digest(data));

    tracing::debug!(file = %filename, bytes = data.len(), "evidence stored");

    Ok(StoredEvidence {
        filename,
        sha256,
        size_bytes: data.len() as u64,
        original_name: original_name.to_string(),
    })
}

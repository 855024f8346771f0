use crate::error::StoreError;
use chrono::{DateTime, Duration, Utc};
use slug::slugify;

/// Second-precision suffix appended to every allocated slug.
pub const SUFFIX_FORMAT: &str = "%Y%m%d%H%M%S";

/// Attempts before a collision is treated as a storage fault. One retry is
/// already vanishingly unlikely to collide again.
pub const MAX_SLUG_ATTEMPTS: u32 = 5;

pub const MAX_SLUG_LENGTH: usize = 250;

/// Time source for slug suffixes and publication timestamps. Production code
/// uses [`SystemClock`]; tests substitute a stepping clock so allocation is
/// deterministic.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub fn generate_slug(title: &str) -> String {
    slugify(title)
}

/// Candidate slug for `title` as of `at`: base token plus timestamp suffix.
pub fn timestamp_slug(title: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}", slugify(title), at.format(SUFFIX_FORMAT))
}

/// Timestamp for the next allocation attempt. Re-samples the clock, but never
/// re-issues the previous second: a colliding candidate must change on retry.
pub fn next_attempt(clock: &dyn Clock, prev: DateTime<Utc>) -> DateTime<Utc> {
    let now = clock.now();
    if now > prev {
        now
    } else {
        prev + Duration::seconds(1)
    }
}

/// Advisory allocation: derive a candidate, test membership via `taken`, and
/// retry with a later suffix on a hit. The membership test is a
/// check-then-act race by construction — the owning table's UNIQUE index on
/// `slug` remains the authority, and insert paths must still handle a
/// conflict at write time (see [`is_slug_conflict`]).
///
/// Callers validate title non-emptiness upstream; an empty title would
/// produce a bare timestamp slug here.
pub fn allocate_slug<F>(
    title: &str,
    clock: &dyn Clock,
    mut taken: F,
) -> Result<(String, DateTime<Utc>), StoreError>
where
    F: FnMut(&str) -> Result<bool, StoreError>,
{
    let mut at = clock.now();
    for _ in 0..MAX_SLUG_ATTEMPTS {
        let candidate = timestamp_slug(title, at);
        if !taken(&candidate)? {
            return Ok((candidate, at));
        }
        at = next_attempt(clock, at);
    }
    Err(StoreError::SlugExhausted {
        base: slugify(title),
        attempts: MAX_SLUG_ATTEMPTS,
    })
}

/// True when `err` is the UNIQUE-index violation on `<table>.slug`, i.e. the
/// race the advisory check cannot close. Other constraint failures are real
/// storage faults and must propagate.
pub fn is_slug_conflict(err: &rusqlite::Error, table: &str) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, Some(msg)) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation
                && msg.contains("UNIQUE constraint failed")
                && msg.contains(&format!("{table}.slug"))
        }
        _ => false,
    }
}

pub fn validate_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > MAX_SLUG_LENGTH {
        return false;
    }
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

//! # Identifier & Timestamp Generation
//!
//! Human-readable, prefix-scoped identifiers and normalized timestamp strings.
//!
//! ## Id Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  <PREFIX>-<YYYYMMDDHHMM>-<NNNN>                         │
//! │                                                                         │
//! │  INV-202608281412-4821                                                 │
//! │  ─┬─ ─────┬────── ─┬──                                                 │
//! │   │       │        └── random suffix, uniform in [1000, 9999]          │
//! │   │       └── minute-resolution date stamp (sorts chronologically)     │
//! │   └── record-kind prefix (the keyspace partition)                      │
//! │                                                                         │
//! │  Collision policy: NONE. Same prefix + same minute + same suffix can   │
//! │  collide; the insert then fails with a Conflict. This is an accepted   │
//! │  design risk of the scheme, not a guaranteed-unique generator.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Timestamp Format
//! `YYYY-MM-DD  HH:MM:SS` — two spaces between date and time, a quirk the
//! remote endpoint's existing documents already carry, kept for range
//! filtering compatibility.

use chrono::{DateTime, Utc};
use rand::Rng;

use vela_core::RecordKind;

/// Generates a fresh document id for the given kind.
pub fn generate_id(kind: RecordKind) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(1000..=9999);
    generate_id_at(kind, Utc::now(), suffix)
}

/// Pure variant: builds an id from an explicit instant and suffix.
pub fn generate_id_at(kind: RecordKind, at: DateTime<Utc>, suffix: u16) -> String {
    format!("{}-{}-{}", kind.prefix(), at.format("%Y%m%d%H%M"), suffix)
}

/// Current time as the store's normalized timestamp string.
pub fn timestamp_now() -> String {
    timestamp_at(Utc::now())
}

/// Pure variant: formats an explicit instant.
pub fn timestamp_at(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d  %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_id_format() {
        let at = Utc.with_ymd_and_hms(2026, 8, 28, 14, 12, 59).unwrap();
        let id = generate_id_at(RecordKind::Inventory, at, 4821);
        assert_eq!(id, "INV-202608281412-4821");
    }

    #[test]
    fn test_generated_id_matches_pattern() {
        // prefix + "-" + 12 digits + "-" + 4 digits
        let id = generate_id(RecordKind::CustomerLoan);
        let mut parts = id.splitn(3, '-');
        assert_eq!(parts.next(), Some("CUSL"));
        let stamp = parts.next().unwrap();
        let suffix = parts.next().unwrap();
        assert_eq!(stamp.len(), 12);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(suffix.len(), 4);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_suffix_range() {
        for _ in 0..200 {
            let id = generate_id(RecordKind::Sale);
            let suffix: u16 = id.rsplit('-').next().unwrap().parse().unwrap();
            assert!((1000..=9999).contains(&suffix));
        }
    }

    #[test]
    fn test_timestamp_has_double_space() {
        let at = Utc.with_ymd_and_hms(2026, 8, 28, 9, 5, 3).unwrap();
        assert_eq!(timestamp_at(at), "2026-08-28  09:05:03");
    }
}

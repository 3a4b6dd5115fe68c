//! Domain entities mirrored from persistent storage.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A measured subject as stored, including its soft-delete bookkeeping.
///
/// `delete_at` is set exactly once, when the subject is retired; an
/// inactive row keeps its measurements so statistics can still see it.
///
/// Timestamps serialize as RFC 3339 strings; the same representation is
/// used on the API surface and inside cached list payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub id: i64,
    pub length: f64,
    pub weight: f64,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub create_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub delete_at: Option<OffsetDateTime>,
}

impl SubjectRecord {
    /// Whether the subject counts as present at `instant`.
    ///
    /// A subject exists from its creation onward; a retired subject
    /// stops existing strictly after its deletion timestamp.
    pub fn exists_at(&self, instant: OffsetDateTime) -> bool {
        if self.create_at > instant {
            return false;
        }
        match self.delete_at {
            Some(deleted) => deleted > instant,
            None => true,
        }
    }
}

/// Measurements for a subject about to be created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewSubject {
    pub length: f64,
    pub weight: f64,
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn record(create: OffsetDateTime, delete: Option<OffsetDateTime>) -> SubjectRecord {
        SubjectRecord {
            id: 1,
            length: 20.0,
            weight: 10.0,
            is_active: delete.is_none(),
            create_at: create,
            delete_at: delete,
        }
    }

    #[test]
    fn active_subject_exists_from_creation_onward() {
        let r = record(datetime!(2026-12-05 12:00 UTC), None);
        assert!(!r.exists_at(datetime!(2026-12-05 11:59 UTC)));
        assert!(r.exists_at(datetime!(2026-12-05 12:00 UTC)));
        assert!(r.exists_at(datetime!(2027-01-01 00:00 UTC)));
    }

    #[test]
    fn retired_subject_stops_existing_after_deletion() {
        let r = record(
            datetime!(2026-12-05 12:00 UTC),
            Some(datetime!(2026-12-08 09:00 UTC)),
        );
        assert!(r.exists_at(datetime!(2026-12-06 00:00 UTC)));
        assert!(!r.exists_at(datetime!(2026-12-08 09:00 UTC)));
        assert!(!r.exists_at(datetime!(2026-12-09 00:00 UTC)));
    }

    #[test]
    fn timestamps_serialize_as_rfc3339() {
        let r = record(datetime!(2026-12-05 12:00 UTC), None);
        let json = serde_json::to_value(&r).expect("serialize record");
        assert_eq!(json["create_at"], "2026-12-05T12:00:00Z");
        assert_eq!(json["delete_at"], serde_json::Value::Null);

        let restored: SubjectRecord =
            serde_json::from_value(json).expect("deserialize record");
        assert_eq!(restored, r);
    }
}

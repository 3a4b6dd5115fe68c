//! Cache key derivation.
//!
//! Every filtered list result is stored under a key derived from the
//! canonical form of its filter, all sharing one prefix so that
//! invalidation can sweep the whole family.

use crate::domain::filter::SubjectFilter;

/// Prefix shared by every cached list entry.
pub const LIST_KEY_PREFIX: &str = "subject:";

/// Key for one filtered list result.
///
/// Set filter fields are rendered as `name:value` pairs in canonical
/// order and comma-joined after the prefix, so equal filters always
/// map to the same key regardless of how they were populated. The
/// unfiltered list lives under the bare prefix.
pub fn list_key(filter: &SubjectFilter) -> String {
    let joined = filter
        .entries()
        .iter()
        .map(|(name, value)| format!("{name}:{value}"))
        .collect::<Vec<_>>()
        .join(",");
    format!("{LIST_KEY_PREFIX}{joined}")
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn empty_filter_uses_bare_prefix() {
        assert_eq!(list_key(&SubjectFilter::default()), "subject:");
    }

    #[test]
    fn set_fields_join_in_canonical_order() {
        let filter = SubjectFilter {
            weight_min: Some(12.5),
            id_max: Some(40),
            is_active: Some(true),
            ..SubjectFilter::default()
        };
        assert_eq!(
            list_key(&filter),
            "subject:id_max:40,is_active:true,weight_min:12.5"
        );
    }

    #[test]
    fn time_bounds_render_as_rfc3339() {
        let filter = SubjectFilter {
            created_after: Some(datetime!(2026-12-01 00:00 UTC)),
            ..SubjectFilter::default()
        };
        assert_eq!(list_key(&filter), "subject:created_after:2026-12-01T00:00:00Z");
    }

    #[test]
    fn equal_filters_share_a_key() {
        let a = SubjectFilter {
            length_min: Some(10.0),
            is_active: Some(false),
            ..SubjectFilter::default()
        };
        let b = a.clone();
        assert_eq!(list_key(&a), list_key(&b));
    }

    #[test]
    fn different_bounds_produce_different_keys() {
        let a = SubjectFilter {
            weight_min: Some(12.0),
            ..SubjectFilter::default()
        };
        let b = SubjectFilter {
            weight_max: Some(12.0),
            ..SubjectFilter::default()
        };
        assert_ne!(list_key(&a), list_key(&b));
    }
}
